//! Process-wide cancellation signal
//!
//! The signal is a zero-capacity channel on which nothing is ever sent.
//! Dropping the [`ShutdownHandle`] disconnects it, which wakes every
//! receiver blocked in `select!` at once.

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError};

/// Owning side; triggering (or dropping) it fires the signal
#[derive(Debug)]
pub struct ShutdownHandle {
    _trigger: Sender<()>,
}

impl ShutdownHandle {
    pub fn trigger(self) {
        drop(self);
    }
}

/// Observing side, cheap to clone into every thread
#[derive(Debug, Clone)]
pub struct Shutdown {
    signal: Receiver<()>,
}

/// Create a linked handle/signal pair
pub fn shutdown_signal() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = bounded(0);
    (ShutdownHandle { _trigger: tx }, Shutdown { signal: rx })
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Channel to use as a `select!` arm; it becomes ready on shutdown
    pub fn receiver(&self) -> &Receiver<()> {
        &self.signal
    }
}
