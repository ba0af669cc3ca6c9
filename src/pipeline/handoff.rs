//! Latest-wins handoff between the snapshot handler and the render loop
//!
//! The queue holds at most one pending frame. Publishing never blocks: if
//! the render loop has not picked up the previous frame yet, that frame is
//! evicted and replaced. Losing an intermediate frame is fine, the next one
//! supersedes it entirely; what must not happen is a backlog or a stalled
//! feed thread.

use crossbeam::channel::{bounded, select, Receiver, RecvError, Sender, TryRecvError, TrySendError};
use headcount_core::{Shutdown, HANDOFF_CAPACITY};
use headcount_types::Frame;
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// What happened to a published frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The slot was free
    Delivered,
    /// An unconsumed frame was evicted to make room
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    #[error("frame receiver has been dropped")]
    Disconnected,
}

/// Result of waiting on the receiver
#[derive(Debug)]
pub enum Next {
    Frame(Arc<Frame>),
    /// No frame arrived within the liveness timeout
    Stale,
    /// Shutdown was triggered
    Shutdown,
    /// Every publisher is gone and no frame is pending
    Closed,
}

/// Producer side; clone it for additional feed threads
#[derive(Clone)]
pub struct FramePublisher {
    tx: Sender<Arc<Frame>>,
    evict: Receiver<Arc<Frame>>,
    receiver_gone: Arc<AtomicBool>,
}

/// Consumer side, owned by the render loop
pub struct FrameReceiver {
    rx: Receiver<Arc<Frame>>,
    receiver_gone: Arc<AtomicBool>,
}

/// Create a connected publisher/receiver pair
pub fn handoff() -> (FramePublisher, FrameReceiver) {
    let (tx, rx) = bounded(HANDOFF_CAPACITY);
    let receiver_gone = Arc::new(AtomicBool::new(false));
    (
        FramePublisher {
            tx,
            evict: rx.clone(),
            receiver_gone: receiver_gone.clone(),
        },
        FrameReceiver { rx, receiver_gone },
    )
}

impl FramePublisher {
    /// Hand `frame` to the render loop, replacing any pending frame
    pub fn publish(&self, frame: Frame) -> Result<PublishOutcome, HandoffError> {
        self.publish_shared(Arc::new(frame))
    }

    pub fn publish_shared(&self, frame: Arc<Frame>) -> Result<PublishOutcome, HandoffError> {
        if self.receiver_gone.load(Ordering::Acquire) {
            return Err(HandoffError::Disconnected);
        }

        let mut frame = frame;
        let mut outcome = PublishOutcome::Delivered;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return Ok(outcome),
                Err(TrySendError::Full(rejected)) => {
                    // The render loop may take the pending frame first; only
                    // an actual eviction counts as a replacement
                    if let Ok(evicted) = self.evict.try_recv() {
                        trace!(
                            "Replacing unconsumed frame {} with frame {}",
                            evicted.sequence,
                            rejected.sequence
                        );
                        outcome = PublishOutcome::Replaced;
                    }
                    frame = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return Err(HandoffError::Disconnected),
            }
        }
    }
}

impl FrameReceiver {
    /// Block until a frame arrives, shutdown fires, or `stale_after` elapses
    pub fn next(&self, shutdown: &Shutdown, stale_after: Option<Duration>) -> Next {
        if shutdown.is_triggered() {
            return Next::Shutdown;
        }
        match stale_after {
            Some(timeout) => select! {
                recv(self.rx) -> msg => Self::received(msg),
                recv(shutdown.receiver()) -> _ => Next::Shutdown,
                default(timeout) => Next::Stale,
            },
            None => select! {
                recv(self.rx) -> msg => Self::received(msg),
                recv(shutdown.receiver()) -> _ => Next::Shutdown,
            },
        }
    }

    /// Take the pending frame without blocking
    pub fn try_next(&self) -> Option<Arc<Frame>> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn received(msg: Result<Arc<Frame>, RecvError>) -> Next {
        match msg {
            Ok(frame) => Next::Frame(frame),
            Err(RecvError) => Next::Closed,
        }
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.receiver_gone.store(true, Ordering::Release);
    }
}
