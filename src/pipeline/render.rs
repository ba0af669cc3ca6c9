//! Render loop: waits for frames and redraws the display slots
//!
//! Slots are bound positionally: slot `i` shows the `i`-th device of the
//! current frame. A slot without a device in the frame keeps whatever it
//! showed last. Frames with a lower sequence than the last rendered one are
//! skipped, so the display never moves back to an older snapshot.

use super::handoff::{FrameReceiver, Next};
use headcount_core::{BoxedDisplayer, Shutdown, MISSING_VALUE_LABEL};
use headcount_types::Frame;
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::time::Duration;

/// Builds slot titles from device ids and latest values
#[derive(Debug, Clone, Default)]
pub struct SlotLabeler {
    friendly_names: HashMap<String, String>,
}

impl SlotLabeler {
    pub fn new(friendly_names: HashMap<String, String>) -> Self {
        Self { friendly_names }
    }

    /// Friendly name if one is configured, else the raw id
    pub fn display_name<'a>(&'a self, device_id: &'a str) -> &'a str {
        self.friendly_names
            .get(device_id)
            .map(String::as_str)
            .unwrap_or(device_id)
    }

    pub fn title(&self, device_id: &str, latest: Option<f64>) -> String {
        let value = latest
            .map(format_value)
            .unwrap_or_else(|| MISSING_VALUE_LABEL.to_string());
        format!("{} ({})", self.display_name(device_id), value)
    }
}

/// Counts are integral in practice; print them without a fraction
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Counters accumulated over the loop's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub redraws: u64,
    pub failed_redraws: u64,
    pub stale_marks: u64,
    /// Frames skipped because a newer one was already rendered
    pub superseded: u64,
}

struct Slot {
    displayer: BoxedDisplayer,
    bound_device: Option<String>,
}

/// Owns the display slots; the only writer to the display layer
pub struct RenderLoop {
    slots: Vec<Slot>,
    labeler: SlotLabeler,
    stats: RenderStats,
    last_sequence: Option<u64>,
}

impl RenderLoop {
    /// `slots.len()` is the display limit
    pub fn new(slots: Vec<BoxedDisplayer>, labeler: SlotLabeler) -> Self {
        Self {
            slots: slots
                .into_iter()
                .map(|displayer| Slot {
                    displayer,
                    bound_device: None,
                })
                .collect(),
            labeler,
            stats: RenderStats::default(),
            last_sequence: None,
        }
    }

    pub fn display_limit(&self) -> usize {
        self.slots.len()
    }

    /// Device last drawn into `slot`
    pub fn bound_device(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot)?.bound_device.as_deref()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Redraw every slot that has a device in `frame`; returns the number
    /// of slots redrawn
    ///
    /// A frame older than the last rendered one draws nothing. Equal
    /// sequences are rendered again.
    pub fn render_frame(&mut self, frame: &Frame) -> usize {
        if let Some(last) = self.last_sequence {
            if frame.sequence < last {
                trace!("Skipping frame {}, already showing {}", frame.sequence, last);
                self.stats.superseded += 1;
                return 0;
            }
        }
        self.last_sequence = Some(frame.sequence);
        self.stats.frames += 1;

        if frame.len() > self.slots.len() {
            debug!(
                "Frame {} has {} devices, showing the first {}",
                frame.sequence,
                frame.len(),
                self.slots.len()
            );
        }

        let mut redrawn = 0;
        for (index, (slot, series)) in self.slots.iter_mut().zip(frame.iter()).enumerate() {
            let title = self.labeler.title(&series.device_id, series.table.latest);
            if slot.bound_device.as_deref() != Some(series.device_id.as_str()) {
                trace!("Slot {} now shows {}", index, series.device_id);
            }
            slot.bound_device = Some(series.device_id.clone());

            match slot.displayer.draw(&title, &series.table) {
                Ok(()) => {
                    redrawn += 1;
                    self.stats.redraws += 1;
                }
                Err(e) => {
                    self.stats.failed_redraws += 1;
                    warn!("Slot {} ({}) failed to redraw: {}", index, slot.displayer.id(), e);
                }
            }
        }
        redrawn
    }

    /// Flag every slot that has content as stale
    pub fn mark_stale(&mut self) -> usize {
        let mut marked = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.bound_device.is_none() {
                continue;
            }
            match slot.displayer.mark_stale() {
                Ok(()) => marked += 1,
                Err(e) => warn!("Slot {} failed to show stale state: {}", index, e),
            }
        }
        self.stats.stale_marks += marked as u64;
        marked
    }

    /// Wait → render → wait, until shutdown or until every publisher is gone
    ///
    /// Shutdown is only observed between frames, so a redraw is never cut
    /// short.
    pub fn run(
        &mut self,
        receiver: &FrameReceiver,
        shutdown: &Shutdown,
        stale_after: Option<Duration>,
    ) -> RenderStats {
        info!("Render loop started with {} slots", self.slots.len());
        loop {
            match receiver.next(shutdown, stale_after) {
                Next::Frame(frame) => {
                    self.render_frame(&frame);
                }
                Next::Stale => {
                    let marked = self.mark_stale();
                    debug!("No frame within {:?}, marked {} slots stale", stale_after, marked);
                }
                Next::Shutdown => {
                    info!("Render loop stopping on shutdown");
                    break;
                }
                Next::Closed => {
                    info!("Feed closed, render loop stopping");
                    break;
                }
            }
        }
        self.stats
    }

    /// Render the first frame that arrives, then return
    ///
    /// Returns the number of slots redrawn, or `None` if the loop was shut
    /// down or the feed closed before any frame arrived.
    pub fn run_once(&mut self, receiver: &FrameReceiver, shutdown: &Shutdown) -> Option<usize> {
        match receiver.next(shutdown, None) {
            Next::Frame(frame) => Some(self.render_frame(&frame)),
            _ => None,
        }
    }
}
