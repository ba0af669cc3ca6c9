//! Snapshot-to-series pipeline
//!
//! feed → [`SnapshotHandler`] (window + project) → handoff → [`RenderLoop`] → displayers

pub mod handoff;
pub mod projector;
pub mod render;
pub mod snapshot;
pub mod window;

pub use handoff::{handoff, FramePublisher, FrameReceiver, HandoffError, Next, PublishOutcome};
pub use projector::project;
pub use render::{RenderLoop, RenderStats, SlotLabeler};
pub use snapshot::{
    build_frame, build_frame_with_stats, normalize, PipelineSettings, SnapshotHandler,
    SnapshotStats,
};
pub use window::{build_windows, DeviceWindow};
