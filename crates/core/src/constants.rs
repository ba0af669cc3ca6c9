//! Shared constants for the application

/// Pending frames the handoff holds; newer frames replace an unconsumed one
pub const HANDOFF_CAPACITY: usize = 1;

/// Shown in titles in place of a latest value when a window is empty
pub const MISSING_VALUE_LABEL: &str = "-";

/// Appended to titles whose content is older than the liveness timeout
pub const STALE_MARKER: &str = "(stale)";
