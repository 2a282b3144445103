// Diagnostics domain: per-frame throughput tracking.

pub mod stats;

pub use stats::{ThroughputHandle, ThroughputSnapshot, ThroughputTracker};
