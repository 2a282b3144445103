use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// Tracks the instantaneous frame rate of the processing pipeline.
///
/// Only the latest sample is kept. There is no averaging window.
#[derive(Debug, Default)]
pub struct ThroughputTracker {
    fps: f32,
    last_duration_ms: Option<f64>,
    frames_processed: u64,
    frames_failed: u64,
}

/// Snapshot of throughput stats for serialisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputSnapshot {
    pub fps: f32,
    pub last_duration_ms: Option<f64>,
    pub frames_processed: u64,
    pub frames_failed: u64,
}

impl ThroughputTracker {
    /// Create a tracker with a zero estimate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the duration of a successfully processed frame.
    ///
    /// The estimate becomes `1000 / duration_ms`. Zero, negative and NaN
    /// durations leave the previous estimate untouched.
    pub fn record_duration_ms(&mut self, duration_ms: f64) {
        self.frames_processed += 1;
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            return;
        }
        self.fps = (1000.0 / duration_ms) as f32;
        self.last_duration_ms = Some(duration_ms);
    }

    /// Record a frame duration measured with a monotonic clock.
    pub fn record(&mut self, elapsed: Duration) {
        self.record_duration_ms(elapsed.as_nanos() as f64 / 1_000_000.0);
    }

    /// Record a frame that failed. The estimate is unchanged.
    pub fn record_failure(&mut self) {
        self.frames_failed += 1;
    }

    /// Latest frames-per-second estimate, `0.0` before any sample.
    pub fn current_estimate(&self) -> f32 {
        self.fps
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Take a serialisable snapshot.
    pub fn snapshot(&self) -> ThroughputSnapshot {
        ThroughputSnapshot {
            fps: self.fps,
            last_duration_ms: self.last_duration_ms,
            frames_processed: self.frames_processed,
            frames_failed: self.frames_failed,
        }
    }
}

/// Cloneable read handle onto a tracker shared with the processing thread.
#[derive(Debug, Clone, Default)]
pub struct ThroughputHandle(Arc<Mutex<ThroughputTracker>>);

impl ThroughputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_estimate(&self) -> f32 {
        self.0.lock().current_estimate()
    }

    pub fn snapshot(&self) -> ThroughputSnapshot {
        self.0.lock().snapshot()
    }

    pub(crate) fn record(&self, elapsed: Duration) {
        self.0.lock().record(elapsed);
    }

    pub(crate) fn record_failure(&self) {
        self.0.lock().record_failure();
    }

    pub(crate) fn reset(&self) {
        self.0.lock().reset();
    }
}
