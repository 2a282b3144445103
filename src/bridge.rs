//! Host-facing handle over the frame processor.
//!
//! A [`Bridge`] is created by the host at session start and passed to every
//! call. Failures never cross this boundary as panics or errors: each
//! frame call yields either an output buffer or `None`, and the handle stays
//! usable for the next frame.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::diagnostics::{ThroughputHandle, ThroughputSnapshot};
use crate::error::{PipelineError, Result};
use crate::frame::{Frame, ProcessingMode};
use crate::logging::{self, LogSink};
use crate::preview::snapshot::{self, SnapshotError};
use crate::processor::{FrameProcessor, ProcessorState};
use crate::settings::BridgeConfig;

/// One processing session.
#[derive(Debug)]
pub struct Bridge {
    processor: FrameProcessor,
    mode_code: i32,
    throughput: ThroughputHandle,
    config: BridgeConfig,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create an uninitialised bridge with default config.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            processor: FrameProcessor::new(),
            mode_code: config.default_mode.code(),
            throughput: ThroughputHandle::new(),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Route library logging to `sink` at the configured level.
    ///
    /// Returns `false` if a logger was already installed in this process.
    pub fn install_log_sink(&self, sink: Arc<dyn LogSink>) -> bool {
        logging::install(sink, self.config.level_filter())
    }

    pub fn state(&self) -> ProcessorState {
        self.processor.state()
    }

    /// Prepare the processor. Always returns `true`.
    ///
    /// Re-initialising a released bridge starts a new session, so the
    /// throughput counters are cleared.
    pub fn initialize(&mut self) -> bool {
        if self.processor.state() == ProcessorState::Released {
            self.throughput.reset();
        }
        self.processor.initialize()
    }

    /// Process one RGBA frame with an explicit mode code.
    ///
    /// Returns `None` on any failure; the reason is logged.
    pub fn process_frame(
        &self,
        bytes: &[u8],
        width: i32,
        height: i32,
        mode_code: i32,
    ) -> Option<Vec<u8>> {
        match self.try_process_frame(bytes, width, height, mode_code) {
            Ok(out) => Some(out),
            Err(e) if e.is_precondition() => {
                tracing::warn!("frame rejected: {e}");
                None
            }
            Err(e) => {
                tracing::error!("frame failed: {e}");
                None
            }
        }
    }

    /// Process one RGBA frame, reporting why it failed.
    ///
    /// The duration from entry to output availability updates the
    /// throughput estimate on success. Panics inside the pipeline are
    /// contained and reported as [`PipelineError::ProcessingFault`].
    pub fn try_process_frame(
        &self,
        bytes: &[u8],
        width: i32,
        height: i32,
        mode_code: i32,
    ) -> Result<Vec<u8>> {
        self.contained(|| {
            self.processor
                .process_frame(bytes, width, height, mode_code)
        })
    }

    /// Run one pipeline pass, converting a panic into a fault and
    /// recording the outcome against the throughput tracker.
    fn contained(&self, run: impl FnOnce() -> Result<Vec<u8>>) -> Result<Vec<u8>> {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(run))
            .unwrap_or_else(|payload| Err(PipelineError::ProcessingFault(panic_message(&*payload))));

        match outcome {
            Ok(out) => {
                self.throughput.record(start.elapsed());
                Ok(out)
            }
            Err(e) => {
                self.throughput.record_failure();
                Err(e)
            }
        }
    }

    /// Process one frame with the bridge's current mode.
    pub fn process_current(&self, bytes: &[u8], width: i32, height: i32) -> Option<Vec<u8>> {
        self.process_frame(bytes, width, height, self.mode_code)
    }

    /// Select the mode used by [`process_current`](Self::process_current).
    ///
    /// Unknown codes are stored as-is and select the pass-through filter.
    pub fn set_mode(&mut self, mode_code: i32) {
        self.mode_code = mode_code;
    }

    pub fn mode_code(&self) -> i32 {
        self.mode_code
    }

    /// Current mode, `None` for an unknown code.
    pub fn current_mode(&self) -> Option<ProcessingMode> {
        ProcessingMode::from_code(self.mode_code)
    }

    /// Advance to the next mode. An unknown code restarts the cycle.
    pub fn cycle_mode(&mut self) -> ProcessingMode {
        let next = self
            .current_mode()
            .map_or(ProcessingMode::EdgeDetect, ProcessingMode::next);
        self.mode_code = next.code();
        tracing::debug!("mode switched to {next}");
        next
    }

    /// Tear down the processor. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.processor.release();
    }

    /// Most recent frames-per-second estimate, `0.0` before any frame.
    pub fn throughput(&self) -> f32 {
        self.throughput.current_estimate()
    }

    /// Shared handle for reading throughput from another thread.
    pub fn throughput_handle(&self) -> ThroughputHandle {
        self.throughput.clone()
    }

    pub fn diagnostics(&self) -> ThroughputSnapshot {
        self.throughput.snapshot()
    }

    /// Encode a processed RGBA frame as a JPEG data URL at the configured
    /// quality.
    pub fn export_snapshot(&self, rgba: &[u8], width: i32, height: i32) -> Option<String> {
        let quality = self.config.jpeg_quality();
        self.export(rgba, width, height, |frame| snapshot::encode_jpeg(frame, quality))
    }

    /// Encode a processed RGBA frame as a JPEG thumbnail data URL at the
    /// configured thumbnail size.
    pub fn export_thumbnail(&self, rgba: &[u8], width: i32, height: i32) -> Option<String> {
        let (tw, th) = (self.config.thumbnail_width, self.config.thumbnail_height);
        self.export(rgba, width, height, |frame| snapshot::encode_thumbnail(frame, tw, th))
    }

    fn export(
        &self,
        rgba: &[u8],
        width: i32,
        height: i32,
        encode: impl FnOnce(&Frame) -> snapshot::Result<Vec<u8>>,
    ) -> Option<String> {
        let encoded = Frame::from_boundary(rgba, width, height)
            .map_err(SnapshotError::from)
            .and_then(|frame| encode(&frame));
        match encoded {
            Ok(jpeg) => Some(snapshot::to_data_url(&jpeg)),
            Err(e) => {
                tracing::warn!("snapshot export failed: {e}");
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in frame pipeline".to_string()
    }
}
