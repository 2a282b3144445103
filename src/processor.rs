//! Frame processor: lifecycle state plus the convert, filter, convert
//! pipeline run for every host frame.

use crate::convert;
use crate::error::{PipelineError, Result};
use crate::filter;
use crate::frame::{Frame, ProcessingMode};

/// Lifecycle of a [`FrameProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorState {
    #[default]
    Uninitialized,
    Initialized,
    Released,
}

/// Runs the per-frame pipeline.
///
/// Holds no frame data between calls. Every call copies the host buffer,
/// works on owned frames and returns a freshly allocated output buffer.
#[derive(Debug, Default)]
pub struct FrameProcessor {
    state: ProcessorState,
}

impl FrameProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProcessorState::Initialized
    }

    /// Move to `Initialized`. Always succeeds; calling it again, including
    /// after [`release`](Self::release), leaves the processor ready.
    pub fn initialize(&mut self) -> bool {
        if self.state != ProcessorState::Initialized {
            tracing::debug!("frame processor initialised (was {:?})", self.state);
        }
        self.state = ProcessorState::Initialized;
        true
    }

    /// Move to `Released`. Safe to call repeatedly or before `initialize`.
    pub fn release(&mut self) {
        if self.state == ProcessorState::Initialized {
            tracing::debug!("frame processor released");
        }
        self.state = ProcessorState::Released;
    }

    /// Process one 4-channel host frame.
    ///
    /// `mode_code` outside the known set selects the identity transform.
    /// The returned buffer is always `width * height * 4` bytes.
    pub fn process_frame(
        &self,
        bytes: &[u8],
        width: i32,
        height: i32,
        mode_code: i32,
    ) -> Result<Vec<u8>> {
        match self.state {
            ProcessorState::Initialized => {}
            ProcessorState::Uninitialized => return Err(PipelineError::NotInitialised),
            ProcessorState::Released => return Err(PipelineError::Released),
        }

        let input = Frame::from_boundary(bytes, width, height)?;
        let mode = ProcessingMode::from_code(mode_code);
        if mode.is_none() {
            tracing::debug!("unknown mode code {mode_code}, passing frame through");
        }
        let output = run(&input, mode)?;
        Ok(output.into_bytes())
    }
}

/// The pipeline body, separate from lifecycle checks.
pub fn run(input: &Frame, mode: Option<ProcessingMode>) -> Result<Frame> {
    let working = convert::to_working_format(input)?;
    let filtered = filter::apply(&working, mode)?;
    convert::to_output_format(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> FrameProcessor {
        let mut p = FrameProcessor::new();
        assert!(p.initialize());
        p
    }

    fn rgba(width: usize, height: usize, px: [u8; 4]) -> Vec<u8> {
        px.repeat(width * height)
    }

    #[test]
    fn starts_uninitialized() {
        let p = FrameProcessor::new();
        assert_eq!(p.state(), ProcessorState::Uninitialized);
        assert!(!p.is_ready());
    }

    #[test]
    fn uninitialized_processor_rejects_frames() {
        let p = FrameProcessor::new();
        assert_eq!(
            p.process_frame(&rgba(2, 2, [0; 4]), 2, 2, 0),
            Err(PipelineError::NotInitialised)
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut p = ready();
        assert!(p.initialize());
        assert!(p.is_ready());
    }

    #[test]
    fn released_processor_rejects_frames() {
        let mut p = ready();
        p.release();
        assert_eq!(p.state(), ProcessorState::Released);
        assert_eq!(
            p.process_frame(&rgba(2, 2, [0; 4]), 2, 2, 0),
            Err(PipelineError::Released)
        );
    }

    #[test]
    fn release_twice_is_safe() {
        let mut p = ready();
        p.release();
        p.release();
        assert_eq!(p.state(), ProcessorState::Released);
    }

    #[test]
    fn release_before_initialize_is_safe() {
        let mut p = FrameProcessor::new();
        p.release();
        assert_eq!(p.state(), ProcessorState::Released);
    }

    #[test]
    fn initialize_after_release_rearms() {
        let mut p = ready();
        p.release();
        assert!(p.initialize());
        assert!(p.process_frame(&rgba(2, 2, [9; 4]), 2, 2, 2).is_ok());
    }

    #[test]
    fn output_is_always_four_channels() {
        let p = ready();
        let input = rgba(5, 3, [40, 80, 120, 200]);
        for code in [0, 1, 2, 3, -1, 99] {
            let out = p.process_frame(&input, 5, 3, code).unwrap();
            assert_eq!(out.len(), 5 * 3 * 4, "mode {code}");
        }
    }

    #[test]
    fn unknown_mode_passes_rgb_through_and_resets_alpha() {
        let p = ready();
        let input = rgba(2, 2, [10, 20, 30, 40]);
        let out = p.process_frame(&input, 2, 2, 42).unwrap();
        assert_eq!(out, rgba(2, 2, [10, 20, 30, 255]));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let p = ready();
        assert_eq!(
            p.process_frame(&[0u8; 15], 2, 2, 0),
            Err(PipelineError::LengthMismatch {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let p = ready();
        assert_eq!(p.process_frame(&[], 2, 2, 0), Err(PipelineError::EmptyInput));
    }

    #[test]
    fn negative_geometry_is_rejected() {
        let p = ready();
        let err = p.process_frame(&[0u8; 16], -2, -2, 0).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidGeometry { .. }));
    }

    #[test]
    fn grayscale_output_has_equal_channels() {
        let p = ready();
        let input: Vec<u8> = (0..16u8)
            .flat_map(|i| [i * 15, 255 - i * 10, i * 3, 255])
            .collect();
        let out = p.process_frame(&input, 4, 4, 2).unwrap();
        for px in out.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn failure_leaves_processor_usable() {
        let p = ready();
        assert!(p.process_frame(&[1, 2, 3], 1, 1, 0).is_err());
        assert!(p.process_frame(&[1, 2, 3, 4], 1, 1, 0).is_ok());
    }
}
