use thiserror::Error;

/// Frame pipeline errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("processor is not initialised")]
    NotInitialised,

    #[error("processor has been released")]
    Released,

    #[error("input buffer is empty")]
    EmptyInput,

    #[error("invalid frame geometry: {width}x{height}")]
    InvalidGeometry { width: i64, height: i64 },

    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("processing fault: {0}")]
    ProcessingFault(String),
}

impl PipelineError {
    /// `true` for caller contract violations, `false` for faults raised
    /// while a frame was being transformed.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::ProcessingFault(_))
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, PipelineError>;
