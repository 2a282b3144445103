// Frame domain: pixel buffers and processing modes.

pub mod mode;
pub mod types;

pub use mode::ProcessingMode;
pub use types::Frame;
