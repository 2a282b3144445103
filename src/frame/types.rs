use std::fmt;

use crate::error::{PipelineError, Result};

/// Channel count of the boundary format exchanged with the host (RGBA).
pub const BOUNDARY_CHANNELS: usize = 4;

/// Channel count of the working format filters operate on (RGB).
pub const WORKING_CHANNELS: usize = 3;

/// Interleaved 8-bit image buffer.
///
/// The buffer length always equals `width * height * channels`; every
/// constructor enforces this, so code holding a `Frame` may index it
/// without further bounds checks on geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

/// Byte length of a `width x height` frame with `channels` interleaved
/// channels, or `None` if the product overflows.
pub fn expected_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
}

impl Frame {
    /// Wrap an owned buffer, validating it against the geometry.
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidGeometry {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        if channels == 0 {
            return Err(PipelineError::UnsupportedChannels(channels));
        }
        let expected =
            expected_len(width, height, channels).ok_or(PipelineError::InvalidGeometry {
                width: i64::from(width),
                height: i64::from(height),
            })?;
        if data.len() != expected {
            return Err(PipelineError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create a frame with every byte set to `value`.
    pub fn filled(width: u32, height: u32, channels: usize, value: u8) -> Result<Self> {
        let len = expected_len(width, height, channels).ok_or(PipelineError::InvalidGeometry {
            width: i64::from(width),
            height: i64::from(height),
        })?;
        Self::new(width, height, channels, vec![value; len])
    }

    /// Copy a host-supplied RGBA buffer into a frame.
    ///
    /// Geometry arrives as signed 32-bit values from the host; negative or
    /// zero dimensions and a length that is not `width * height * 4` are
    /// rejected. The input slice is not retained.
    pub fn from_boundary(bytes: &[u8], width: i32, height: i32) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(PipelineError::InvalidGeometry {
                    width: i64::from(width),
                    height: i64::from(height),
                })
            }
        };
        Self::new(w, h, BOUNDARY_CHANNELS, bytes.to_vec())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame, returning its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Channel values of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}
