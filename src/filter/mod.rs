//! Filter bank: the per-mode transforms applied to working-format frames.
//!
//! Every filter takes a 3-channel RGB frame and is deterministic for a
//! given input. Edge and gradient filters return single-channel frames;
//! unknown modes return the working frame unchanged.

pub mod blur;
pub mod canny;
pub mod sobel;

use crate::convert;
use crate::error::{PipelineError, Result};
use crate::frame::types::WORKING_CHANNELS;
use crate::frame::{Frame, ProcessingMode};

/// Gaussian kernel size applied before edge detection.
pub const EDGE_BLUR_SIZE: usize = 5;
/// Gaussian sigma applied before edge detection.
pub const EDGE_BLUR_SIGMA: f32 = 1.4;
/// Hysteresis lower threshold on a 0–255 scale.
pub const EDGE_LOW_THRESHOLD: f32 = 50.0;
/// Hysteresis upper threshold on a 0–255 scale.
pub const EDGE_HIGH_THRESHOLD: f32 = 150.0;
/// Gaussian kernel size applied before gradient magnitude.
pub const GRADIENT_BLUR_SIZE: usize = 3;
/// Zero sigma selects the fixed binomial kernel for the size.
pub const GRADIENT_BLUR_SIGMA: f32 = 0.0;

/// Edge handling for neighbourhood reads outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// `gfedcb|abcdefgh|gfedcba`, the edge pixel is not repeated.
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`
    Replicate,
}

impl Border {
    /// Map a possibly out-of-range coordinate into `0..len`.
    #[inline]
    pub fn index(self, i: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        match self {
            Self::Replicate => i.clamp(0, n - 1) as usize,
            Self::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let mut j = i;
                while !(0..n).contains(&j) {
                    j = if j < 0 { -j } else { 2 * n - 2 - j };
                }
                j as usize
            }
        }
    }
}

/// Run the filter for `mode` over a working-format frame.
///
/// `None` is the pass-through used for unknown mode codes.
pub fn apply(working: &Frame, mode: Option<ProcessingMode>) -> Result<Frame> {
    if working.channels() != WORKING_CHANNELS {
        return Err(PipelineError::UnsupportedChannels(working.channels()));
    }
    match mode {
        Some(ProcessingMode::EdgeDetect) => edge_detect(working),
        Some(ProcessingMode::GradientMagnitude) => gradient_magnitude(working),
        Some(ProcessingMode::Grayscale) => grayscale(working),
        None => Ok(working.clone()),
    }
}

/// Luma reduction.
pub fn grayscale(working: &Frame) -> Result<Frame> {
    convert::rgb_to_gray(working)
}

/// Gray, 5x5 Gaussian (sigma 1.4), then hysteresis edge detection with a
/// 3x3 gradient aperture. Output pixels are 0 or 255.
pub fn edge_detect(working: &Frame) -> Result<Frame> {
    let gray = convert::rgb_to_gray(working)?;
    let smoothed = blur::gaussian_blur(&gray, EDGE_BLUR_SIZE, EDGE_BLUR_SIGMA)?;
    canny::canny(&smoothed, EDGE_LOW_THRESHOLD, EDGE_HIGH_THRESHOLD)
}

/// Gray, light 3x3 Gaussian, then `0.5 * |dx| + 0.5 * |dy|` of the Sobel
/// responses computed in 16-bit intermediates.
pub fn gradient_magnitude(working: &Frame) -> Result<Frame> {
    let gray = convert::rgb_to_gray(working)?;
    let smoothed = blur::gaussian_blur(&gray, GRADIENT_BLUR_SIZE, GRADIENT_BLUR_SIGMA)?;
    let dx = sobel::sobel(&smoothed, sobel::Axis::X, Border::Reflect101)?;
    let dy = sobel::sobel(&smoothed, sobel::Axis::Y, Border::Reflect101)?;
    let abs_x = sobel::convert_scale_abs(&dx);
    let abs_y = sobel::convert_scale_abs(&dy);
    let combined = sobel::add_weighted(&abs_x, 0.5, &abs_y, 0.5, 0.0)?;
    Frame::new(smoothed.width(), smoothed.height(), 1, combined)
}
