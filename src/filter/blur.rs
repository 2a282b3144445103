use super::Border;
use crate::error::{PipelineError, Result};
use crate::frame::Frame;

/// Normalised 1-D Gaussian kernel.
///
/// With `sigma <= 0` small odd sizes use the fixed binomial kernels
/// (`[1 2 1] / 4`, `[1 4 6 4 1] / 16`, ...); larger sizes derive sigma
/// from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Result<Vec<f32>> {
    if size == 0 || size % 2 == 0 {
        return Err(PipelineError::ProcessingFault(format!(
            "gaussian kernel size must be odd, got {size}"
        )));
    }

    if sigma <= 0.0 {
        let fixed: Option<&[f32]> = match size {
            1 => Some(&[1.0][..]),
            3 => Some(&[0.25, 0.5, 0.25][..]),
            5 => Some(&[0.0625, 0.25, 0.375, 0.25, 0.0625][..]),
            7 => Some(&[
                0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
            ][..]),
            _ => None,
        };
        if let Some(k) = fixed {
            return Ok(k.to_vec());
        }
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - center;
            (-(x * x) / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    Ok(kernel)
}

/// Separable Gaussian blur of a single-channel frame with reflect-101
/// borders.
pub fn gaussian_blur(src: &Frame, size: usize, sigma: f32) -> Result<Frame> {
    if src.channels() != 1 {
        return Err(PipelineError::UnsupportedChannels(src.channels()));
    }
    let kernel = gaussian_kernel_1d(size, sigma)?;
    let width = src.width() as usize;
    let height = src.height() as usize;
    let radius = (size / 2) as isize;
    let data = src.as_bytes();

    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = Border::Reflect101.index(x as isize + k as isize - radius, width);
                acc += w * f32::from(row[sx]);
            }
            horizontal[y * width + x] = acc;
        }
    }

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = Border::Reflect101.index(y as isize + k as isize - radius, height);
                acc += w * horizontal[sy * width + x];
            }
            out[y * width + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    Frame::new(src.width(), src.height(), 1, out)
}
