use super::Border;
use crate::error::{PipelineError, Result};
use crate::frame::Frame;

/// Derivative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Signed 16-bit derivative response of a single-channel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    pub width: usize,
    pub height: usize,
    pub data: Vec<i16>,
}

/// 3x3 Sobel derivative along `axis`.
///
/// The largest possible response is `4 * 255`, so `i16` holds every value
/// without clipping.
pub fn sobel(src: &Frame, axis: Axis, border: Border) -> Result<Gradient> {
    if src.channels() != 1 {
        return Err(PipelineError::UnsupportedChannels(src.channels()));
    }
    let width = src.width() as usize;
    let height = src.height() as usize;
    let data = src.as_bytes();
    let at = |x: isize, y: isize| -> i32 {
        let sx = border.index(x, width);
        let sy = border.index(y, height);
        i32::from(data[sy * width + sx])
    };

    let mut out = vec![0i16; width * height];
    for y in 0..height {
        for x in 0..width {
            let (xi, yi) = (x as isize, y as isize);
            let v = match axis {
                Axis::X => {
                    (at(xi + 1, yi - 1) + 2 * at(xi + 1, yi) + at(xi + 1, yi + 1))
                        - (at(xi - 1, yi - 1) + 2 * at(xi - 1, yi) + at(xi - 1, yi + 1))
                }
                Axis::Y => {
                    (at(xi - 1, yi + 1) + 2 * at(xi, yi + 1) + at(xi + 1, yi + 1))
                        - (at(xi - 1, yi - 1) + 2 * at(xi, yi - 1) + at(xi + 1, yi - 1))
                }
            };
            out[y * width + x] = v as i16;
        }
    }

    Ok(Gradient {
        width,
        height,
        data: out,
    })
}

/// Absolute value saturated to 8 bits.
pub fn convert_scale_abs(grad: &Gradient) -> Vec<u8> {
    grad.data
        .iter()
        .map(|&v| i32::from(v).unsigned_abs().min(255) as u8)
        .collect()
}

/// `alpha * a + beta * b + gamma`, rounded half-to-even and saturated.
pub fn add_weighted(a: &[u8], alpha: f32, b: &[u8], beta: f32, gamma: f32) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(PipelineError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let v = f32::from(x) * alpha + f32::from(y) * beta + gamma;
            v.round_ties_even().clamp(0.0, 255.0) as u8
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_ramp() -> Frame {
        // Each column is 10 brighter than the last
        let data: Vec<u8> = (0..4).flat_map(|_| [0u8, 10, 20, 30, 40]).collect();
        Frame::new(5, 4, 1, data).unwrap()
    }

    #[test]
    fn constant_frame_has_zero_gradient() {
        let src = Frame::filled(6, 6, 1, 77).unwrap();
        let gx = sobel(&src, Axis::X, Border::Reflect101).unwrap();
        let gy = sobel(&src, Axis::Y, Border::Replicate).unwrap();
        assert!(gx.data.iter().all(|&v| v == 0));
        assert!(gy.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn ramp_produces_constant_interior_x_response() {
        let gx = sobel(&horizontal_ramp(), Axis::X, Border::Reflect101).unwrap();
        // (20 - 0) * 4 at every interior column
        assert_eq!(gx.data[6], 80);
        assert_eq!(gx.data[7], 80);
        // Reflect-101 mirrors column 1 onto column -1
        assert_eq!(gx.data[5], 0);
        let gy = sobel(&horizontal_ramp(), Axis::Y, Border::Reflect101).unwrap();
        assert!(gy.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn extreme_step_fits_in_i16() {
        let data = vec![0, 255, 0, 255, 0, 255];
        let src = Frame::new(2, 3, 1, data).unwrap();
        let gx = sobel(&src, Axis::X, Border::Replicate).unwrap();
        assert_eq!(gx.data[0], 1020);
    }

    #[test]
    fn convert_scale_abs_saturates() {
        let grad = Gradient {
            width: 3,
            height: 1,
            data: vec![-300, -12, 1020],
        };
        assert_eq!(convert_scale_abs(&grad), vec![255, 12, 255]);
    }

    #[test]
    fn add_weighted_rounds_half_to_even() {
        let out = add_weighted(&[1, 3, 255], 0.5, &[0, 0, 255], 0.5, 0.0).unwrap();
        assert_eq!(out, vec![0, 2, 255]);
    }

    #[test]
    fn add_weighted_rejects_mismatched_lengths() {
        assert!(add_weighted(&[1, 2], 0.5, &[1], 0.5, 0.0).is_err());
    }
}
