use super::sobel::{self, Axis};
use super::Border;
use crate::error::{PipelineError, Result};
use crate::frame::Frame;

/// Value written for edge pixels.
pub const EDGE: u8 = 255;

// tan(22.5°) in Q15.
const TG22: i64 = 13573;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Suppressed,
    Weak,
    Strong,
}

/// Hysteresis edge detector over a single-channel frame.
///
/// Gradients come from a 3x3 Sobel aperture with replicated borders and
/// are combined as the L1 norm `|dx| + |dy|`. Non-maximum suppression
/// keeps pixels that peak along the quantised gradient direction; those
/// above `high` seed edges, which then grow through 8-connected
/// neighbours above `low`. Output pixels are [`EDGE`] or 0.
pub fn canny(src: &Frame, low: f32, high: f32) -> Result<Frame> {
    if src.channels() != 1 {
        return Err(PipelineError::UnsupportedChannels(src.channels()));
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let low = low.floor() as i32;
    let high = high.floor() as i32;

    let dx = sobel::sobel(src, Axis::X, Border::Replicate)?;
    let dy = sobel::sobel(src, Axis::Y, Border::Replicate)?;
    let width = dx.width;
    let height = dx.height;

    let magnitude: Vec<i32> = dx
        .data
        .iter()
        .zip(&dy.data)
        .map(|(&gx, &gy)| i32::from(gx).abs() + i32::from(gy).abs())
        .collect();
    let mag = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0
        } else {
            magnitude[y as usize * width + x as usize]
        }
    };

    let mut cells = vec![Cell::Suppressed; width * height];
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let m = magnitude[idx];
            if m <= low {
                continue;
            }
            let gx = i64::from(dx.data[idx]);
            let gy = i64::from(dy.data[idx]);
            let (xi, yi) = (x as isize, y as isize);

            let ax = gx.abs();
            let ay = gy.abs() << 15;
            let tg22x = ax * TG22;
            let is_peak = if ay < tg22x {
                m > mag(xi - 1, yi) && m >= mag(xi + 1, yi)
            } else {
                let tg67x = tg22x + (ax << 16);
                if ay > tg67x {
                    m > mag(xi, yi - 1) && m >= mag(xi, yi + 1)
                } else {
                    let s: isize = if (gx ^ gy) < 0 { -1 } else { 1 };
                    m > mag(xi - s, yi - 1) && m > mag(xi + s, yi + 1)
                }
            };

            if is_peak {
                if m > high {
                    cells[idx] = Cell::Strong;
                    stack.push((x, y));
                } else {
                    cells[idx] = Cell::Weak;
                }
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(height - 1);
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(width - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                let nidx = ny * width + nx;
                if cells[nidx] == Cell::Weak {
                    cells[nidx] = Cell::Strong;
                    stack.push((nx, ny));
                }
            }
        }
    }

    let out = cells
        .iter()
        .map(|&c| if c == Cell::Strong { EDGE } else { 0 })
        .collect();
    Frame::new(src.width(), src.height(), 1, out)
}
