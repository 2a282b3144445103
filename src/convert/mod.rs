//! Pixel layout conversion between the boundary, working and filter
//! output formats.
//!
//! Working order is RGB. Boundary frames arrive as RGBA; the alpha
//! channel is dropped on the way in and reset to opaque on the way out,
//! so the host's alpha does not survive a pipeline run.

pub mod yuv;

use crate::error::{PipelineError, Result};
use crate::frame::types::{BOUNDARY_CHANNELS, WORKING_CHANNELS};
use crate::frame::Frame;

/// Alpha written into every output pixel.
pub const OPAQUE: u8 = 255;

// BT.601 luma weights in Q14 fixed point (sum = 16384).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

/// Perceptual luma of one RGB pixel.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * LUMA_R + u32::from(g) * LUMA_G + u32::from(b) * LUMA_B + LUMA_ROUND)
        >> LUMA_SHIFT) as u8
}

/// Convert a frame to the 3-channel RGB working format.
///
/// RGBA drops alpha, RGB is copied, single-channel frames are replicated.
pub fn to_working_format(frame: &Frame) -> Result<Frame> {
    let data = match frame.channels() {
        WORKING_CHANNELS => frame.as_bytes().to_vec(),
        BOUNDARY_CHANNELS => {
            let mut rgb = Vec::with_capacity(frame.pixel_count() * WORKING_CHANNELS);
            for px in frame.pixels() {
                rgb.extend_from_slice(&px[..3]);
            }
            rgb
        }
        1 => {
            let mut rgb = Vec::with_capacity(frame.pixel_count() * WORKING_CHANNELS);
            for &v in frame.as_bytes() {
                rgb.extend_from_slice(&[v, v, v]);
            }
            rgb
        }
        n => return Err(PipelineError::UnsupportedChannels(n)),
    };
    Frame::new(frame.width(), frame.height(), WORKING_CHANNELS, data)
}

/// Convert a filter result to the 4-channel RGBA output format.
///
/// Total over every channel count: 1 is replicated, 3 gains an opaque
/// alpha, 4 is copied, and anything else is first reduced to luma.
pub fn to_output_format(frame: &Frame) -> Result<Frame> {
    let data = match frame.channels() {
        1 => gray_to_rgba(frame.as_bytes()),
        WORKING_CHANNELS => {
            let mut rgba = Vec::with_capacity(frame.pixel_count() * BOUNDARY_CHANNELS);
            for px in frame.pixels() {
                rgba.extend_from_slice(&[px[0], px[1], px[2], OPAQUE]);
            }
            rgba
        }
        BOUNDARY_CHANNELS => frame.as_bytes().to_vec(),
        _ => gray_to_rgba(collapse_to_gray(frame)?.as_bytes()),
    };
    Frame::new(frame.width(), frame.height(), BOUNDARY_CHANNELS, data)
}

/// Reduce an RGB working frame to single-channel luma.
pub fn rgb_to_gray(frame: &Frame) -> Result<Frame> {
    if frame.channels() != WORKING_CHANNELS {
        return Err(PipelineError::UnsupportedChannels(frame.channels()));
    }
    let gray = frame.pixels().map(|px| luma(px[0], px[1], px[2])).collect();
    Frame::new(frame.width(), frame.height(), 1, gray)
}

/// Fallback reduction for non-standard channel counts.
///
/// Three or more channels are treated as B, G, R in their first three
/// positions; two channels are averaged.
fn collapse_to_gray(frame: &Frame) -> Result<Frame> {
    let gray: Vec<u8> = frame
        .pixels()
        .map(|px| match px {
            [b, g, r, ..] => luma(*r, *g, *b),
            [a, b] => (u16::from(*a) + u16::from(*b)).div_ceil(2) as u8,
            [v] => *v,
            [] => 0,
        })
        .collect();
    Frame::new(frame.width(), frame.height(), 1, gray)
}

fn gray_to_rgba(gray: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray.len() * BOUNDARY_CHANNELS);
    for &v in gray {
        rgba.extend_from_slice(&[v, v, v, OPAQUE]);
    }
    rgba
}
