// Camera-side colour conversions.
//
// Hosts holding YUV or BGR camera buffers use these to build the RGBA
// boundary frame before calling into the pipeline. Every converter returns
// an empty buffer for zero dimensions or undersized input.

use super::OPAQUE;

/// Byte order of the interleaved chroma plane in 4:2:0 semi-planar data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChromaOrder {
    /// NV12
    Uv,
    /// NV21
    Vu,
}

/// Convert NV21 semi-planar data to RGB24.
///
/// Android's default preview format: a full-resolution Y plane followed by
/// interleaved V,U pairs at half resolution in both dimensions. Chroma
/// terms use BT.601 float coefficients and are truncated before clamping.
pub fn nv21_to_rgb(nv21: &[u8], width: usize, height: usize) -> Vec<u8> {
    semi_planar_to_rgb(nv21, width, height, ChromaOrder::Vu, yuv_float)
}

/// Convert NV12 semi-planar data to RGB24.
///
/// Same layout as NV21 with U before V, converted in 8-bit fixed point.
pub fn nv12_to_rgb(nv12: &[u8], width: usize, height: usize) -> Vec<u8> {
    semi_planar_to_rgb(nv12, width, height, ChromaOrder::Uv, yuv_fixed)
}

fn semi_planar_to_rgb(
    data: &[u8],
    width: usize,
    height: usize,
    order: ChromaOrder,
    to_rgb: fn(i32, i32, i32) -> [u8; 3],
) -> Vec<u8> {
    let luma_len = width * height;
    if width == 0 || height == 0 || data.len() < luma_len + luma_len.div_ceil(2) {
        return Vec::new();
    }
    let (luma, chroma) = data.split_at(luma_len);

    let mut rgb = Vec::with_capacity(luma_len * 3);
    for (row, line) in luma.chunks_exact(width).enumerate() {
        let chroma_row = (row / 2) * width;
        for (col, &y) in line.iter().enumerate() {
            let at = chroma_row + (col & !1);
            let (first, second) = match (chroma.get(at), chroma.get(at + 1)) {
                (Some(&a), Some(&b)) => (i32::from(a) - 128, i32::from(b) - 128),
                _ => (0, 0),
            };
            let (u, v) = match order {
                ChromaOrder::Uv => (first, second),
                ChromaOrder::Vu => (second, first),
            };
            rgb.extend_from_slice(&to_rgb(i32::from(y), u, v));
        }
    }
    rgb
}

/// Convert packed YUY2 (Y0 U Y1 V) data to RGB24. Width must be even.
pub fn yuy2_to_rgb(yuy2: &[u8], width: usize, height: usize) -> Vec<u8> {
    let packed_len = width * height * 2;
    if width == 0 || height == 0 || yuy2.len() < packed_len {
        return Vec::new();
    }
    yuy2[..packed_len]
        .chunks_exact(4)
        .flat_map(|quad| {
            let u = i32::from(quad[1]) - 128;
            let v = i32::from(quad[3]) - 128;
            let [r0, g0, b0] = yuv_fixed(i32::from(quad[0]), u, v);
            let [r1, g1, b1] = yuv_fixed(i32::from(quad[2]), u, v);
            [r0, g0, b0, r1, g1, b1]
        })
        .collect()
}

/// Convert bottom-up BGR24 (DIB row order) to top-down RGB24.
pub fn bgr_bottom_up_to_rgb(bgr: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = width * 3;
    if stride == 0 || bgr.len() < stride * height {
        return Vec::new();
    }
    bgr[..stride * height]
        .chunks_exact(stride)
        .rev()
        .flat_map(|row| row.chunks_exact(3).flat_map(|px| [px[2], px[1], px[0]]))
        .collect()
}

/// Append an opaque alpha channel to RGB24 data, producing the boundary
/// format. A trailing partial pixel is dropped.
pub fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], OPAQUE])
        .collect()
}

fn yuv_float(y: i32, u: i32, v: i32) -> [u8; 3] {
    let (u, v) = (u as f32, v as f32);
    let r = y + (1.370705 * v) as i32;
    let g = y - (0.337633 * u) as i32 - (0.698001 * v) as i32;
    let b = y + (1.732446 * u) as i32;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

// BT.601 in 8.8 fixed point: 1.402, 0.344, 0.714, 1.772.
fn yuv_fixed(y: i32, u: i32, v: i32) -> [u8; 3] {
    let y = y << 8;
    [
        clamp_u8((y + 359 * v) >> 8),
        clamp_u8((y - 88 * u - 183 * v) >> 8),
        clamp_u8((y + 454 * u) >> 8),
    ]
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
