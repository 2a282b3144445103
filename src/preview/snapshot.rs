use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageBuffer, Rgb, Rgba};
use thiserror::Error;

use crate::convert;
use crate::error::PipelineError;
use crate::frame::types::BOUNDARY_CHANNELS;
use crate::frame::Frame;

/// Snapshot export errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("invalid thumbnail size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Encode a processed frame as JPEG at the given quality (1-100).
///
/// Alpha is discarded; single-channel frames are expanded to gray RGB.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>> {
    let rgb = convert::to_working_format(frame)?;
    jpeg_from_rgb(rgb.as_bytes(), rgb.width(), rgb.height(), quality)
}

/// Encode a frame as RGBA PNG, the lossless format the web viewer loads.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>> {
    let rgba = if frame.channels() == BOUNDARY_CHANNELS {
        frame.clone()
    } else {
        convert::to_output_format(frame)?
    };
    let img: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(rgba.width(), rgba.height(), rgba.as_bytes())
            .ok_or(PipelineError::InvalidGeometry {
                width: i64::from(rgba.width()),
                height: i64::from(rgba.height()),
            })?;

    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))?;
    Ok(buf)
}

/// Downscale a frame and encode it as a JPEG thumbnail.
///
/// Uses `fast_image_resize` for SIMD-accelerated resizing.
pub fn encode_thumbnail(frame: &Frame, thumb_width: u32, thumb_height: u32) -> Result<Vec<u8>> {
    if thumb_width == 0 || thumb_height == 0 {
        return Err(SnapshotError::InvalidSize {
            width: thumb_width,
            height: thumb_height,
        });
    }
    let rgb = convert::to_working_format(frame)?;
    let (width, height) = (rgb.width(), rgb.height());

    let src_image =
        fr::images::Image::from_vec_u8(width, height, rgb.into_bytes(), fr::PixelType::U8x3)
            .map_err(|e| SnapshotError::Resize(e.to_string()))?;
    let mut dst_image = fr::images::Image::new(thumb_width, thumb_height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, None)
        .map_err(|e| SnapshotError::Resize(e.to_string()))?;

    jpeg_from_rgb(&dst_image.into_vec(), thumb_width, thumb_height, 70)
}

/// Wrap encoded JPEG bytes in a `data:` URL for direct use as an image source.
pub fn to_data_url(jpeg: &[u8]) -> String {
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, jpeg);
    format!("data:image/jpeg;base64,{encoded}")
}

fn jpeg_from_rgb(data: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    let img: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, data).ok_or(PipelineError::LengthMismatch {
            expected: width as usize * height as usize * 3,
            actual: data.len(),
        })?;

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    img.write_with_encoder(encoder)?;
    Ok(buf)
}
