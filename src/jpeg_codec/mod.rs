//! JPEG decoding to opaque RGBA8, on top of the `image` crate's JPEG decoder.

use std::io::Cursor;

use enough::Stop;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};

use crate::error::FitError;
use crate::format::ImageFormat;
use crate::limits::{Limits, try_filled};
use crate::pixel::{self, RasterImage};

/// Decode baseline or progressive JPEG data to RGBA8.
pub(crate) fn decode(
    data: &[u8],
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    let mut decoder = JpegDecoder::new(Cursor::new(data)).map_err(FitError::jpeg)?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(FitError::malformed(
            ImageFormat::Jpeg,
            format!("zero dimension {width}x{height}"),
        ));
    }
    limits.check_source(width, height)?;
    decoder
        .set_limits(codec_limits(limits))
        .map_err(FitError::jpeg)?;

    let color = decoder.color_type();
    let len = usize::try_from(decoder.total_bytes())
        .map_err(|_| FitError::DimensionsTooLarge { width, height })?;
    limits.check_buffer(len)?;
    stop.check()?;

    let mut samples = try_filled(len, 0u8).map_err(|_| FitError::unallocatable(len))?;
    decoder.read_image(&mut samples).map_err(FitError::jpeg)?;
    stop.check()?;

    // CMYK and YCCK sources arrive already converted to RGB.
    let pixels = match color {
        ColorType::L8 => pixel::gray8_to_rgba(&samples),
        ColorType::Rgb8 => pixel::rgb8_to_rgba(&samples),
        other => {
            return Err(FitError::malformed(
                ImageFormat::Jpeg,
                format!("unsupported sample layout {other:?}"),
            ));
        }
    };

    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(FitError::malformed(
            ImageFormat::Jpeg,
            format!(
                "decoded {} pixels, header declares {width}x{height}",
                pixels.len()
            ),
        ));
    }

    Ok(RasterImage::new(pixels, width as usize, height as usize))
}

/// The decoder's own allocation cap, following ours.
fn codec_limits(limits: &Limits) -> image::Limits {
    let mut codec = image::Limits::default();
    codec.max_image_width = limits.max_source_width;
    codec.max_image_height = limits.max_source_height;
    // The decoder holds per-component planes next to the output, so its cap
    // is twice ours and never below its own default.
    codec.max_alloc = match (limits.max_buffer_bytes, codec.max_alloc) {
        (Some(max), Some(default)) => Some(max.saturating_mul(2).max(default)),
        _ => None,
    };
    codec
}
