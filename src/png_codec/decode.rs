//! PNG decoder.

use enough::Stop;
use png::{ColorType, Transformations};

use crate::error::FitError;
use crate::format::ImageFormat;
use crate::limits::{Limits, try_filled};
use crate::pixel::{self, RasterImage};

pub(crate) fn decode_png(
    data: &[u8],
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    // The crate's own cap guards chunk and row buffers; raise it only when
    // ours is larger, since the frame buffer is checked separately below.
    let codec_default = png::Limits::default().bytes;
    let codec_limits = png::Limits {
        bytes: limits
            .max_buffer_bytes
            .map_or(usize::MAX, |max| usize::try_from(max).unwrap_or(usize::MAX))
            .max(codec_default),
    };
    let mut decoder = png::Decoder::new_with_limits(data, codec_limits);
    // Palette and sub-byte gray expand to 8 bits, 16-bit samples keep the high byte.
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info().map_err(FitError::png)?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    limits.check_source(width, height)?;
    let frame_len = reader.output_buffer_size();
    limits.check_buffer(frame_len)?;
    stop.check()?;

    let mut buf = try_filled(frame_len, 0u8).map_err(|_| FitError::unallocatable(frame_len))?;
    let frame = reader.next_frame(&mut buf).map_err(FitError::png)?;
    buf.truncate(frame.buffer_size());
    stop.check()?;

    let pixels = match frame.color_type {
        ColorType::Grayscale => pixel::gray8_to_rgba(&buf),
        ColorType::GrayscaleAlpha => pixel::gray_alpha8_to_rgba(&buf),
        ColorType::Rgb => pixel::rgb8_to_rgba(&buf),
        ColorType::Rgba => pixel::rgba8_to_rgba(&buf),
        ColorType::Indexed => {
            return Err(FitError::malformed(
                ImageFormat::Png,
                "indexed color survived palette expansion",
            ));
        }
    };

    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(FitError::malformed(
            ImageFormat::Png,
            format!(
                "frame holds {} pixels, header declares {width}x{height}",
                pixels.len()
            ),
        ));
    }

    Ok(RasterImage::new(pixels, width as usize, height as usize))
}
