//! PNG encoder.

use enough::Stop;
use png::{BitDepth, ColorType};
use rgb::{ComponentBytes, RGBA8};

use crate::error::FitError;
use crate::limits::rgba8_len;

pub(crate) fn encode_png(
    img: imgref::ImgRef<'_, RGBA8>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, FitError> {
    let width = img.width() as u32;
    let height = img.height() as u32;
    let data_len = rgba8_len(width, height)?;

    stop.check()?;
    // Borrowed when the image has no stride padding.
    let (pixels, _, _) = img.to_contiguous_buf();
    let data = pixels.as_bytes();
    debug_assert_eq!(data.len(), data_len);

    let mut out = Vec::with_capacity(data_len / 2 + 64);
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(FitError::png_encode)?;
        writer.write_image_data(data).map_err(FitError::png_encode)?;
        writer.finish().map_err(FitError::png_encode)?;
    }
    Ok(out)
}
