use enough::Stop;
use rgb::RGBA8;

use crate::error::FitError;

/// Encode an RGBA8 image as PNG bytes.
pub fn encode_png(img: imgref::ImgRef<'_, RGBA8>, stop: impl Stop) -> Result<Vec<u8>, FitError> {
    crate::png_codec::encode(img, &stop)
}
