//! PNG decoding to RGBA8 and RGBA8 encoding, on top of the `png` crate.

mod decode;
mod encode;

use enough::Stop;
use rgb::RGBA8;

use crate::error::FitError;
use crate::limits::Limits;
use crate::pixel::RasterImage;

/// Decode PNG data of any color type and bit depth to RGBA8.
pub(crate) fn decode(
    data: &[u8],
    limits: &Limits,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    decode::decode_png(data, limits, stop)
}

/// Encode RGBA8 pixels as an 8-bit RGBA PNG.
pub(crate) fn encode(
    pixels: imgref::ImgRef<'_, RGBA8>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, FitError> {
    encode::encode_png(pixels, stop)
}
