use enough::Stop;

use crate::error::FitError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::RasterImage;

/// Decode request for a PNG or JPEG source.
///
/// ```no_run
/// use zenfit::{DecodeRequest, ImageFormat, Unstoppable};
///
/// let data: &[u8] = &[]; // your PNG bytes
/// let image = DecodeRequest::new(data, ImageFormat::Png).decode(Unstoppable)?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok::<(), zenfit::FitError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    format: ImageFormat,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// Decode `data` as the given format.
    pub fn new(data: &'a [u8], format: ImageFormat) -> Self {
        Self {
            data,
            format,
            limits: None,
        }
    }

    /// Resolve the format from `filename`'s extension.
    ///
    /// Fails with [`FitError::UnsupportedFormat`] for anything other than
    /// `png`, `jpg` or `jpeg`.
    pub fn for_filename(data: &'a [u8], filename: &str) -> Result<Self, FitError> {
        let format = ImageFormat::from_filename(filename)
            .ok_or_else(|| FitError::UnsupportedFormat(filename.to_owned()))?;
        Ok(Self::new(data, format))
    }

    /// Resolve the format by sniffing magic bytes.
    pub fn sniff(data: &'a [u8]) -> Result<Self, FitError> {
        let format = ImageFormat::from_magic(data)
            .ok_or_else(|| FitError::UnsupportedFormat("unrecognized magic bytes".into()))?;
        Ok(Self::new(data, format))
    }

    /// Replace the default caps ([`Limits::DEFAULT`]).
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decode to an RGBA8 bitmap at the source's full dimensions.
    pub fn decode(self, stop: impl Stop) -> Result<RasterImage, FitError> {
        self.decode_dyn(&stop)
    }

    pub(crate) fn decode_dyn(self, stop: &dyn Stop) -> Result<RasterImage, FitError> {
        let limits = self.limits.unwrap_or(&Limits::DEFAULT);
        match self.format {
            ImageFormat::Png => crate::png_codec::decode(self.data, limits, stop),
            ImageFormat::Jpeg => crate::jpeg_codec::decode(self.data, limits, stop),
        }
    }
}
