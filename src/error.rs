use enough::StopReason;

use crate::format::ImageFormat;

/// Errors from decoding, fitting and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FitError {
    /// The filename extension (or content) is not PNG or JPEG.
    #[error("unsupported image format: {0:?}")]
    UnsupportedFormat(String),

    /// The bytes do not parse as the claimed codec.
    #[error("failed to decode {format} data")]
    Decode {
        format: ImageFormat,
        #[source]
        source: CodecError,
    },

    /// The scaled image or canvas could not be allocated, or PNG
    /// serialization failed.
    #[error("failed to produce the output canvas")]
    Encode(#[source] EncodeError),

    /// A source image or bounding box with a zero dimension.
    #[error("zero dimension: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl FitError {
    /// HTTP-style status for reporting this error to a caller.
    pub fn status_code(&self) -> u16 {
        match self {
            FitError::UnsupportedFormat(_) => 415,
            FitError::Decode { .. } | FitError::ZeroDimension { .. } => 400,
            FitError::DimensionsTooLarge { .. } | FitError::LimitExceeded(_) => 413,
            FitError::Encode(_) => 500,
            FitError::Cancelled(_) => 504,
        }
    }

    pub(crate) fn png(source: png::DecodingError) -> Self {
        match source {
            png::DecodingError::LimitsExceeded { .. } => {
                FitError::LimitExceeded(source.to_string())
            }
            source => FitError::Decode {
                format: ImageFormat::Png,
                source: CodecError::Png(source),
            },
        }
    }

    pub(crate) fn jpeg(source: image::ImageError) -> Self {
        match source {
            image::ImageError::Limits(e) => FitError::LimitExceeded(e.to_string()),
            source => FitError::Decode {
                format: ImageFormat::Jpeg,
                source: CodecError::Jpeg(source),
            },
        }
    }

    /// A decode buffer that passed the limits but could not be allocated.
    pub(crate) fn unallocatable(bytes: usize) -> Self {
        FitError::LimitExceeded(format!("could not allocate {bytes} bytes"))
    }

    pub(crate) fn png_encode(source: png::EncodingError) -> Self {
        FitError::Encode(EncodeError::Png(source))
    }

    pub(crate) fn out_of_memory(bytes: usize) -> Self {
        FitError::Encode(EncodeError::OutOfMemory { bytes })
    }

    pub(crate) fn malformed(format: ImageFormat, message: impl Into<String>) -> Self {
        FitError::Decode {
            format,
            source: CodecError::Malformed(message.into()),
        }
    }
}

impl From<StopReason> for FitError {
    fn from(r: StopReason) -> Self {
        FitError::Cancelled(r)
    }
}

/// Underlying codec failure carried by [`FitError::Decode`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error(transparent)]
    Png(png::DecodingError),

    #[error(transparent)]
    Jpeg(image::ImageError),

    #[error("{0}")]
    Malformed(String),
}

/// Underlying failure carried by [`FitError::Encode`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error(transparent)]
    Png(png::EncodingError),

    #[error("could not allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
}
