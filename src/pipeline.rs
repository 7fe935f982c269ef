//! The fit pipeline: decode, scale into the box, center on a canvas, encode.

use core::fmt;

use enough::Stop;
use tracing::debug;

use crate::canvas;
use crate::decode::DecodeRequest;
use crate::encode;
use crate::error::FitError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::RasterImage;
use crate::scale::{self, BoundingBox, Filter};

/// Pipeline stages, entered in this order exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Decoding,
    Scaling,
    Compositing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decoding => "decoding",
            Stage::Scaling => "scaling",
            Stage::Compositing => "compositing",
        })
    }
}

/// Result of [`FitRequest::fit_image`]: the canvas plus the geometry used.
#[derive(Clone, Debug)]
pub struct FitOutput {
    /// Box-sized canvas with the scaled image composited on it.
    pub canvas: RasterImage,
    /// Decoded source dimensions.
    pub source: (u32, u32),
    /// Dimensions the source was scaled to.
    pub scaled: (u32, u32),
    /// Top-left of the scaled image on the canvas.
    pub placement: (u32, u32),
}

impl FitOutput {
    /// Encode the canvas as PNG.
    pub fn to_png(&self, stop: impl Stop) -> Result<Vec<u8>, FitError> {
        encode::encode_png(self.canvas.as_ref(), stop)
    }

    fn to_png_dyn(&self, stop: &dyn Stop) -> Result<Vec<u8>, FitError> {
        crate::png_codec::encode(self.canvas.as_ref(), stop)
    }
}

/// A single fit invocation.
///
/// ```no_run
/// use zenfit::{BoundingBox, FitRequest, Unstoppable};
///
/// let data = std::fs::read("logo.png").unwrap();
/// let png = FitRequest::new(&data, "logo.png")
///     .bounding_box(BoundingBox::new(400, 200))
///     .fit(Unstoppable)?;
/// # Ok::<(), zenfit::FitError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FitRequest<'a> {
    data: &'a [u8],
    source: Source<'a>,
    bbox: BoundingBox,
    filter: Filter,
    limits: Option<&'a Limits>,
}

#[derive(Clone, Debug)]
enum Source<'a> {
    Filename(&'a str),
    Format(ImageFormat),
    Sniff,
}

impl<'a> FitRequest<'a> {
    /// Fit `data`, resolving its format from `filename`'s extension.
    ///
    /// The filename is never touched on disk.
    pub fn new(data: &'a [u8], filename: &'a str) -> Self {
        Self::with_source(data, Source::Filename(filename))
    }

    /// Fit `data` of a known format.
    pub fn with_format(data: &'a [u8], format: ImageFormat) -> Self {
        Self::with_source(data, Source::Format(format))
    }

    /// Fit `data`, resolving its format from magic bytes.
    pub fn sniffed(data: &'a [u8]) -> Self {
        Self::with_source(data, Source::Sniff)
    }

    fn with_source(data: &'a [u8], source: Source<'a>) -> Self {
        Self {
            data,
            source,
            bbox: BoundingBox::DEFAULT,
            filter: Filter::default(),
            limits: None,
        }
    }

    /// Set the target box. Zero dimensions are not defaulted here.
    pub fn bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the default caps ([`Limits::DEFAULT`]) on the source and box.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Run the pipeline and encode the canvas as PNG.
    pub fn fit(self, stop: impl Stop) -> Result<Vec<u8>, FitError> {
        let output = self.run(&stop)?;
        output.to_png_dyn(&stop)
    }

    /// Run the pipeline, stopping before PNG encoding.
    pub fn fit_image(self, stop: impl Stop) -> Result<FitOutput, FitError> {
        self.run(&stop)
    }

    fn run(self, stop: &dyn Stop) -> Result<FitOutput, FitError> {
        let span = tracing::debug_span!(
            "fit",
            box_width = self.bbox.width,
            box_height = self.bbox.height,
            filter = ?self.filter,
        );
        let _entered = span.enter();

        if self.bbox.is_empty() {
            return Err(FitError::ZeroDimension {
                width: self.bbox.width,
                height: self.bbox.height,
            });
        }

        let limits = self.limits.unwrap_or(&Limits::DEFAULT);
        limits.check_canvas(self.bbox)?;

        debug!(stage = %Stage::Decoding, bytes = self.data.len());
        let request = match self.source {
            Source::Filename(name) => DecodeRequest::for_filename(self.data, name)?,
            Source::Format(format) => DecodeRequest::new(self.data, format),
            Source::Sniff => DecodeRequest::sniff(self.data)?,
        }
        .with_limits(limits);
        let format = request.format();
        let source = request.decode_dyn(stop)?;
        let source_dims = (source.width() as u32, source.height() as u32);

        debug!(stage = %Stage::Scaling, %format, width = source_dims.0, height = source_dims.1);
        let scaled = scale::scale_dyn(source.as_ref(), self.bbox, self.filter, stop)?;
        drop(source);
        let scaled_dims = (scaled.width() as u32, scaled.height() as u32);
        let placement = canvas::center_offset(self.bbox, scaled_dims.0, scaled_dims.1);

        debug!(
            stage = %Stage::Compositing,
            width = scaled_dims.0,
            height = scaled_dims.1,
            x = placement.0,
            y = placement.1,
        );
        let canvas = canvas::center_dyn(scaled.as_ref(), self.bbox, stop)?;

        Ok(FitOutput {
            canvas,
            source: source_dims,
            scaled: scaled_dims,
            placement,
        })
    }
}

/// Fit `data` into a `box_width`×`box_height` canvas and return PNG bytes.
///
/// A zero dimension falls back to the 600×300 default for that axis. The
/// format is taken from `filename`'s extension (`png`, `jpg`, `jpeg`).
///
/// ```no_run
/// let data = std::fs::read("logo.svg").unwrap();
/// let err = zenfit::fit(&data, "logo.svg", 600, 300).unwrap_err();
/// assert!(matches!(err, zenfit::FitError::UnsupportedFormat(_)));
/// ```
pub fn fit(
    data: &[u8],
    filename: &str,
    box_width: u32,
    box_height: u32,
) -> Result<Vec<u8>, FitError> {
    FitRequest::new(data, filename)
        .bounding_box(BoundingBox::or_default(box_width, box_height))
        .fit(enough::Unstoppable)
}
