//! # zenfit
//!
//! Fit a PNG or JPEG image into a fixed bounding box: scale it to touch the
//! box on one axis while preserving aspect ratio, center it on a transparent
//! box-sized canvas, and encode the canvas as PNG.
//!
//! ## Pipeline
//!
//! 1. **Decoding**: the format comes from the filename extension (split on
//!    the last `.`; `png`, `jpg`, `jpeg`) or from magic bytes. Every source
//!    decodes to straight-alpha RGBA8.
//! 2. **Scaling**: the axis with the larger source/box ratio is binding and
//!    lands exactly on the box; the other axis is rounded down. Nearest-neighbor
//!    by default, bilinear on request.
//! 3. **Compositing**: the scaled image is composited source-over onto a
//!    transparent canvas at `((box_w - w) / 2, (box_h - h) / 2)`.
//!
//! Each invocation owns its buffers; nothing is shared between calls.
//! Header dimensions and the box are checked against [`Limits`] before any
//! pixel buffer is allocated; by default no single buffer may exceed
//! [`DEFAULT_MAX_BUFFER_BYTES`].
//!
//! ## Non-Goals
//!
//! - Rotation, color correction, or output formats other than PNG
//! - Animated images
//! - Streaming or tiled processing
//!
//! ## Usage
//!
//! ```no_run
//! use zenfit::{BoundingBox, Filter, FitRequest, Limits, Unstoppable};
//!
//! let data = std::fs::read("photo.jpg").unwrap();
//!
//! // One-shot with the 600x300 default box
//! let png = zenfit::fit(&data, "photo.jpg", 0, 0)?;
//!
//! // Or configure the request
//! let limits = Limits {
//!     max_source_pixels: Some(50_000_000),
//!     max_canvas_pixels: Some(4_000_000),
//!     ..Limits::default()
//! };
//! let output = FitRequest::new(&data, "photo.jpg")
//!     .bounding_box(BoundingBox::new(400, 400))
//!     .filter(Filter::Bilinear)
//!     .with_limits(&limits)
//!     .fit_image(Unstoppable)?;
//! println!("scaled to {:?} at {:?}", output.scaled, output.placement);
//! # Ok::<(), zenfit::FitError>(())
//! ```

#![forbid(unsafe_code)]

mod canvas;
mod decode;
mod encode;
mod error;
mod format;
mod jpeg_codec;
mod limits;
mod pipeline;
mod pixel;
mod png_codec;
mod scale;

pub mod handler;
pub mod store;

// Re-exports
pub use canvas::{center, center_offset};
pub use decode::DecodeRequest;
pub use encode::encode_png;
pub use enough::{Stop, Unstoppable};
pub use error::{CodecError, EncodeError, FitError};
pub use format::ImageFormat;
pub use limits::{DEFAULT_MAX_BUFFER_BYTES, Limits};
pub use pipeline::{FitOutput, FitRequest, Stage, fit};
pub use pixel::{RasterImage, composite_over};
pub use scale::{Binding, BoundingBox, Filter, ScaleFactor, scale, scaled_size};
