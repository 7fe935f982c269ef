//! Caps on what a fit may allocate.
//!
//! Source dimensions come from untrusted headers and box dimensions from
//! untrusted requests, so both are checked before any pixel buffer exists.
//! [`Limits::default`] caps every single buffer at
//! [`DEFAULT_MAX_BUFFER_BYTES`]; [`Limits::UNLIMITED`] lifts all caps.

use std::collections::TryReserveError;

use crate::error::FitError;
use crate::scale::BoundingBox;

/// Default ceiling on one pixel buffer: 512 MiB, about 134 megapixels of RGBA8.
pub const DEFAULT_MAX_BUFFER_BYTES: u64 = 512 * 1024 * 1024;

/// Resource caps for a fit or a bare decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Widest source accepted, as declared by the image header.
    pub max_source_width: Option<u32>,
    /// Tallest source accepted, as declared by the image header.
    pub max_source_height: Option<u32>,
    /// Largest source area in pixels.
    pub max_source_pixels: Option<u64>,
    /// Largest bounding box area in pixels. The canvas and the scaled
    /// intermediate are never bigger than the box.
    pub max_canvas_pixels: Option<u64>,
    /// Largest single buffer in bytes: decoder output, the RGBA8 source,
    /// the scaled image or the canvas.
    pub max_buffer_bytes: Option<u64>,
}

impl Limits {
    pub const DEFAULT: Limits = Limits {
        max_source_width: None,
        max_source_height: None,
        max_source_pixels: None,
        max_canvas_pixels: None,
        max_buffer_bytes: Some(DEFAULT_MAX_BUFFER_BYTES),
    };

    pub const UNLIMITED: Limits = Limits {
        max_source_width: None,
        max_source_height: None,
        max_source_pixels: None,
        max_canvas_pixels: None,
        max_buffer_bytes: None,
    };

    /// Reject a source whose header declares `width`×`height`, including
    /// the RGBA8 buffer it would decode into.
    pub(crate) fn check_source(&self, width: u32, height: u32) -> Result<(), FitError> {
        if let Some(max) = self.max_source_width
            && width > max
        {
            return Err(FitError::LimitExceeded(format!(
                "source is {width} pixels wide, at most {max} accepted"
            )));
        }
        if let Some(max) = self.max_source_height
            && height > max
        {
            return Err(FitError::LimitExceeded(format!(
                "source is {height} pixels tall, at most {max} accepted"
            )));
        }
        if let Some(max) = self.max_source_pixels
            && u64::from(width) * u64::from(height) > max
        {
            return Err(FitError::LimitExceeded(format!(
                "source {width}x{height} exceeds {max} pixels"
            )));
        }
        self.check_buffer(rgba8_len(width, height)?)
    }

    /// Reject a bounding box whose canvas would exceed the caps.
    pub(crate) fn check_canvas(&self, bbox: BoundingBox) -> Result<(), FitError> {
        if let Some(max) = self.max_canvas_pixels
            && u64::from(bbox.width) * u64::from(bbox.height) > max
        {
            return Err(FitError::LimitExceeded(format!(
                "box {}x{} exceeds {max} canvas pixels",
                bbox.width, bbox.height
            )));
        }
        self.check_buffer(rgba8_len(bbox.width, bbox.height)?)
    }

    /// Reject a single allocation of `bytes`.
    pub(crate) fn check_buffer(&self, bytes: usize) -> Result<(), FitError> {
        if let Some(max) = self.max_buffer_bytes
            && bytes as u64 > max
        {
            return Err(FitError::LimitExceeded(format!(
                "{bytes}-byte buffer over the {max}-byte cap"
            )));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Byte size of an RGBA8 buffer, or `DimensionsTooLarge` on overflow.
pub(crate) fn rgba8_len(width: u32, height: u32) -> Result<usize, FitError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or(FitError::DimensionsTooLarge { width, height })
}

/// `len` copies of `value`, reporting allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, value);
    Ok(buf)
}

/// Empty buffer with room for `len` items.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    Ok(buf)
}
