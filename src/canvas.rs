//! Centering a scaled image on a transparent, box-sized canvas.

use enough::Stop;
use imgref::ImgRef;
use rgb::RGBA8;

use crate::error::FitError;
use crate::limits::{rgba8_len, try_filled};
use crate::pixel::{RasterImage, TRANSPARENT, composite_over};
use crate::scale::BoundingBox;

/// Top-left placement of a `width`×`height` image centered in `bbox`.
///
/// Odd leftover space puts the extra pixel after the image.
///
/// ```
/// use zenfit::{BoundingBox, center_offset};
///
/// assert_eq!(center_offset(BoundingBox::new(600, 300), 300, 300), (150, 0));
/// assert_eq!(center_offset(BoundingBox::new(600, 300), 599, 297), (0, 1));
/// ```
pub fn center_offset(bbox: BoundingBox, width: u32, height: u32) -> (u32, u32) {
    (
        bbox.width.saturating_sub(width) / 2,
        bbox.height.saturating_sub(height) / 2,
    )
}

/// Allocate a transparent `bbox`-sized canvas and composite `scaled` onto it,
/// centered, with source-over.
///
/// `scaled` is expected to fit the box already; anything that would fall
/// outside the canvas is clipped. A canvas that cannot be allocated is
/// reported as [`FitError::Encode`].
pub fn center(
    scaled: ImgRef<'_, RGBA8>,
    bbox: BoundingBox,
    stop: impl Stop,
) -> Result<RasterImage, FitError> {
    center_dyn(scaled, bbox, &stop)
}

pub(crate) fn center_dyn(
    scaled: ImgRef<'_, RGBA8>,
    bbox: BoundingBox,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    if bbox.is_empty() {
        return Err(FitError::ZeroDimension {
            width: bbox.width,
            height: bbox.height,
        });
    }
    let bytes = rgba8_len(bbox.width, bbox.height)?;
    let pixels = try_filled(bytes / 4, TRANSPARENT).map_err(|_| FitError::out_of_memory(bytes))?;
    let canvas_w = bbox.width as usize;
    let canvas_h = bbox.height as usize;
    let mut canvas = RasterImage::new(pixels, canvas_w, canvas_h);

    let (ox, oy) = center_offset(bbox, scaled.width() as u32, scaled.height() as u32);
    let (ox, oy) = (ox as usize, oy as usize);
    let copy_w = scaled.width().min(canvas_w - ox);

    for (row_idx, (src_row, dst_row)) in scaled
        .rows()
        .zip(canvas.rows_mut().skip(oy))
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for (dst, &src) in dst_row[ox..ox + copy_w].iter_mut().zip(src_row) {
            *dst = composite_over(src, *dst);
        }
    }
    Ok(canvas)
}
