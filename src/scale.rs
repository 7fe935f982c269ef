//! Aspect-preserving scaling into a bounding box.
//!
//! The axis with the larger source/box ratio is *binding*: it lands exactly on
//! the box edge and the other axis is derived from it, rounding down, so the
//! result never overshoots the box.
//!
//! ```
//! use zenfit::{Binding, BoundingBox, scaled_size};
//!
//! let bbox = BoundingBox::new(600, 300);
//! assert_eq!(Binding::of(400, 400, bbox), Binding::Height);
//! assert_eq!(scaled_size(400, 400, bbox), (300, 300));
//! ```

use enough::Stop;
use imgref::ImgRef;
use rgb::RGBA8;

use crate::error::FitError;
use crate::limits::try_with_capacity;
use crate::pixel::RasterImage;

/// Target frame for a fit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Box used when a caller leaves a dimension at zero.
    pub const DEFAULT: BoundingBox = BoundingBox {
        width: 600,
        height: 300,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Substitute [`DEFAULT`](Self::DEFAULT) per axis for zero dimensions.
    ///
    /// ```
    /// use zenfit::BoundingBox;
    ///
    /// assert_eq!(BoundingBox::or_default(0, 0), BoundingBox::new(600, 300));
    /// assert_eq!(BoundingBox::or_default(200, 0), BoundingBox::new(200, 300));
    /// ```
    pub const fn or_default(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 {
                Self::DEFAULT.width
            } else {
                width
            },
            height: if height == 0 {
                Self::DEFAULT.height
            } else {
                height
            },
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Source-to-box ratio per axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleFactor {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactor {
    pub fn new(src_w: u32, src_h: u32, bbox: BoundingBox) -> Self {
        Self {
            x: f64::from(src_w) / f64::from(bbox.width),
            y: f64::from(src_h) / f64::from(bbox.height),
        }
    }

    /// The binding (larger) factor.
    pub fn binding(&self) -> f64 {
        self.x.max(self.y)
    }
}

/// Which box edge the scaled image touches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Width lands on the box width; height is derived.
    Width,
    /// Height lands on the box height; width is derived. Also used on ties.
    Height,
}

impl Binding {
    /// Pick the binding axis, comparing `src_w/box_w` against `src_h/box_h`
    /// exactly by cross-multiplication.
    pub fn of(src_w: u32, src_h: u32, bbox: BoundingBox) -> Self {
        let wide = u64::from(src_w) * u64::from(bbox.height);
        let tall = u64::from(src_h) * u64::from(bbox.width);
        if wide > tall {
            Binding::Width
        } else {
            Binding::Height
        }
    }
}

/// Dimensions of `src_w`×`src_h` scaled to fit inside `bbox`.
///
/// The binding axis equals the box; the free axis is
/// `floor(src * box / src_binding)`, never less than one pixel.
/// Source dimensions must be non-zero.
pub fn scaled_size(src_w: u32, src_h: u32, bbox: BoundingBox) -> (u32, u32) {
    let derive = |free: u32, box_binding: u32, src_binding: u32| -> u32 {
        let v = u64::from(free) * u64::from(box_binding) / u64::from(src_binding);
        // Floor, except that a sliver thinner than one output pixel keeps a
        // single row or column instead of a zero-area image.
        v.max(1) as u32
    };
    match Binding::of(src_w, src_h, bbox) {
        Binding::Width => (bbox.width, derive(src_h, bbox.width, src_w)),
        Binding::Height => (derive(src_w, bbox.height, src_h), bbox.height),
    }
}

/// Resampling filter for [`scale`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Sample the source pixel whose center is nearest. No blending.
    #[default]
    Nearest,
    /// Blend the four surrounding source pixels in premultiplied alpha.
    Bilinear,
}

/// Scale `src` to fit inside `bbox`, preserving aspect ratio.
///
/// Upscales as well as downscales. Same-size input is copied unchanged with
/// either filter.
pub fn scale(
    src: ImgRef<'_, RGBA8>,
    bbox: BoundingBox,
    filter: Filter,
    stop: impl Stop,
) -> Result<RasterImage, FitError> {
    scale_dyn(src, bbox, filter, &stop)
}

pub(crate) fn scale_dyn(
    src: ImgRef<'_, RGBA8>,
    bbox: BoundingBox,
    filter: Filter,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    let src_w = src.width() as u32;
    let src_h = src.height() as u32;
    if src_w == 0 || src_h == 0 {
        return Err(FitError::ZeroDimension {
            width: src_w,
            height: src_h,
        });
    }
    if bbox.is_empty() {
        return Err(FitError::ZeroDimension {
            width: bbox.width,
            height: bbox.height,
        });
    }
    let (dst_w, dst_h) = scaled_size(src_w, src_h, bbox);
    resample(src, dst_w as usize, dst_h as usize, filter, stop)
}

/// Resample `src` to exactly `dst_w`×`dst_h`.
pub(crate) fn resample(
    src: ImgRef<'_, RGBA8>,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    if src.width() == dst_w && src.height() == dst_h {
        let mut out = output_buffer(dst_w, dst_h)?;
        out.extend(src.pixels());
        return Ok(RasterImage::new(out, dst_w, dst_h));
    }
    match filter {
        Filter::Nearest => nearest(src, dst_w, dst_h, stop),
        Filter::Bilinear => bilinear(src, dst_w, dst_h, stop),
    }
}

fn output_buffer(width: usize, height: usize) -> Result<Vec<RGBA8>, FitError> {
    let len = width * height;
    try_with_capacity(len).map_err(|_| FitError::out_of_memory(len.saturating_mul(4)))
}

/// Index of the source sample whose center is nearest to destination `d`.
fn nearest_index(d: usize, src_len: usize, dst_len: usize) -> usize {
    let s = (2 * d as u64 + 1) * src_len as u64 / (2 * dst_len as u64);
    (s as usize).min(src_len - 1)
}

fn nearest(
    src: ImgRef<'_, RGBA8>,
    dst_w: usize,
    dst_h: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    let x_map: Vec<usize> = (0..dst_w)
        .map(|x| nearest_index(x, src.width(), dst_w))
        .collect();
    let buf = src.buf();
    let stride = src.stride();

    let mut out = output_buffer(dst_w, dst_h)?;
    for y in 0..dst_h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row_start = nearest_index(y, src.height(), dst_h) * stride;
        let row = &buf[row_start..row_start + src.width()];
        out.extend(x_map.iter().map(|&sx| row[sx]));
    }
    Ok(RasterImage::new(out, dst_w, dst_h))
}

/// Source sample pair and weight of the second sample for destination `d`.
fn bilinear_taps(d: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let center = (d as f64 + 0.5) * src_len as f64 / dst_len as f64 - 0.5;
    let clamped = center.clamp(0.0, (src_len - 1) as f64);
    let i0 = clamped.floor() as usize;
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, (clamped - i0 as f64) as f32)
}

fn premultiplied(px: RGBA8) -> [f32; 4] {
    let a = f32::from(px.a) / 255.0;
    [
        f32::from(px.r) * a,
        f32::from(px.g) * a,
        f32::from(px.b) * a,
        f32::from(px.a),
    ]
}

fn unpremultiplied(acc: [f32; 4]) -> RGBA8 {
    let alpha = acc[3];
    if alpha < 0.5 {
        return crate::pixel::TRANSPARENT;
    }
    let unmul = |c: f32| (c * 255.0 / alpha).round().clamp(0.0, 255.0) as u8;
    RGBA8::new(
        unmul(acc[0]),
        unmul(acc[1]),
        unmul(acc[2]),
        alpha.round().clamp(0.0, 255.0) as u8,
    )
}

fn bilinear(
    src: ImgRef<'_, RGBA8>,
    dst_w: usize,
    dst_h: usize,
    stop: &dyn Stop,
) -> Result<RasterImage, FitError> {
    let x_taps: Vec<(usize, usize, f32)> = (0..dst_w)
        .map(|x| bilinear_taps(x, src.width(), dst_w))
        .collect();
    let buf = src.buf();
    let stride = src.stride();
    let at = |x: usize, y: usize| premultiplied(buf[y * stride + x]);

    let mut out = output_buffer(dst_w, dst_h)?;
    for y in 0..dst_h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let (y0, y1, ty) = bilinear_taps(y, src.height(), dst_h);
        for &(x0, x1, tx) in &x_taps {
            let (p00, p10, p01, p11) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));
            let mut acc = [0f32; 4];
            for c in 0..4 {
                let top = p00[c] + (p10[c] - p00[c]) * tx;
                let bottom = p01[c] + (p11[c] - p01[c]) * tx;
                acc[c] = top + (bottom - top) * ty;
            }
            out.push(unpremultiplied(acc));
        }
    }
    Ok(RasterImage::new(out, dst_w, dst_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    fn solid(w: usize, h: usize, px: RGBA8) -> RasterImage {
        RasterImage::new(vec![px; w * h], w, h)
    }

    // ── scaled_size ─────────────────────────────────────────────────────

    #[test]
    fn same_aspect_fills_box() {
        // 800x400 vs 600x300: equal factors, tie goes to height.
        assert_eq!(Binding::of(800, 400, BoundingBox::DEFAULT), Binding::Height);
        assert_eq!(scaled_size(800, 400, BoundingBox::DEFAULT), (600, 300));
    }

    #[test]
    fn square_into_landscape_is_height_bound() {
        assert_eq!(scaled_size(400, 400, BoundingBox::DEFAULT), (300, 300));
    }

    #[test]
    fn wide_source_is_width_bound() {
        // 1000x200: factors 1.67 vs 0.67
        assert_eq!(Binding::of(1000, 200, BoundingBox::DEFAULT), Binding::Width);
        assert_eq!(scaled_size(1000, 200, BoundingBox::DEFAULT), (600, 120));
    }

    #[test]
    fn derived_axis_rounds_down() {
        // 1000x333 into 600x300: 333*600/1000 = 199.8
        assert_eq!(scaled_size(1000, 333, BoundingBox::DEFAULT), (600, 199));
    }

    #[test]
    fn upscales_small_sources() {
        assert_eq!(scaled_size(3, 2, BoundingBox::new(30, 30)), (30, 20));
    }

    #[test]
    fn derived_axis_never_collapses_to_zero() {
        assert_eq!(scaled_size(10_000, 1, BoundingBox::new(100, 100)), (100, 1));
        // floor(1 * 600 / 10000) is 0; one row survives.
        assert_eq!(scaled_size(10_000, 1, BoundingBox::DEFAULT), (600, 1));
        assert_eq!(scaled_size(1, 10_000, BoundingBox::DEFAULT), (1, 300));
    }

    #[test]
    fn fit_invariant_over_grid() {
        let boxes = [(600, 300), (1, 1), (7, 13), (100, 100), (333, 77)];
        for &(bw, bh) in &boxes {
            let bbox = BoundingBox::new(bw, bh);
            for sw in [1u32, 2, 5, 99, 300, 601, 1920] {
                for sh in [1u32, 3, 7, 100, 299, 1080] {
                    let (w, h) = scaled_size(sw, sh, bbox);
                    assert!(w <= bw && h <= bh, "{sw}x{sh} in {bw}x{bh} -> {w}x{h}");
                    assert!(w == bw || h == bh, "{sw}x{sh} in {bw}x{bh} -> {w}x{h}");
                }
            }
        }
    }

    #[test]
    fn aspect_preserved_within_a_pixel() {
        let bbox = BoundingBox::DEFAULT;
        for (sw, sh) in [(1920u32, 1080u32), (1080, 1920), (500, 499), (640, 480)] {
            let (w, h) = scaled_size(sw, sh, bbox);
            let ideal_h = f64::from(w) * f64::from(sh) / f64::from(sw);
            let ideal_w = f64::from(h) * f64::from(sw) / f64::from(sh);
            assert!(
                (f64::from(h) - ideal_h).abs() <= 1.0 || (f64::from(w) - ideal_w).abs() <= 1.0,
                "{sw}x{sh} -> {w}x{h}"
            );
        }
    }

    #[test]
    fn scale_factor_reports_binding() {
        let f = ScaleFactor::new(400, 400, BoundingBox::DEFAULT);
        assert!((f.x - 0.6667).abs() < 1e-3);
        assert!((f.y - 1.3333).abs() < 1e-3);
        assert_eq!(f.binding(), f.y);
    }

    #[test]
    fn or_default_per_axis() {
        assert_eq!(BoundingBox::or_default(0, 0), BoundingBox::DEFAULT);
        assert_eq!(BoundingBox::or_default(0, 50), BoundingBox::new(600, 50));
        assert_eq!(BoundingBox::or_default(42, 7), BoundingBox::new(42, 7));
    }

    // ── resampling ──────────────────────────────────────────────────────

    #[test]
    fn nearest_index_centers() {
        // 2x downscale samples the second of each pair.
        assert_eq!(nearest_index(0, 4, 2), 1);
        assert_eq!(nearest_index(1, 4, 2), 3);
        // Identity
        for d in 0..7 {
            assert_eq!(nearest_index(d, 7, 7), d);
        }
        // Upscale replicates.
        assert_eq!(nearest_index(0, 2, 4), 0);
        assert_eq!(nearest_index(1, 2, 4), 0);
        assert_eq!(nearest_index(2, 2, 4), 1);
        assert_eq!(nearest_index(3, 2, 4), 1);
    }

    #[test]
    fn nearest_picks_source_pixels_only() {
        let a = RGBA8::new(255, 0, 0, 255);
        let b = RGBA8::new(0, 0, 255, 128);
        let pixels = (0..16).map(|i| if i % 2 == 0 { a } else { b }).collect();
        let src = RasterImage::new(pixels, 4, 4);
        let out = scale(src.as_ref(), BoundingBox::new(3, 3), Filter::Nearest, Unstoppable)
            .unwrap();
        assert_eq!((out.width(), out.height()), (3, 3));
        assert!(out.buf().iter().all(|&p| p == a || p == b));
    }

    #[test]
    fn same_size_is_copied() {
        let pixels: Vec<RGBA8> = (0..12u8).map(|i| RGBA8::new(i, i * 2, i * 3, i * 20)).collect();
        let src = RasterImage::new(pixels.clone(), 4, 3);
        for filter in [Filter::Nearest, Filter::Bilinear] {
            let out = scale(src.as_ref(), BoundingBox::new(4, 3), filter, Unstoppable).unwrap();
            assert_eq!(out.buf(), &pixels);
        }
    }

    #[test]
    fn bilinear_keeps_solid_color() {
        let px = RGBA8::new(12, 200, 99, 180);
        let src = solid(9, 5, px);
        let out = scale(src.as_ref(), BoundingBox::new(20, 20), Filter::Bilinear, Unstoppable)
            .unwrap();
        assert_eq!((out.width(), out.height()), (20, 11));
        assert!(out.buf().iter().all(|&p| p == px));
    }

    #[test]
    fn bilinear_ignores_color_of_transparent_pixels() {
        let red = RGBA8::new(255, 0, 0, 255);
        let hidden = RGBA8::new(0, 255, 0, 0);
        let src = RasterImage::new(vec![red, hidden], 2, 1);
        let out = resample(src.as_ref(), 1, 1, Filter::Bilinear, &Unstoppable).unwrap();
        let p = out.buf()[0];
        assert_eq!((p.r, p.g), (255, 0));
        assert!(p.a > 100 && p.a < 150);
    }

    #[test]
    fn rejects_empty_box() {
        let src = solid(2, 2, RGBA8::new(0, 0, 0, 255));
        let err = scale(src.as_ref(), BoundingBox::new(0, 10), Filter::Nearest, Unstoppable)
            .unwrap_err();
        assert!(matches!(err, FitError::ZeroDimension { .. }));
    }
}
