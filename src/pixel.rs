//! Per-pixel conversion and compositing on straight-alpha RGBA8.

use rgb::AsPixels as _;
use rgb::{RGB8, RGBA8};

/// Decoded RGBA8 bitmap, 8 bits per channel, straight (non-premultiplied) alpha.
pub type RasterImage = imgref::ImgVec<RGBA8>;

pub(crate) const TRANSPARENT: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Porter-Duff source-over of `src` onto `dst`.
///
/// Exact for a transparent destination: the result equals `src`, except that
/// fully transparent sources collapse to [`TRANSPARENT`].
pub fn composite_over(src: RGBA8, dst: RGBA8) -> RGBA8 {
    let sa = u32::from(src.a);
    if sa == 255 {
        return src;
    }
    let da = u32::from(dst.a);
    // Output alpha scaled by 255.
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return TRANSPARENT;
    }
    let blend = |s: u8, d: u8| -> u8 {
        let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
        ((num + out_a / 2) / out_a) as u8
    };
    RGBA8 {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: ((out_a + 127) / 255) as u8,
    }
}

/// Expand 8-bit grayscale samples to opaque RGBA8.
pub(crate) fn gray8_to_rgba(samples: &[u8]) -> Vec<RGBA8> {
    samples.iter().map(|&v| RGBA8::new(v, v, v, 255)).collect()
}

/// Expand 8-bit gray+alpha pairs to RGBA8.
pub(crate) fn gray_alpha8_to_rgba(samples: &[u8]) -> Vec<RGBA8> {
    samples
        .chunks_exact(2)
        .map(|p| RGBA8::new(p[0], p[0], p[0], p[1]))
        .collect()
}

/// Expand packed RGB triples to opaque RGBA8.
pub(crate) fn rgb8_to_rgba(samples: &[u8]) -> Vec<RGBA8> {
    let pixels: &[RGB8] = samples.as_pixels();
    pixels
        .iter()
        .map(|p| RGBA8::new(p.r, p.g, p.b, 255))
        .collect()
}

pub(crate) fn rgba8_to_rgba(samples: &[u8]) -> Vec<RGBA8> {
    let pixels: &[RGBA8] = samples.as_pixels();
    pixels.to_vec()
}
