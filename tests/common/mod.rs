//! Shared fixtures: in-memory PNG and JPEG sources.

#![allow(dead_code)]

use rgb::RGBA8;
use zenfit::{DecodeRequest, ImageFormat, RasterImage, Unstoppable};

/// Opaque image whose pixels encode their own coordinates.
pub fn gradient(w: usize, h: usize) -> RasterImage {
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            pixels.push(RGBA8::new((x % 256) as u8, (y % 256) as u8, 77, 255));
        }
    }
    RasterImage::new(pixels, w, h)
}

pub fn solid(w: usize, h: usize, px: RGBA8) -> RasterImage {
    RasterImage::new(vec![px; w * h], w, h)
}

pub fn png_bytes(img: &RasterImage) -> Vec<u8> {
    zenfit::encode_png(img.as_ref(), Unstoppable).unwrap()
}

pub fn decode_png(data: &[u8]) -> RasterImage {
    DecodeRequest::new(data, ImageFormat::Png)
        .decode(Unstoppable)
        .unwrap()
}

/// Bounding rectangle `(x, y, w, h)` of pixels with non-zero alpha.
pub fn content_rect(img: &RasterImage) -> Option<(usize, usize, usize, usize)> {
    let mut found = None::<(usize, usize, usize, usize)>;
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            if px.a == 0 {
                continue;
            }
            found = Some(match found {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    found.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Baseline grayscale JPEG of mid-gray (128) pixels.
///
/// Width and height must be multiples of 8. Every block codes DC diff 0 and
/// an immediate EOB, each as the single 2-bit Huffman code `00`.
pub fn gray_jpeg(width: u16, height: u16) -> Vec<u8> {
    assert!(width % 8 == 0 && height % 8 == 0);
    let blocks = usize::from(width / 8) * usize::from(height / 8);
    gray_jpeg_stream(width, height, blocks)
}

/// Grayscale JPEG whose frame header declares `width`×`height` but whose
/// scan holds a single block.
pub fn gray_jpeg_declaring(width: u16, height: u16) -> Vec<u8> {
    gray_jpeg_stream(width, height, 1)
}

fn gray_jpeg_stream(width: u16, height: u16, blocks: usize) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    // DQT: table 0, all ones
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend_from_slice(&[1u8; 64]);
    // SOF0: 8-bit, one component, 1x1 sampling, quant table 0
    out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    // DHT: DC table 0 and AC table 0, one 2-bit code for symbol 0
    for class in [0x00u8, 0x10] {
        out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, class]);
        let mut counts = [0u8; 16];
        counts[1] = 1;
        out.extend_from_slice(&counts);
        out.push(0x00);
    }
    // SOS
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    // 4 zero bits per block, padded with ones
    out.extend(std::iter::repeat_n(0x00u8, blocks / 2));
    if blocks % 2 == 1 {
        out.push(0x0F);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Color JPEG of a single flat color, from the `image` encoder.
pub fn rgb_jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let samples: Vec<u8> = std::iter::repeat_n(color, (width * height) as usize)
        .flatten()
        .collect();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 100)
        .encode(&samples, width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// A real 1x1 PNG whose IHDR is rewritten to declare `width`×`height`.
pub fn png_declaring(width: u32, height: u32) -> Vec<u8> {
    let mut png = png_bytes(&solid(1, 1, RGBA8::new(1, 2, 3, 255)));
    // Signature (8), length (4), "IHDR" (4), then width and height.
    png[16..20].copy_from_slice(&width.to_be_bytes());
    png[20..24].copy_from_slice(&height.to_be_bytes());
    // CRC covers the chunk type and its 13 data bytes.
    let crc = crc32fast::hash(&png[12..29]);
    png[29..33].copy_from_slice(&crc.to_be_bytes());
    png
}
