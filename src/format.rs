//! Source format resolution from filenames and magic bytes.

use core::fmt;

/// Encodings accepted as fit sources.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    /// JPEG, whether named `.jpg` or `.jpeg`.
    Jpeg,
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

impl ImageFormat {
    /// Resolve the format from a filename's extension.
    ///
    /// The extension is everything after the last `.`, compared
    /// case-insensitively. `None` means unsupported, including names
    /// without any extension.
    ///
    /// ```
    /// use zenfit::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_filename("logo.png"), Some(ImageFormat::Png));
    /// assert_eq!(ImageFormat::from_filename("my.logo.JPG"), Some(ImageFormat::Jpeg));
    /// assert_eq!(ImageFormat::from_filename("logo.svg"), None);
    /// ```
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::from_extension(extension(filename)?)
    }

    /// Resolve the format from a bare extension (no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("png") {
            Some(ImageFormat::Png)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    /// Sniff the format from leading magic bytes.
    pub fn from_magic(data: &[u8]) -> Option<Self> {
        if data.starts_with(&PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&JPEG_SOI) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    /// Lowercase canonical extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
        })
    }
}

/// Text after the last `.`, if any.
pub(crate) fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Text before the last `.`, or the whole name when there is no extension.
pub(crate) fn stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
}
