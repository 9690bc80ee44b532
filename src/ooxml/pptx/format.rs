//! Format types for PPTX presentations.

use crate::common::RGBColor;
use crate::ooxml::error::{OoxmlError, Result};
use std::io::Cursor;

/// Image format types supported by PPTX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Get the file extension for this image format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF: 47 49 46 38 (GIF8)
        if bytes.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
            return Some(Self::Gif);
        }

        // BMP: 42 4D (BM)
        if bytes.starts_with(&[0x42, 0x4D]) {
            return Some(Self::Bmp);
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        None
    }

    /// Pixel size `(width, height)` read from the image header.
    ///
    /// Fails for unrecognized formats and for headers the decoder rejects.
    pub fn pixel_size(bytes: &[u8]) -> Result<(u32, u32)> {
        let format = Self::detect_from_bytes(bytes)
            .ok_or_else(|| OoxmlError::InvalidImage("unrecognized image format".to_string()))?;
        image::ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
            .into_dimensions()
            .map_err(|e| OoxmlError::InvalidImage(e.to_string()))
    }

    /// The matching decoder format of the `image` crate.
    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Text formatting properties for a text box run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFormat {
    /// Font family
    pub font: Option<String>,
    /// Font size in points
    pub size: Option<f64>,
    /// Bold text
    pub bold: Option<bool>,
    /// Italic text
    pub italic: Option<bool>,
    /// Underline text
    pub underline: Option<bool>,
    /// Text color
    pub color: Option<RGBColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x89, b'P', b'N', b'G', 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x4D, 0x4D, 0x00, 0x2A]),
            Some(ImageFormat::Tiff)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"<svg"), None);
        assert_eq!(ImageFormat::detect_from_bytes(b"BM"), None);
    }

    #[test]
    fn test_pixel_size() {
        let mut png = Vec::new();
        image::RgbImage::new(40, 25)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(ImageFormat::pixel_size(&png).unwrap(), (40, 25));

        assert!(ImageFormat::pixel_size(b"not an image").is_err());
        assert!(ImageFormat::pixel_size(&png[..12]).is_err());
    }

    #[test]
    fn test_extension_and_mime() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Bmp.mime_type(), "image/bmp");
    }
}
