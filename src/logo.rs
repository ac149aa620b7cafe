//! Center logo bitmaps.
//!
//! A logo usually arrives as a `data:` URI (what a file picker hands back),
//! but raw bytes and file paths are accepted as well. Decoding is done by the
//! `image` crate, so any format it has enabled will load.

use crate::error::LogoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    bitmap: RgbaImage,
}

impl Logo {
    pub fn from_image(bitmap: RgbaImage) -> Self {
        Self { bitmap }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LogoError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_image(decoded.to_rgba8()))
    }

    /// Decodes `data:<mime>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, LogoError> {
        let rest = uri.strip_prefix("data:").ok_or(LogoError::NotDataUri)?;
        let (meta, payload) = rest.split_once(',').ok_or(LogoError::NotDataUri)?;
        if !meta.ends_with(";base64") {
            return Err(LogoError::NotDataUri);
        }
        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LogoError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LogoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn red_png(side: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(side, side, Rgba([255, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_from_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(red_png(4)));
        let logo = Logo::from_data_uri(&uri).unwrap();
        assert_eq!(logo.bitmap().dimensions(), (4, 4));
        assert_eq!(logo.bitmap().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(matches!(Logo::from_data_uri("https://x/logo.png"), Err(LogoError::NotDataUri)));
        assert!(matches!(Logo::from_data_uri("data:image/png,abc"), Err(LogoError::NotDataUri)));
        assert!(matches!(Logo::from_data_uri("data:image/png;base64,@@@"), Err(LogoError::Base64(_))));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"not an image"));
        assert!(matches!(Logo::from_data_uri(&uri), Err(LogoError::Decode(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Logo::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LogoError::Read { .. }));
    }
}
