//! Styling options for a rendered code.

use crate::error::ConfigError;
use crate::logo::Logo;
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FOREGROUND: Rgb = Rgb([0xff, 0xff, 0xff]);
pub const DEFAULT_BACKGROUND: Rgb = Rgb([0x0f, 0x17, 0x2a]);
pub const DEFAULT_PIXEL_SIZE: u32 = 350;

/// An opaque sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Accepts `#rrggbb` or the `#rgb` shorthand, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Color(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
            3 => {
                let mut out = [0u8; 3];
                for (slot, i) in out.iter_mut().zip(0..3) {
                    let v = channel(&hex[i..i + 1])?;
                    *slot = v * 17;
                }
                Ok(Rgb(out))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// QR redundancy tier. Only the highest is ever requested, so that a centered
/// logo covering part of the symbol still scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    #[default]
    High,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleOptions {
    pub foreground: Rgb,
    pub background: Rgb,
    /// Side of the square output image in pixels.
    pub pixel_size: u32,
    pub logo: Option<Logo>,
    pub error_correction: ErrorCorrection,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            pixel_size: DEFAULT_PIXEL_SIZE,
            logo: None,
            error_correction: ErrorCorrection::High,
        }
    }
}

impl StyleOptions {
    pub fn with_colors(mut self, foreground: Rgb, background: Rgb) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    pub fn with_logo(mut self, logo: Option<Logo>) -> Self {
        self.logo = logo;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!("#0f172a".parse::<Rgb>().unwrap(), DEFAULT_BACKGROUND);
        assert_eq!("#FFFFFF".parse::<Rgb>().unwrap(), DEFAULT_FOREGROUND);
        assert_eq!("#f80".parse::<Rgb>().unwrap(), Rgb([0xff, 0x88, 0x00]));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["0f172a", "#12345", "#gggggg", "", "#", "#ééé"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_display_round_trips_lowercase() {
        let color: Rgb = "#ABCDEF".parse().unwrap();
        assert_eq!(color.to_string(), "#abcdef");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#abcdef\"");
    }

    #[test]
    fn test_default_style() {
        let style = StyleOptions::default();
        assert_eq!(style.pixel_size, 350);
        assert_eq!(style.error_correction, ErrorCorrection::High);
        assert_eq!(qrcode::EcLevel::from(style.error_correction), qrcode::EcLevel::H);
        assert!(style.logo.is_none());
    }
}
