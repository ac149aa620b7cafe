//! Module grid produced by the `qrcode` crate.
//!
//! The symbol math lives entirely in that dependency; this module only asks
//! for the requested error-correction tier and exposes the result as a square
//! grid of dark/light modules.

use crate::error::RenderError;
use crate::style::ErrorCorrection;
use qrcode::{Color, QrCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    dark: Vec<bool>,
}

impl Matrix {
    /// Encodes `text` as a QR symbol at the given tier.
    ///
    /// Empty text is refused; callers substitute a single space before this
    /// point.
    pub fn encode(text: &str, level: ErrorCorrection) -> Result<Self, RenderError> {
        if text.is_empty() {
            return Err(RenderError::EmptyText);
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), level.into())?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self { width, dark })
    }

    /// Side length in modules, without quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the module at (x, y) is dark. Coordinates outside
    /// the symbol are light.
    pub fn get_module(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.dark[(y * w + x) as usize]
    }
}
