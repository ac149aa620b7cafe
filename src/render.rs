//! Render pipeline.
//!
//! A render is two explicit steps: rasterize the matrix into a base frame,
//! then composite the logo (if any) onto whatever the [`Canvas`] is showing.
//! The base frame is a complete, scannable code on its own.
//!
//! Stale passes are never cancelled. Every pass that completes is applied,
//! and the canvas shows whichever pass was applied last. [`Canvas::last_pass`]
//! records which one that was.

use crate::error::RenderError;
use crate::logo::Logo;
use crate::matrix::Matrix;
use crate::payload::non_empty;
use crate::style::{Rgb, StyleOptions};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, error};

/// Quiet zone around the symbol, in modules.
pub const MARGIN_MODULES: u32 = 1;

/// Logo side as a fraction of the image side.
pub const LOGO_RATIO: f64 = 0.2;

/// Background padding painted around the logo on each side, in pixels.
pub const LOGO_PADDING: f64 = 5.0;

/// Pixels per module when the requested size cannot fit the symbol.
const FALLBACK_SCALE: f64 = 4.0;

/// Rasterizes a matrix into a square RGBA image.
///
/// The module scale is `pixel_size / (width + 2 * margin)` and may be
/// fractional; each output pixel samples the module under it. When the
/// requested size is too small to give every module a pixel, the image is
/// drawn at a fixed scale instead and comes out larger than requested.
pub fn rasterize(matrix: &Matrix, foreground: Rgb, background: Rgb, pixel_size: u32) -> RgbaImage {
    let modules = matrix.width() as u32 + 2 * MARGIN_MODULES;
    let (scale, size) = if pixel_size >= modules {
        (pixel_size as f64 / modules as f64, pixel_size)
    } else {
        (FALLBACK_SCALE, modules * FALLBACK_SCALE as u32)
    };
    let margin = MARGIN_MODULES as f64 * scale;
    let dark = foreground.to_rgba();
    let light = background.to_rgba();

    let mut img = RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (fx, fy) = (x as f64, y as f64);
        let inside = fx >= margin && fy >= margin && fx < size as f64 - margin && fy < size as f64 - margin;
        *pixel = if inside {
            let mx = ((fx - margin) / scale).floor() as i64;
            let my = ((fy - margin) / scale).floor() as i64;
            if matrix.get_module(mx, my) { dark } else { light }
        } else {
            light
        };
    }
    img
}

/// Square footprint of the logo for an image of side `size`:
/// `(origin, side)` in pixels.
pub fn logo_footprint(size: u32) -> (f64, f64) {
    let side = size as f64 * LOGO_RATIO;
    ((size as f64 - side) / 2.0, side)
}

/// Paints a background-colored box slightly larger than the logo footprint,
/// then draws the logo scaled into the footprint at the image center.
pub fn overlay_logo(frame: &mut RgbaImage, logo: &Logo, background: Rgb) {
    let size = frame.width().min(frame.height());
    let (origin, side) = logo_footprint(size);

    let pad_origin = (origin - LOGO_PADDING).round().max(0.0) as u32;
    let pad_end = ((origin + side + LOGO_PADDING).round() as u32).min(size);
    let fill = background.to_rgba();
    for y in pad_origin..pad_end {
        for x in pad_origin..pad_end {
            frame.put_pixel(x, y, fill);
        }
    }

    let logo_side = side.round() as u32;
    if logo_side == 0 {
        return;
    }
    let scaled = imageops::resize(logo.bitmap(), logo_side, logo_side, FilterType::Lanczos3);
    let at = origin.round() as i64;
    imageops::overlay(frame, &scaled, at, at);
}

/// Renders `text` in one go: matrix, then logo. Empty text is replaced with
/// a single space.
pub fn render_image(text: &str, style: &StyleOptions) -> Result<RgbaImage, RenderError> {
    let pass = RenderPass::new(0, text, style.clone());
    let mut frame = pass.draw_matrix()?;
    if let Some(logo) = &style.logo {
        overlay_logo(&mut frame, logo, style.background);
    }
    Ok(frame)
}

/// One render request: the text and style captured when it was issued.
#[derive(Debug, Clone)]
pub struct RenderPass {
    id: u64,
    text: String,
    style: StyleOptions,
}

impl RenderPass {
    pub fn new(id: u64, text: &str, style: StyleOptions) -> Self {
        Self {
            id,
            text: non_empty(text.to_string()),
            style,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    /// Step one: the base frame.
    pub fn draw_matrix(&self) -> Result<RgbaImage, RenderError> {
        if self.style.pixel_size == 0 {
            return Err(RenderError::ZeroSize);
        }
        let matrix = Matrix::encode(&self.text, self.style.error_correction)?;
        Ok(rasterize(
            &matrix,
            self.style.foreground,
            self.style.background,
            self.style.pixel_size,
        ))
    }
}

/// The single drawing surface. Holds the most recently presented frame.
#[derive(Debug, Default)]
pub struct Canvas {
    frame: Option<RgbaImage>,
    last_pass: Option<u64>,
    next_id: u64,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new pass. Earlier passes stay valid and may still be applied.
    pub fn begin(&mut self, text: &str, style: StyleOptions) -> RenderPass {
        self.next_id += 1;
        RenderPass::new(self.next_id, text, style)
    }

    /// Applies the outcome of a pass's matrix step. A failure is logged and
    /// the previous frame stays on the surface.
    pub fn present(&mut self, pass: &RenderPass, outcome: Result<RgbaImage, RenderError>) -> bool {
        match outcome {
            Ok(frame) => {
                self.frame = Some(frame);
                self.last_pass = Some(pass.id);
                true
            }
            Err(err) => {
                error!(pass = pass.id, "{err}");
                false
            }
        }
    }

    /// Step two: paints the pass's logo on top of the current frame. Does
    /// nothing if the pass has no logo or nothing has been drawn yet.
    pub fn overlay(&mut self, pass: &RenderPass) -> bool {
        let Some(logo) = &pass.style.logo else {
            return false;
        };
        let Some(frame) = self.frame.as_mut() else {
            debug!(pass = pass.id, "no frame to draw the logo on");
            return false;
        };
        overlay_logo(frame, logo, pass.style.background);
        self.last_pass = Some(pass.id);
        true
    }

    /// Runs both steps of a fresh pass in order. The logo step only runs
    /// when the base frame was produced.
    pub fn render(&mut self, text: &str, style: StyleOptions) -> Result<u64, RenderError> {
        let pass = self.begin(text, style);
        let frame = pass
            .draw_matrix()
            .inspect_err(|err| error!(pass = pass.id, "{err}"))?;
        self.present(&pass, Ok(frame));
        self.overlay(&pass);
        Ok(pass.id)
    }

    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    /// Copies the current frame so later renders do not affect it.
    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.frame.clone()
    }

    pub fn last_pass(&self) -> Option<u64> {
        self.last_pass
    }
}
