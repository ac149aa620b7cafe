use crate::error::{ExportError, ShareError};
use crate::matrix::Matrix;
use crate::render::MARGIN_MODULES;
use crate::style::Rgb;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PNG_MIME: &str = "image/png";
pub const SHARE_FILE_NAME: &str = "qr-code.png";

/*---- Raster export ----*/

/// Encodes a frame as PNG.
pub fn png_bytes(frame: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    frame.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encodes a frame as a `data:image/png;base64,...` URL.
pub fn png_data_url(frame: &RgbaImage) -> Result<String, ExportError> {
    let bytes = png_bytes(frame)?;
    Ok(format!("data:{PNG_MIME};base64,{}", STANDARD.encode(bytes)))
}

/// Download name with a millisecond timestamp suffix, e.g.
/// `qrcraft-qr-1700000000000.png`.
pub fn download_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}.png", at.timestamp_millis())
}

/// Writes a frame as PNG into `directory`, creating it if needed.
///
/// # Arguments
///
/// * `directory` - Where the file goes.
/// * `file_name` - File name including extension.
/// * `frame` - The rendered image.
///
/// # Errors
///
/// Returns an [`ExportError`] if the directory cannot be created or the
/// file cannot be encoded or written.
pub fn save_png(directory: &Path, file_name: &str, frame: &RgbaImage) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        fs::create_dir_all(directory).map_err(|source| ExportError::Io {
            path: directory.to_path_buf(),
            source,
        })?;
    }
    let path = directory.join(file_name);
    let bytes = png_bytes(frame)?;
    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "saved QR image");
    Ok(path)
}

/*---- Vector export ----*/

// Returns a string of SVG code for an image depicting the given matrix,
// with a one-module quiet zone. Always uses Unix newlines.
pub fn to_svg_string(matrix: &Matrix, foreground: Rgb, background: Rgb) -> String {
    let border = MARGIN_MODULES as i64;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    let dimension = matrix.width() as i64 + border * 2;
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>\n");
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..matrix.width() as i64 {
        for x in 0..matrix.width() as i64 {
            if matrix.get_module(x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += &format!("\" fill=\"{foreground}\"/>\n");
    result += "</svg>\n";
    result
}

/// Renders the matrix with Unicode half blocks for a terminal preview.
pub fn to_terminal_string(matrix: &Matrix) -> String {
    let border = MARGIN_MODULES as i64;
    let size = matrix.width() as i64;
    let mut out = String::new();
    let mut y = -border;
    while y < size + border {
        for x in -border..size + border {
            let top = matrix.get_module(x, y);
            let bottom = matrix.get_module(x, y + 1);
            out.push(match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
        y += 2;
    }
    out
}

/*---- Share ----*/

/// What gets handed to a platform share action.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub mime: &'static str,
    pub png: Vec<u8>,
}

impl ShareRequest {
    pub fn new(title: &str, text: &str, frame: &RgbaImage) -> Result<Self, ExportError> {
        Ok(Self {
            title: title.to_string(),
            text: text.to_string(),
            file_name: SHARE_FILE_NAME.to_string(),
            mime: PNG_MIME,
            png: png_bytes(frame)?,
        })
    }
}

/// A native share capability.
pub trait ShareTarget {
    fn share(&self, request: ShareRequest) -> Result<(), ShareError>;
}

/// For platforms without native sharing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedShare;

impl ShareTarget for UnsupportedShare {
    fn share(&self, _request: ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ErrorCorrection, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
    use chrono::TimeZone;
    use image::Rgba;

    fn frame() -> RgbaImage {
        RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]))
    }

    #[test]
    fn test_png_bytes_decode_back() {
        let bytes = png_bytes(&frame()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, frame());
    }

    #[test]
    fn test_png_data_url_prefix() {
        let url = png_data_url(&frame()).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_download_file_name() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(download_file_name("qrcraft-qr", at), "qrcraft-qr-1700000000123.png");
    }

    #[test]
    fn test_save_png_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = save_png(&nested, "x.png", &frame()).unwrap();
        assert!(path.exists());
        assert_eq!(path, nested.join("x.png"));
    }

    #[test]
    fn test_to_svg_string() {
        let matrix = Matrix::encode("HELLO WORLD", ErrorCorrection::High).unwrap();
        let svg = to_svg_string(&matrix, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("fill=\"#0f172a\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        // top-left finder module sits just inside the quiet zone
        assert!(svg.contains("\"M1,1h1v1h-1z"));
    }

    #[test]
    fn test_terminal_string_height() {
        let matrix = Matrix::encode("hi", ErrorCorrection::High).unwrap();
        let rows = to_terminal_string(&matrix).lines().count();
        assert_eq!(rows, (matrix.width() + 2).div_ceil(2));
    }

    #[test]
    fn test_unsupported_share() {
        let request = ShareRequest::new("t", "c", &frame()).unwrap();
        assert_eq!(request.file_name, "qr-code.png");
        assert!(matches!(UnsupportedShare.share(request), Err(ShareError::Unsupported)));
    }
}
