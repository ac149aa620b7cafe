//! Error types shared across the crate.
//!
//! Payload encoding is total and has no error type. Everything that touches an
//! external collaborator (matrix encoder, image decoder, storage, share target)
//! reports through one of the enums below.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce the base QR raster.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The matrix encoder rejected the text, usually because it does not fit
    /// in a symbol at the high error-correction tier.
    #[error("QR matrix generation failed: {0}")]
    Matrix(#[from] qrcode::types::QrError),

    #[error("refusing to rasterize empty text")]
    EmptyText,

    #[error("pixel size must be positive")]
    ZeroSize,
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("not a base64 data URI")]
    NotDataUri,

    #[error("invalid base64 in data URI: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode logo image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read logo file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing has been rendered yet")]
    NoFrame,

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Sharing is not supported on this device")]
    Unsupported,

    #[error("share failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    Color(String),

    #[error("pixel size {0} is outside 200..=1000 or not a multiple of 50")]
    PixelSize(u32),

    #[error("history capacity must be at least 1")]
    HistoryCapacity,

    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}
