use crate::error::ConfigError;
use crate::history::HISTORY_CAPACITY;
use crate::style::{Rgb, StyleOptions, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_PIXEL_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const MIN_PIXEL_SIZE: u32 = 200;
pub const MAX_PIXEL_SIZE: u32 = 1000;
pub const PIXEL_SIZE_STEP: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_foreground")]
    pub foreground: Rgb,

    #[serde(default = "default_background")]
    pub background: Rgb,

    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,

    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "default_download_prefix")]
    pub download_prefix: String,

    #[serde(default = "default_share_title")]
    pub share_title: String,

    #[serde(default = "default_share_caption")]
    pub share_caption: String,
}

fn default_foreground() -> Rgb {
    DEFAULT_FOREGROUND
}

fn default_background() -> Rgb {
    DEFAULT_BACKGROUND
}

fn default_pixel_size() -> u32 {
    DEFAULT_PIXEL_SIZE
}

fn default_history_file() -> PathBuf {
    PathBuf::from("qr_history.json")
}

fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}

fn default_download_prefix() -> String {
    "qrcraft-qr".to_string()
}

fn default_share_title() -> String {
    "My QR Code".to_string()
}

fn default_share_caption() -> String {
    "Created with qrcraft".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            foreground: default_foreground(),
            background: default_background(),
            pixel_size: default_pixel_size(),
            history_file: default_history_file(),
            history_capacity: default_history_capacity(),
            download_prefix: default_download_prefix(),
            share_title: default_share_title(),
            share_caption: default_share_caption(),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. A missing or malformed file gives
    /// the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), "ignoring malformed settings: {err}");
                Self::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), "cannot read settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pixel sizes offered by the size slider: 200 to 1000 in steps of 50.
    /// History keeps at least one entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pixel_size(self.pixel_size)?;
        if self.history_capacity == 0 {
            return Err(ConfigError::HistoryCapacity);
        }
        Ok(())
    }

    pub fn style(&self) -> StyleOptions {
        StyleOptions::default()
            .with_colors(self.foreground, self.background)
            .with_pixel_size(self.pixel_size)
    }
}

pub fn validate_pixel_size(size: u32) -> Result<(), ConfigError> {
    if !(MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE).contains(&size) || size % PIXEL_SIZE_STEP != 0 {
        return Err(ConfigError::PixelSize(size));
    }
    Ok(())
}
