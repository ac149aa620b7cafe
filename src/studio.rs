//! An editing session: the current payload and style, the drawing surface
//! and the recent-exports list.
//!
//! Every edit re-renders immediately. Downloads and shares read the surface
//! as it is at the moment they are called.

use crate::config::Settings;
use crate::error::{ExportError, RenderError, ShareError};
use crate::export::{download_file_name, save_png, ShareRequest, ShareTarget};
use crate::history::{History, HistoryEntry, HistoryStorage};
use crate::logo::Logo;
use crate::payload::{delimiter_hazards, Payload};
use crate::render::Canvas;
use crate::style::StyleOptions;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub struct Studio<S: HistoryStorage> {
    settings: Settings,
    payload: Payload,
    style: StyleOptions,
    canvas: Canvas,
    history: History<S>,
}

impl<S: HistoryStorage> Studio<S> {
    /// Starts a session with an empty URL payload and the configured style,
    /// loading history from `storage`.
    pub fn new(settings: Settings, storage: S) -> Self {
        let history = History::load_with_capacity(storage, settings.history_capacity);
        let style = settings.style();
        let mut studio = Self {
            settings,
            payload: Payload::Url(String::new()),
            style,
            canvas: Canvas::new(),
            history,
        };
        if let Err(err) = studio.refresh() {
            debug!("initial render failed: {err}");
        }
        studio
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn set_payload(&mut self, payload: Payload) -> Result<u64, RenderError> {
        for hazard in delimiter_hazards(&payload) {
            warn!(
                field = hazard.field,
                "field contains unescaped delimiter {:?}",
                hazard.delimiter
            );
        }
        self.payload = payload;
        self.refresh()
    }

    pub fn set_style(&mut self, style: StyleOptions) -> Result<u64, RenderError> {
        self.style = style;
        self.refresh()
    }

    /// Loads a logo from a data URI. A logo that fails to decode is dropped
    /// silently and the code renders without one.
    pub fn set_logo_data_uri(&mut self, uri: &str) -> Result<u64, RenderError> {
        self.style.logo = Logo::from_data_uri(uri)
            .inspect_err(|err| debug!("logo not loaded: {err}"))
            .ok();
        self.refresh()
    }

    pub fn set_logo(&mut self, logo: Option<Logo>) -> Result<u64, RenderError> {
        self.style.logo = logo;
        self.refresh()
    }

    /// Renders the current payload and style onto the canvas. On failure the
    /// previous frame stays visible.
    pub fn refresh(&mut self) -> Result<u64, RenderError> {
        self.canvas.render(&self.payload.qr_text(), self.style.clone())
    }

    /// Saves the visible frame as a timestamped PNG in `directory` and
    /// records the export in history.
    ///
    /// A history write failure is logged and does not fail the download.
    pub fn download(&mut self, directory: &Path, at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        let frame = self.canvas.snapshot().ok_or(ExportError::NoFrame)?;
        let name = download_file_name(&self.settings.download_prefix, at);
        let path = save_png(directory, &name, &frame)?;

        let kind = self.payload.kind();
        if let Err(err) = self
            .history
            .record(kind, &self.payload.label(), &self.payload.encode(), at)
        {
            warn!("export saved but history was not: {err}");
        }
        info!(%kind, path = %path.display(), "downloaded");
        Ok(path)
    }

    /// Hands the visible frame to a share target. Sharing does not touch
    /// history.
    pub fn share(&self, target: &dyn ShareTarget) -> Result<(), ShareError> {
        let frame = self.canvas.snapshot().ok_or(ExportError::NoFrame)?;
        let request = ShareRequest::new(&self.settings.share_title, &self.settings.share_caption, &frame)?;
        target.share(request).inspect_err(|err| match err {
            ShareError::Unsupported => {}
            other => error!("Share failed: {other}"),
        })
    }

    pub fn clear_history(&mut self) -> Result<(), crate::error::StorageError> {
        self.history.clear()
    }
}
