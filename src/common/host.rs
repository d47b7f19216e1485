//! Capabilities supplied by the hosting environment.
//!
//! The dashboard never assumes a particular UI toolkit. Loading indicators,
//! user notifications, audio cues and file downloads are injected through
//! [`HostCapabilities`]; every field has a default that only logs, so a
//! host can supply just the pieces it has.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Blocking, user-facing notification (the host's alert box).
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Fire-and-forget audio feedback keyed by event name.
pub trait SoundCue: Send + Sync {
    fn play(&self, name: &str);

    /// Called on every user gesture before its cue plays. Players held
    /// back by autoplay policies unlock here.
    fn user_interacted(&self) {}
}

/// Receives files produced by the export actions.
pub trait DownloadSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the file could not be delivered.
    fn download(&self, file: Download) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub body: DownloadBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadBody {
    Blob {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    /// `data:<mime>;base64,<payload>` URI, as produced by canvas snapshots
    DataUri(String),
}

impl DownloadBody {
    /// Raw bytes of the file, decoding data URIs.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Export` if a data URI is malformed.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        match self {
            Self::Blob { bytes, .. } => Ok(bytes.clone()),
            Self::DataUri(uri) => {
                let (_, payload) = uri
                    .split_once(";base64,")
                    .ok_or_else(|| AppError::Export("data URI is not base64".to_string()))?;
                STANDARD
                    .decode(payload)
                    .map_err(|e| AppError::Export(format!("invalid data URI payload: {e}")))
            }
        }
    }
}

/// Bundle of injected capabilities shared by the controllers.
#[derive(Clone)]
pub struct HostCapabilities {
    pub loading: Arc<dyn LoadingIndicator>,
    pub notifier: Arc<dyn Notifier>,
    pub sounds: Arc<dyn SoundCue>,
    pub downloads: Arc<dyn DownloadSink>,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            loading: Arc::new(LogLoading),
            notifier: Arc::new(LogNotifier),
            sounds: Arc::new(Silent),
            downloads: Arc::new(DiscardDownloads),
        }
    }
}

impl HostCapabilities {
    #[must_use]
    pub fn with_loading(mut self, loading: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_sounds(mut self, sounds: Arc<dyn SoundCue>) -> Self {
        self.sounds = sounds;
        self
    }

    #[must_use]
    pub fn with_downloads(mut self, downloads: Arc<dyn DownloadSink>) -> Self {
        self.downloads = downloads;
        self
    }
}

pub struct LogLoading;

impl LoadingIndicator for LogLoading {
    fn show(&self) {
        tracing::debug!("Loading...");
    }

    fn hide(&self) {
        tracing::debug!("Loading complete.");
    }
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "User notification");
    }
}

pub struct Silent;

impl SoundCue for Silent {
    fn play(&self, _name: &str) {}
}

pub struct DiscardDownloads;

impl DownloadSink for DiscardDownloads {
    fn download(&self, file: Download) -> AppResult<()> {
        tracing::info!(filename = %file.filename, "No download sink configured, discarding file");
        Ok(())
    }
}

/// Writes downloads into a directory on disk.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination for `filename`, keeping only its final path component.
    #[must_use]
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let name = Path::new(filename)
            .file_name()
            .map_or_else(|| "download".into(), |n| n.to_os_string());
        self.dir.join(name)
    }
}

impl DownloadSink for DirectorySink {
    fn download(&self, file: Download) -> AppResult<()> {
        let bytes = file.body.to_bytes()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&file.filename);
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "File exported");
        Ok(())
    }
}
