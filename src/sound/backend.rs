use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// The platform refused to play (e.g. autoplay policy)
    #[error("Playback blocked: {0}")]
    Blocked(String),

    #[error("Failed to load clip: {0}")]
    Load(String),
}

#[derive(Debug, Clone)]
pub enum ClipSource {
    File(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A loaded, replayable clip.
pub trait Voice: Send {
    fn set_volume(&mut self, volume: f32);

    /// Seek back to the start.
    fn rewind(&mut self);

    /// # Errors
    ///
    /// Returns `PlaybackError::Blocked` if the platform rejects playback.
    fn play(&mut self) -> Result<(), PlaybackError>;
}

/// Platform audio output.
pub trait AudioBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `PlaybackError::Load` if the clip cannot be prepared.
    fn load(&self, name: &str, source: &ClipSource) -> Result<Box<dyn Voice>, PlaybackError>;
}

/// Backend without audio output; plays are reported at debug level.
#[derive(Default)]
pub struct TracingBackend;

impl AudioBackend for TracingBackend {
    fn load(&self, name: &str, source: &ClipSource) -> Result<Box<dyn Voice>, PlaybackError> {
        tracing::debug!(name, ?source, "Sound clip registered");
        Ok(Box::new(TracingVoice {
            name: name.to_string(),
            volume: 1.0,
        }))
    }
}

struct TracingVoice {
    name: String,
    volume: f32,
}

impl Voice for TracingVoice {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn rewind(&mut self) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        tracing::debug!(name = %self.name, volume = self.volume, "Sound played");
        Ok(())
    }
}
