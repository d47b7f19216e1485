//! Audio feedback for UI events.
//!
//! A single [`SoundEffectsService`] is created at startup and shared through
//! `Arc` with every component that plays cues. It starts muted and unmutes
//! itself on the first user interaction, since hosts typically reject audio
//! before that point anyway.

pub mod backend;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::SoundCue;
use crate::config::Config;

pub use backend::{AudioBackend, ClipSource, PlaybackError, TracingBackend, Voice};

pub const CLICK: &str = "click";
pub const HOVER: &str = "hover";
pub const NOTIFICATION: &str = "notification";

/// Clips loaded from the sounds directory at startup.
pub const DEFAULT_CLIPS: [&str; 3] = [CLICK, HOVER, NOTIFICATION];

pub const DEFAULT_VOLUME: f32 = 0.3;

struct SoundState {
    enabled: bool,
    volume: f32,
    voices: HashMap<String, Box<dyn Voice>>,
}

pub struct SoundEffectsService {
    backend: Arc<dyn AudioBackend>,
    state: Mutex<SoundState>,
    awaiting_interaction: AtomicBool,
}

impl SoundEffectsService {
    pub fn new(backend: Arc<dyn AudioBackend>, volume: f32) -> Self {
        Self {
            backend,
            state: Mutex::new(SoundState {
                enabled: false,
                volume: clamp_volume(volume),
                voices: HashMap::new(),
            }),
            awaiting_interaction: AtomicBool::new(true),
        }
    }

    /// Service with the default clips loaded from `config.sounds_dir`.
    pub fn from_config(backend: Arc<dyn AudioBackend>, config: &Config) -> Self {
        let service = Self::new(backend, config.sound_volume);
        service.load_directory(&config.sounds_dir);
        service
    }

    /// Load `<dir>/<name>.wav` for every default clip. Missing clips are skipped.
    pub fn load_directory(&self, dir: &Path) {
        for name in DEFAULT_CLIPS {
            let source = ClipSource::File(dir.join(format!("{name}.wav")));
            if let Err(e) = self.load_clip(name, &source) {
                tracing::debug!(name, error = %e, "Sound clip unavailable");
            }
        }
    }

    /// Preload a clip under `name`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the clip cannot be loaded.
    pub fn load_clip(&self, name: &str, source: &ClipSource) -> Result<(), PlaybackError> {
        let mut voice = self.backend.load(name, source)?;
        let mut state = self.state.lock();
        voice.set_volume(state.volume);
        state.voices.insert(name.to_string(), voice);
        Ok(())
    }

    /// Play `name` from the start. Never fails: unknown names, muted state and
    /// playback rejections are all silent.
    pub fn play(&self, name: &str) {
        let mut state = self.state.lock();
        if !state.enabled {
            return;
        }
        let Some(voice) = state.voices.get_mut(name) else {
            return;
        };

        voice.rewind();
        if let Err(e) = voice.play() {
            tracing::debug!(name, error = %e, "Audio play blocked");
        }
    }

    /// Set the volume for every clip, clamped to `[0, 1]`. Returns the value applied.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let volume = clamp_volume(volume);
        let mut state = self.state.lock();
        state.volume = volume;
        for voice in state.voices.values_mut() {
            voice.set_volume(volume);
        }
        volume
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Flip mute state. Returns `true` if sounds are now enabled.
    pub fn toggle(&self) -> bool {
        let mut state = self.state.lock();
        state.enabled = !state.enabled;
        state.enabled
    }

    pub fn mute(&self) {
        self.state.lock().enabled = false;
    }

    pub fn unmute(&self) {
        self.state.lock().enabled = true;
    }

    /// Hook for the host's first click anywhere. Only the first call unmutes.
    pub fn notify_user_interaction(&self) {
        if self.awaiting_interaction.swap(false, Ordering::SeqCst) {
            tracing::debug!("First user interaction, enabling sounds");
            self.unmute();
        }
    }

    #[must_use]
    pub fn loaded_clips(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().voices.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SoundCue for SoundEffectsService {
    fn play(&self, name: &str) {
        Self::play(self, name);
    }

    fn user_interacted(&self) {
        self.notify_user_interaction();
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
