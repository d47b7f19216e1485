use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api::models::TimeRange;
use crate::map::LatLng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Air-quality API
    pub api_base_url: String,
    pub http_timeout_seconds: u64,

    // Refresh loops
    pub chart_refresh_interval_seconds: u64,
    pub map_refresh_interval_seconds: u64,
    pub default_time_range: TimeRange,

    // Map view
    pub map_center: LatLng,
    pub map_zoom: u8,

    // Sound effects
    pub sound_volume: f32,
    pub sounds_dir: PathBuf,

    // Exports
    pub export_dir: PathBuf,

    // Application metadata
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            http_timeout_seconds: 30,
            chart_refresh_interval_seconds: 60,
            map_refresh_interval_seconds: 300,
            default_time_range: TimeRange::Day,
            map_center: LatLng::new(21.0285, 105.8542),
            map_zoom: 11,
            sound_volume: 0.3,
            sounds_dir: PathBuf::from("static/sounds"),
            export_dir: PathBuf::from("."),
            deployment: Deployment::Local,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to the defaults of
    /// [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a refresh interval is zero or the
    /// default time range is not one of the presets.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let default_hours: u32 = env_or("AQ_DEFAULT_TIME_RANGE_HOURS", 24);
        let default_time_range =
            TimeRange::from_hours(default_hours).ok_or_else(|| ConfigError::Invalid {
                var: "AQ_DEFAULT_TIME_RANGE_HOURS",
                reason: format!("{default_hours} is not one of 1, 6, 24, 168"),
            })?;

        let config = Self {
            // Air-quality API
            api_base_url: env::var("AQ_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            http_timeout_seconds: env_or("AQ_HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds),

            // Refresh loops
            chart_refresh_interval_seconds: env_or(
                "AQ_CHART_REFRESH_SECONDS",
                defaults.chart_refresh_interval_seconds,
            ),
            map_refresh_interval_seconds: env_or(
                "AQ_MAP_REFRESH_SECONDS",
                defaults.map_refresh_interval_seconds,
            ),
            default_time_range,

            // Map view
            map_center: LatLng::new(
                env_or("AQ_MAP_CENTER_LAT", defaults.map_center.lat),
                env_or("AQ_MAP_CENTER_LNG", defaults.map_center.lng),
            ),
            map_zoom: env_or("AQ_MAP_ZOOM", defaults.map_zoom),

            // Sound effects
            sound_volume: env_or("AQ_SOUND_VOLUME", defaults.sound_volume),
            sounds_dir: env::var("AQ_SOUNDS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.sounds_dir),

            // Exports
            export_dir: env::var("AQ_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a refresh loop spin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart_refresh_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                var: "AQ_CHART_REFRESH_SECONDS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.map_refresh_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                var: "AQ_MAP_REFRESH_SECONDS",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    #[must_use]
    pub fn chart_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.chart_refresh_interval_seconds)
    }

    #[must_use]
    pub fn map_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.map_refresh_interval_seconds)
    }
}

fn env_or<T: FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
