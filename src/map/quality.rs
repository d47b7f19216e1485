//! PM2.5 based air-quality buckets used for marker colors and labels.

use crate::api::models::Measurement;

/// Upper bound (inclusive) of the good bucket, µg/m³.
pub const GOOD_MAX: f64 = 50.0;
/// Upper bound (inclusive) of the moderate bucket, µg/m³.
pub const MODERATE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
    NoData,
}

impl AirQuality {
    /// Bucket a PM2.5 reading. Missing and non-finite readings are `NoData`.
    #[must_use]
    pub fn classify(pm25: Option<f64>) -> Self {
        match pm25.filter(|v| v.is_finite()) {
            None => Self::NoData,
            Some(v) if v <= GOOD_MAX => Self::Good,
            Some(v) if v <= MODERATE_MAX => Self::Moderate,
            Some(_) => Self::Poor,
        }
    }

    #[must_use]
    pub fn of(latest: Option<&Measurement>) -> Self {
        Self::classify(latest.and_then(|m| m.pm25))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::NoData => "No data",
        }
    }

    /// Style key for renderers (`quality-<key>`).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
            Self::NoData => "no-data",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "#10b981",
            Self::Moderate => "#f59e0b",
            Self::Poor => "#ef4444",
            Self::NoData => "#6b7280",
        }
    }

    /// Range shown in the map legend.
    #[must_use]
    pub fn range(self) -> Option<&'static str> {
        match self {
            Self::Good => Some("0-50"),
            Self::Moderate => Some("51-100"),
            Self::Poor => Some(">100"),
            Self::NoData => None,
        }
    }
}
