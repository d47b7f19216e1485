use chrono::{DateTime, Local, Utc};
use std::fmt;

use crate::api::models::{Reading, Sensor};
use crate::map::AirQuality;

/// Readings shown in a marker popup, in display order.
pub const POPUP_READINGS: [Reading; 6] = [
    Reading::Pm25,
    Reading::Pm10,
    Reading::Co,
    Reading::No2,
    Reading::Temperature,
    Reading::Humidity,
];

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupField {
    pub label: &'static str,
    pub value: String,
}

/// Content of a sensor marker popup, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    pub description: String,
    pub quality: AirQuality,
    /// `None` when the sensor has no latest measurement
    pub fields: Option<Vec<PopupField>>,
    pub updated_at: Option<String>,
}

impl PopupContent {
    #[must_use]
    pub fn for_sensor(sensor: &Sensor) -> Self {
        let latest = sensor.latest_measurement.as_ref();

        Self {
            title: sensor.name.clone(),
            description: sensor.location_description.clone().unwrap_or_default(),
            quality: AirQuality::of(latest),
            fields: latest.map(|m| {
                POPUP_READINGS
                    .iter()
                    .map(|r| PopupField {
                        label: r.label(),
                        value: format_value(m.reading(*r), r.unit()),
                    })
                    .collect()
            }),
            updated_at: latest.map(|m| format_timestamp(m.timestamp)),
        }
    }
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.quality.label())?;
        if !self.description.is_empty() {
            write!(f, " - {}", self.description)?;
        }
        match &self.fields {
            Some(fields) => {
                for field in fields {
                    write!(f, " | {}: {}", field.label, field.value)?;
                }
                if let Some(updated_at) = &self.updated_at {
                    write!(f, " | Updated: {updated_at}")?;
                }
                Ok(())
            }
            None => f.write_str(" | No measurement data"),
        }
    }
}

/// One decimal plus unit, or `N/A` for a missing value.
#[must_use]
pub fn format_value(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1} {unit}"))
}

#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}
