use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;

/// Sensor identifier as issued by the API
pub type SensorId = i64;

/// Response item from `/api/sensors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub location_description: Option<String>,
    /// Lifecycle status reported by the API (e.g. "active")
    #[serde(default)]
    pub status: Option<String>,
    /// Most recent reading, absent when the sensor never reported
    #[serde(default)]
    pub latest_measurement: Option<Measurement>,
}

/// One timestamped reading, as returned by `/api/data` and embedded in sensors.
///
/// Every value is optional: `None` means the sensor reported no data for that
/// field, which is distinct from a zero reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<SensorId>,
    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub co: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Naive ISO-8601 timestamps from the API are taken as UTC
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Measurement {
    /// Empty reading at `timestamp`.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            sensor_id: None,
            pm25: None,
            pm10: None,
            co: None,
            no2: None,
            o3: None,
            temperature: None,
            humidity: None,
            timestamp,
        }
    }

    #[must_use]
    pub fn reading(&self, kind: Reading) -> Option<f64> {
        match kind {
            Reading::Pm25 => self.pm25,
            Reading::Pm10 => self.pm10,
            Reading::Co => self.co,
            Reading::No2 => self.no2,
            Reading::O3 => self.o3,
            Reading::Temperature => self.temperature,
            Reading::Humidity => self.humidity,
        }
    }
}

/// The measured quantities a `Measurement` can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading {
    Pm25,
    Pm10,
    Co,
    No2,
    O3,
    Temperature,
    Humidity,
}

impl Reading {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pm25 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::Co => "CO",
            Self::No2 => "NO₂",
            Self::O3 => "O₃",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Pm25 | Self::Pm10 => "µg/m³",
            Self::Co => "ppm",
            Self::No2 | Self::O3 => "ppb",
            Self::Temperature => "°C",
            Self::Humidity => "%",
        }
    }
}

/// Response from `/api/averages`.
///
/// Both maps are keyed by pollutant name and are expected to share the same
/// key set, so the two series can be compared category by category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateComparison {
    #[serde(default)]
    pub selected_sensor_avg: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub all_sensors_avg: BTreeMap<String, Option<f64>>,
}

impl AggregateComparison {
    #[must_use]
    pub fn keys_match(&self) -> bool {
        self.selected_sensor_avg.len() == self.all_sensors_avg.len()
            && self
                .selected_sensor_avg
                .keys()
                .all(|k| self.all_sensors_avg.contains_key(k))
    }

    /// Bar categories: the selected-sensor keys, upper-cased.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.selected_sensor_avg
            .keys()
            .map(|k| k.to_uppercase())
            .collect()
    }

    #[must_use]
    pub fn selected_values(&self) -> Vec<Option<f64>> {
        self.selected_sensor_avg.values().copied().collect()
    }

    /// Fleet averages aligned to the selected-sensor key order.
    #[must_use]
    pub fn fleet_values(&self) -> Vec<Option<f64>> {
        self.selected_sensor_avg
            .keys()
            .map(|k| self.all_sensors_avg.get(k).copied().flatten())
            .collect()
    }
}

/// Lookback windows offered by the time-range buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    Hour,
    SixHours,
    #[default]
    Day,
    Week,
}

impl TimeRange {
    pub const ALL: [Self; 4] = [Self::Hour, Self::SixHours, Self::Day, Self::Week];

    #[must_use]
    pub fn hours(self) -> u32 {
        match self {
            Self::Hour => 1,
            Self::SixHours => 6,
            Self::Day => 24,
            Self::Week => 168,
        }
    }

    #[must_use]
    pub fn from_hours(hours: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.hours() == hours)
    }
}

/// Parse an API timestamp: RFC 3339, or naive ISO-8601 assumed to be UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}
