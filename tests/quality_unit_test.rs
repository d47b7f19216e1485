//! Unit tests for air-quality classification and marker popups.
//!
//! Run with: cargo test --test quality_unit_test

use chrono::{TimeZone, Utc};

use aq_dashboard::api::models::{Measurement, Sensor};
use aq_dashboard::map::popup::{NOT_AVAILABLE, format_timestamp, format_value};
use aq_dashboard::map::{AirQuality, PopupContent};

#[test]
fn classification_boundaries_are_inclusive() {
    assert_eq!(AirQuality::classify(Some(0.0)), AirQuality::Good);
    assert_eq!(AirQuality::classify(Some(50.0)), AirQuality::Good);
    assert_eq!(AirQuality::classify(Some(50.1)), AirQuality::Moderate);
    assert_eq!(AirQuality::classify(Some(100.0)), AirQuality::Moderate);
    assert_eq!(AirQuality::classify(Some(100.1)), AirQuality::Poor);
    assert_eq!(AirQuality::classify(Some(450.0)), AirQuality::Poor);
}

#[test]
fn missing_or_invalid_reading_is_no_data() {
    assert_eq!(AirQuality::classify(None), AirQuality::NoData);
    assert_eq!(AirQuality::classify(Some(f64::NAN)), AirQuality::NoData);
    assert_eq!(AirQuality::of(None), AirQuality::NoData);

    let empty = Measurement::at(Utc::now());
    assert_eq!(AirQuality::of(Some(&empty)), AirQuality::NoData);
}

#[test]
fn quality_styles() {
    assert_eq!(AirQuality::Good.key(), "good");
    assert_eq!(AirQuality::NoData.key(), "no-data");
    assert_eq!(AirQuality::Poor.color(), "#ef4444");
    assert_eq!(AirQuality::NoData.label(), "No data");
    assert_eq!(AirQuality::Moderate.range(), Some("51-100"));
    assert_eq!(AirQuality::NoData.range(), None);
}

#[test]
fn values_format_with_one_decimal_and_unit() {
    assert_eq!(format_value(Some(35.0), "µg/m³"), "35.0 µg/m³");
    assert_eq!(format_value(Some(0.0), "ppm"), "0.0 ppm");
    assert_eq!(format_value(Some(12.345), "%"), "12.3 %");
    assert_eq!(format_value(None, "ppm"), NOT_AVAILABLE);
}

fn hanoi_sensor(latest: Option<Measurement>) -> Sensor {
    Sensor {
        id: 1,
        name: "Hoan Kiem".to_string(),
        latitude: 21.0285,
        longitude: 105.8542,
        location_description: Some("Lake side".to_string()),
        status: Some("active".to_string()),
        latest_measurement: latest,
    }
}

#[test]
fn popup_lists_readings_and_marks_missing_ones() {
    let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
    let latest = Measurement {
        pm25: Some(42.0),
        pm10: Some(60.26),
        temperature: Some(27.0),
        ..Measurement::at(timestamp)
    };

    let popup = PopupContent::for_sensor(&hanoi_sensor(Some(latest)));

    assert_eq!(popup.title, "Hoan Kiem");
    assert_eq!(popup.description, "Lake side");
    assert_eq!(popup.quality, AirQuality::Good);

    let fields = popup.fields.clone().unwrap();
    let rendered: Vec<(&str, &str)> = fields
        .iter()
        .map(|f| (f.label, f.value.as_str()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("PM2.5", "42.0 µg/m³"),
            ("PM10", "60.3 µg/m³"),
            ("CO", "N/A"),
            ("NO₂", "N/A"),
            ("Temperature", "27.0 °C"),
            ("Humidity", "N/A"),
        ]
    );
    assert_eq!(popup.updated_at, Some(format_timestamp(timestamp)));

    let text = popup.to_string();
    assert!(text.starts_with("Hoan Kiem [Good] - Lake side"));
    assert!(text.contains("CO: N/A"));
}

#[test]
fn popup_without_measurement_says_so() {
    let popup = PopupContent::for_sensor(&hanoi_sensor(None));

    assert_eq!(popup.quality, AirQuality::NoData);
    assert!(popup.fields.is_none());
    assert!(popup.updated_at.is_none());
    assert!(popup.to_string().ends_with("No measurement data"));
}
