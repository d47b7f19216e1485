//! Chart definitions for the four dashboard widgets and the mapping from API
//! payloads to their labels and datasets.

use chrono::{DateTime, Local, Utc};

use crate::api::models::{AggregateComparison, Measurement, Reading};
use crate::render::chart::{
    Axis, AxisPosition, ChartConfig, ChartKind, ChartUpdate, Dataset, Legend, WidgetId,
};

const RED: &str = "#ef4444";
const ORANGE: &str = "#f97316";
const AMBER: &str = "#f59e0b";
const GREEN: &str = "#10b981";
const BLUE: &str = "#3b82f6";
const VIOLET: &str = "#8b5cf6";
const GRAY: &str = "#6b7280";

/// X-axis label: local wall-clock `HH:MM`.
#[must_use]
pub fn format_time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

#[must_use]
pub fn time_labels(series: &[Measurement]) -> Vec<String> {
    series.iter().map(|m| format_time_label(m.timestamp)).collect()
}

#[must_use]
pub fn column(series: &[Measurement], reading: Reading) -> Vec<Option<f64>> {
    series.iter().map(|m| m.reading(reading)).collect()
}

/// Initial configuration of `widget`.
#[must_use]
pub fn chart_config(
    widget: WidgetId,
    series: &[Measurement],
    averages: Option<&AggregateComparison>,
) -> ChartConfig {
    match widget {
        WidgetId::Pm25 => pm25_chart(series),
        WidgetId::TemperatureHumidity => temperature_humidity_chart(series),
        WidgetId::MultiParameter => multi_parameter_chart(series),
        WidgetId::AverageComparison => average_comparison_chart(averages),
    }
}

/// Refresh payload for a time-series widget, `None` for the bar chart.
#[must_use]
pub fn series_update(
    widget: WidgetId,
    labels: &[String],
    series: &[Measurement],
) -> Option<ChartUpdate> {
    let readings = widget.readings();
    if readings.is_empty() {
        return None;
    }
    Some(ChartUpdate {
        labels: labels.to_vec(),
        series: readings.iter().map(|r| column(series, *r)).collect(),
    })
}

#[must_use]
pub fn averages_update(averages: &AggregateComparison) -> ChartUpdate {
    ChartUpdate {
        labels: averages.categories(),
        series: vec![averages.selected_values(), averages.fleet_values()],
    }
}

fn line(label: &str, color: &'static str, axis: &'static str, data: Vec<Option<f64>>) -> Dataset {
    Dataset {
        label: label.to_string(),
        color,
        fill: false,
        axis,
        data,
    }
}

fn axis(id: &'static str, position: AxisPosition, title: Option<&str>) -> Axis {
    Axis {
        id,
        position,
        title: title.map(str::to_string),
        begin_at_zero: false,
        grid_on_chart_area: position == AxisPosition::Left,
    }
}

fn pm25_chart(series: &[Measurement]) -> ChartConfig {
    let mut dataset = line("PM2.5", RED, "y", column(series, Reading::Pm25));
    dataset.fill = true;

    ChartConfig {
        kind: ChartKind::Line,
        labels: time_labels(series),
        datasets: vec![dataset],
        axes: vec![Axis {
            begin_at_zero: true,
            ..axis("y", AxisPosition::Left, None)
        }],
        legend: Legend::Hidden,
    }
}

fn temperature_humidity_chart(series: &[Measurement]) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        labels: time_labels(series),
        datasets: vec![
            line(
                "Temperature (°C)",
                ORANGE,
                "y_temp",
                column(series, Reading::Temperature),
            ),
            line(
                "Humidity (%)",
                BLUE,
                "y_humidity",
                column(series, Reading::Humidity),
            ),
        ],
        axes: vec![
            axis("y_temp", AxisPosition::Left, Some("Temperature (°C)")),
            axis("y_humidity", AxisPosition::Right, Some("Humidity (%)")),
        ],
        legend: Legend::Top,
    }
}

fn multi_parameter_chart(series: &[Measurement]) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        labels: time_labels(series),
        datasets: vec![
            line("PM2.5", RED, "y_pm", column(series, Reading::Pm25)),
            line("PM10", AMBER, "y_pm", column(series, Reading::Pm10)),
            line("CO", GREEN, "y_gas", column(series, Reading::Co)),
            line("NO₂", VIOLET, "y_gas", column(series, Reading::No2)),
        ],
        axes: vec![
            axis("y_pm", AxisPosition::Left, Some("PM concentration (µg/m³)")),
            axis("y_gas", AxisPosition::Right, Some("Gas concentration (ppm/ppb)")),
        ],
        legend: Legend::Top,
    }
}

fn average_comparison_chart(averages: Option<&AggregateComparison>) -> ChartConfig {
    let (labels, selected, fleet) = averages.map_or_else(
        || (Vec::new(), Vec::new(), Vec::new()),
        |a| (a.categories(), a.selected_values(), a.fleet_values()),
    );

    ChartConfig {
        kind: ChartKind::Bar,
        labels,
        datasets: vec![
            Dataset {
                fill: true,
                ..line("Selected sensor", BLUE, "y", selected)
            },
            Dataset {
                fill: true,
                ..line("System-wide average", GRAY, "y", fleet)
            },
        ],
        axes: vec![Axis {
            begin_at_zero: true,
            ..axis("y", AxisPosition::Left, None)
        }],
        legend: Legend::Top,
    }
}
