use std::fmt;
use std::str::FromStr;

use crate::api::models::{Reading, SensorId, TimeRange};

/// Stable identifiers of the dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetId {
    Pm25,
    TemperatureHumidity,
    MultiParameter,
    AverageComparison,
}

impl WidgetId {
    pub const ALL: [Self; 4] = [
        Self::Pm25,
        Self::TemperatureHumidity,
        Self::MultiParameter,
        Self::AverageComparison,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pm25 => "pm25_chart",
            Self::TemperatureHumidity => "temp_humidity_chart",
            Self::MultiParameter => "multi_param_chart",
            Self::AverageComparison => "average_comparison_chart",
        }
    }

    /// Readings plotted by a time-series widget, in dataset order.
    ///
    /// Empty for the average comparison, which is fed by the averages payload.
    #[must_use]
    pub fn readings(self) -> &'static [Reading] {
        match self {
            Self::Pm25 => &[Reading::Pm25],
            Self::TemperatureHumidity => &[Reading::Temperature, Reading::Humidity],
            Self::MultiParameter => &[Reading::Pm25, Reading::Pm10, Reading::Co, Reading::No2],
            Self::AverageComparison => &[],
        }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub id: &'static str,
    pub position: AxisPosition,
    pub title: Option<String>,
    pub begin_at_zero: bool,
    /// Draw grid lines across the plot area (off for secondary axes)
    pub grid_on_chart_area: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub color: &'static str,
    pub fill: bool,
    pub axis: &'static str,
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legend {
    Hidden,
    Top,
}

/// Everything a renderer needs to draw a chart the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axes: Vec<Axis>,
    pub legend: Legend,
}

/// In-place replacement of a chart's labels and dataset values.
///
/// `series[i]` replaces the data of dataset `i`; extra entries without a
/// matching dataset are ignored by renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpdate {
    pub labels: Vec<String>,
    pub series: Vec<Vec<Option<f64>>>,
}

/// A live chart owned by the dashboard.
pub trait ChartHandle: Send {
    /// Replaces the drawn data in place and redraws without a transition.
    fn update_series(&mut self, update: &ChartUpdate);

    /// PNG snapshot of the rendered chart, `None` if nothing is drawn.
    fn snapshot_png(&self) -> Option<Vec<u8>>;

    fn destroy(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorOption {
    pub id: SensorId,
    pub name: String,
}

/// The page area hosting the chart widgets and their controls.
pub trait ChartSurface: Send + Sync {
    /// Draw a chart into the widget slot. `None` when the page has no such slot.
    fn create_chart(&self, widget: WidgetId, config: ChartConfig) -> Option<Box<dyn ChartHandle>>;

    fn populate_sensor_select(&self, options: &[SensorOption], selected: Option<SensorId>);

    /// Keep every sensor selector showing the same value.
    fn sync_sensor_select(&self, selected: SensorId);

    fn set_active_time_range(&self, range: TimeRange);

    fn show_empty_state(&self, message: &str);
}
