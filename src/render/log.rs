//! Headless renderers that report every draw call through `tracing`.
//!
//! Used by the binary when no graphical frontend is attached.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::models::{SensorId, TimeRange};
use crate::render::chart::{
    ChartConfig, ChartHandle, ChartSurface, ChartUpdate, SensorOption, WidgetId,
};
use crate::render::map::{LatLng, MapControl, MapSurface, MarkerId, MarkerSpec, TileLayer};

#[derive(Default)]
pub struct LogChartSurface;

impl ChartSurface for LogChartSurface {
    fn create_chart(&self, widget: WidgetId, config: ChartConfig) -> Option<Box<dyn ChartHandle>> {
        tracing::info!(
            widget = %widget,
            kind = ?config.kind,
            datasets = config.datasets.len(),
            points = config.labels.len(),
            "Chart created"
        );
        Some(Box::new(LogChart { widget }))
    }

    fn populate_sensor_select(&self, options: &[SensorOption], selected: Option<SensorId>) {
        tracing::info!(sensors = options.len(), ?selected, "Sensor selector populated");
    }

    fn sync_sensor_select(&self, selected: SensorId) {
        tracing::debug!(selected, "Sensor selector synced");
    }

    fn set_active_time_range(&self, range: TimeRange) {
        tracing::debug!(hours = range.hours(), "Time range button activated");
    }

    fn show_empty_state(&self, message: &str) {
        tracing::warn!(message, "Chart grid empty");
    }
}

struct LogChart {
    widget: WidgetId,
}

impl ChartHandle for LogChart {
    fn update_series(&mut self, update: &ChartUpdate) {
        let latest: Vec<Option<f64>> = update
            .series
            .iter()
            .map(|values| values.last().copied().flatten())
            .collect();
        tracing::debug!(
            widget = %self.widget,
            points = update.labels.len(),
            last_label = update.labels.last().map(String::as_str),
            ?latest,
            "Chart updated"
        );
    }

    fn snapshot_png(&self) -> Option<Vec<u8>> {
        // Nothing is rasterized headless
        None
    }

    fn destroy(&mut self) {
        tracing::debug!(widget = %self.widget, "Chart destroyed");
    }
}

#[derive(Default)]
pub struct LogMapSurface {
    next_marker: AtomicU64,
}

impl MapSurface for LogMapSurface {
    fn set_view(&self, center: LatLng, zoom: u8) {
        tracing::info!(lat = center.lat, lng = center.lng, zoom, "Map view set");
    }

    fn add_tile_layer(&self, layer: &TileLayer) {
        tracing::debug!(url = %layer.url_template, max_zoom = layer.max_zoom, "Tile layer added");
    }

    fn add_control(&self, control: MapControl) {
        tracing::debug!(?control, "Map control added");
    }

    fn add_marker(&self, marker: MarkerSpec) -> MarkerId {
        let id = self.next_marker.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            marker = id,
            sensor_id = marker.sensor_id,
            quality = marker.quality.label(),
            "{}",
            marker.popup
        );
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        tracing::debug!(marker = id, "Marker removed");
    }
}
