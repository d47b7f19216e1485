//! In-memory fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use aq_dashboard::api::SensorApi;
use aq_dashboard::api::models::{AggregateComparison, Measurement, Sensor, SensorId, TimeRange};
use aq_dashboard::common::{
    Download, DownloadSink, HostCapabilities, LoadingIndicator, Notifier, SoundCue,
};
use aq_dashboard::error::{AppError, AppResult};
use aq_dashboard::render::chart::{
    ChartConfig, ChartHandle, ChartSurface, ChartUpdate, SensorOption, WidgetId,
};
use aq_dashboard::render::map::{LatLng, MapControl, MapSurface, MarkerId, MarkerSpec, TileLayer};

// ==========================================================================
// Fixtures
// ==========================================================================

pub fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
}

pub fn sensor(id: SensorId, name: &str, pm25: Option<f64>) -> Sensor {
    Sensor {
        id,
        name: name.to_string(),
        latitude: 21.0 + id as f64 / 100.0,
        longitude: 105.8,
        location_description: Some(format!("{name} district")),
        status: Some("active".to_string()),
        latest_measurement: Some(Measurement {
            pm25,
            pm10: Some(40.0),
            ..Measurement::at(ts(12, 0))
        }),
    }
}

pub fn reading(timestamp: DateTime<Utc>, pm25: f64) -> Measurement {
    Measurement {
        pm25: Some(pm25),
        pm10: Some(pm25 * 1.5),
        co: Some(1.2),
        no2: Some(30.0),
        temperature: Some(28.5),
        humidity: Some(70.0),
        ..Measurement::at(timestamp)
    }
}

pub fn series(pm25_values: &[f64]) -> Vec<Measurement> {
    pm25_values
        .iter()
        .enumerate()
        .map(|(i, v)| reading(ts(10, i as u32 * 10), *v))
        .collect()
}

pub fn averages(selected: &[(&str, f64)], fleet: &[(&str, f64)]) -> AggregateComparison {
    let to_map = |pairs: &[(&str, f64)]| -> BTreeMap<String, Option<f64>> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), Some(*v))).collect()
    };
    AggregateComparison {
        selected_sensor_avg: to_map(selected),
        all_sensors_avg: to_map(fleet),
    }
}

// ==========================================================================
// Fake API
// ==========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    Sensors,
    Series(SensorId, u32),
    Records(SensorId, u32),
    Averages(SensorId, u32),
}

#[derive(Default)]
pub struct FakeApi {
    sensors: Mutex<Option<Vec<Sensor>>>,
    series: Mutex<HashMap<SensorId, Vec<Measurement>>>,
    records: Mutex<HashMap<SensorId, Vec<serde_json::Value>>>,
    averages: Mutex<HashMap<SensorId, AggregateComparison>>,
    delays: Mutex<HashMap<SensorId, Duration>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn with_sensors(sensors: Vec<Sensor>) -> Arc<Self> {
        let api = Self::default();
        *api.sensors.lock() = Some(sensors);
        Arc::new(api)
    }

    pub fn set_sensors(&self, sensors: Vec<Sensor>) {
        *self.sensors.lock() = Some(sensors);
    }

    /// Make `/api/sensors` fail.
    pub fn fail_sensors(&self) {
        *self.sensors.lock() = None;
    }

    pub fn set_series(&self, sensor_id: SensorId, data: Vec<Measurement>) {
        self.series.lock().insert(sensor_id, data);
    }

    /// Raw `/api/data` payload for `sensor_id`, as used by exports.
    ///
    /// Without one, the typed series is served re-serialized.
    pub fn set_records(&self, sensor_id: SensorId, records: Vec<serde_json::Value>) {
        self.records.lock().insert(sensor_id, records);
    }

    pub fn set_averages(&self, sensor_id: SensorId, data: AggregateComparison) {
        self.averages.lock().insert(sensor_id, data);
    }

    pub fn set_delay(&self, sensor_id: SensorId, delay: Duration) {
        self.delays.lock().insert(sensor_id, delay);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn series_calls(&self) -> Vec<(SensorId, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Series(id, hours) => Some((id, hours)),
                _ => None,
            })
            .collect()
    }

    pub fn records_calls(&self) -> Vec<(SensorId, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Records(id, hours) => Some((id, hours)),
                _ => None,
            })
            .collect()
    }

    pub fn averages_calls(&self) -> Vec<(SensorId, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Averages(id, hours) => Some((id, hours)),
                _ => None,
            })
            .collect()
    }

    async fn delay_for(&self, sensor_id: SensorId) {
        let delay = self.delays.lock().get(&sensor_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SensorApi for FakeApi {
    async fn get_sensors(&self) -> AppResult<Vec<Sensor>> {
        self.calls.lock().push(ApiCall::Sensors);
        self.sensors.lock().clone().ok_or(AppError::Status {
            status: 503,
            url: "/api/sensors".to_string(),
        })
    }

    async fn get_series(&self, sensor_id: SensorId, hours: u32) -> AppResult<Vec<Measurement>> {
        self.calls.lock().push(ApiCall::Series(sensor_id, hours));
        self.delay_for(sensor_id).await;
        Ok(self.series.lock().get(&sensor_id).cloned().unwrap_or_default())
    }

    async fn get_series_records(
        &self,
        sensor_id: SensorId,
        hours: u32,
    ) -> AppResult<Vec<serde_json::Value>> {
        self.calls.lock().push(ApiCall::Records(sensor_id, hours));
        self.delay_for(sensor_id).await;
        if let Some(records) = self.records.lock().get(&sensor_id) {
            return Ok(records.clone());
        }
        let typed = self.series.lock().get(&sensor_id).cloned().unwrap_or_default();
        Ok(typed
            .iter()
            .map(|m| serde_json::to_value(m).unwrap())
            .collect())
    }

    async fn get_averages(
        &self,
        sensor_id: SensorId,
        hours: u32,
    ) -> AppResult<AggregateComparison> {
        self.calls.lock().push(ApiCall::Averages(sensor_id, hours));
        self.delay_for(sensor_id).await;
        self.averages
            .lock()
            .get(&sensor_id)
            .cloned()
            .ok_or(AppError::Status {
                status: 404,
                url: "/api/averages".to_string(),
            })
    }
}

// ==========================================================================
// Fake chart surface
// ==========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Populated(Vec<SensorOption>, Option<SensorId>),
    Synced(SensorId),
    TimeRange(TimeRange),
    EmptyState(String),
}

pub type UpdateLog = Arc<Mutex<Vec<ChartUpdate>>>;

#[derive(Default)]
pub struct FakeChartSurface {
    pub created: Mutex<Vec<(WidgetId, ChartConfig)>>,
    pub updates: Mutex<HashMap<WidgetId, UpdateLog>>,
    pub events: Mutex<Vec<SurfaceEvent>>,
    /// Widgets whose slot is absent from the page
    pub missing: Mutex<Vec<WidgetId>>,
    pub snapshot: Mutex<Option<Vec<u8>>>,
}

impl FakeChartSurface {
    pub fn created_ids(&self) -> Vec<WidgetId> {
        self.created.lock().iter().map(|(id, _)| *id).collect()
    }

    pub fn config(&self, widget: WidgetId) -> Option<ChartConfig> {
        self.created
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| *id == widget)
            .map(|(_, c)| c.clone())
    }

    pub fn updates(&self, widget: WidgetId) -> Vec<ChartUpdate> {
        self.updates
            .lock()
            .get(&widget)
            .map(|log| log.lock().clone())
            .unwrap_or_default()
    }

    pub fn last_update(&self, widget: WidgetId) -> Option<ChartUpdate> {
        self.updates(widget).pop()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }
}

impl ChartSurface for FakeChartSurface {
    fn create_chart(&self, widget: WidgetId, config: ChartConfig) -> Option<Box<dyn ChartHandle>> {
        if self.missing.lock().contains(&widget) {
            return None;
        }
        self.created.lock().push((widget, config));
        let log: UpdateLog = Arc::default();
        self.updates.lock().insert(widget, Arc::clone(&log));
        Some(Box::new(FakeChart {
            log,
            snapshot: self.snapshot.lock().clone(),
            destroyed: false,
        }))
    }

    fn populate_sensor_select(&self, options: &[SensorOption], selected: Option<SensorId>) {
        self.events
            .lock()
            .push(SurfaceEvent::Populated(options.to_vec(), selected));
    }

    fn sync_sensor_select(&self, selected: SensorId) {
        self.events.lock().push(SurfaceEvent::Synced(selected));
    }

    fn set_active_time_range(&self, range: TimeRange) {
        self.events.lock().push(SurfaceEvent::TimeRange(range));
    }

    fn show_empty_state(&self, message: &str) {
        self.events
            .lock()
            .push(SurfaceEvent::EmptyState(message.to_string()));
    }
}

struct FakeChart {
    log: UpdateLog,
    snapshot: Option<Vec<u8>>,
    destroyed: bool,
}

impl ChartHandle for FakeChart {
    fn update_series(&mut self, update: &ChartUpdate) {
        if self.destroyed {
            return;
        }
        self.log.lock().push(update.clone());
    }

    fn snapshot_png(&self) -> Option<Vec<u8>> {
        self.snapshot.clone()
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

// ==========================================================================
// Fake map surface
// ==========================================================================

#[derive(Default)]
pub struct FakeMapSurface {
    pub view: Mutex<Option<(LatLng, u8)>>,
    pub tile_layers: Mutex<Vec<TileLayer>>,
    pub controls: Mutex<Vec<MapControl>>,
    pub markers: Mutex<BTreeMap<MarkerId, MarkerSpec>>,
    pub removed: Mutex<Vec<MarkerId>>,
    next_id: Mutex<MarkerId>,
}

impl FakeMapSurface {
    pub fn live_markers(&self) -> Vec<MarkerSpec> {
        self.markers.lock().values().cloned().collect()
    }
}

impl MapSurface for FakeMapSurface {
    fn set_view(&self, center: LatLng, zoom: u8) {
        *self.view.lock() = Some((center, zoom));
    }

    fn add_tile_layer(&self, layer: &TileLayer) {
        self.tile_layers.lock().push(layer.clone());
    }

    fn add_control(&self, control: MapControl) {
        self.controls.lock().push(control);
    }

    fn add_marker(&self, marker: MarkerSpec) -> MarkerId {
        let mut next = self.next_id.lock();
        let id = *next;
        *next += 1;
        self.markers.lock().insert(id, marker);
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        self.markers.lock().remove(&id);
        self.removed.lock().push(id);
    }
}

// ==========================================================================
// Fake host capabilities
// ==========================================================================

#[derive(Default)]
pub struct FakeHost {
    pub loading_shown: Mutex<u32>,
    pub loading_hidden: Mutex<u32>,
    pub alerts: Mutex<Vec<String>>,
    pub sounds: Mutex<Vec<String>>,
    /// User gestures seen by the sound cue, with the cue count at that moment
    pub interactions: Mutex<Vec<usize>>,
    pub downloads: Mutex<Vec<Download>>,
}

impl FakeHost {
    pub fn capabilities(self: &Arc<Self>) -> HostCapabilities {
        HostCapabilities::default()
            .with_loading(Arc::clone(self) as Arc<dyn LoadingIndicator>)
            .with_notifier(Arc::clone(self) as Arc<dyn Notifier>)
            .with_sounds(Arc::clone(self) as Arc<dyn SoundCue>)
            .with_downloads(Arc::clone(self) as Arc<dyn DownloadSink>)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }

    pub fn sounds(&self) -> Vec<String> {
        self.sounds.lock().clone()
    }

    pub fn interactions(&self) -> Vec<usize> {
        self.interactions.lock().clone()
    }

    pub fn downloads(&self) -> Vec<Download> {
        self.downloads.lock().clone()
    }

    pub fn loading_balanced(&self) -> bool {
        *self.loading_shown.lock() == *self.loading_hidden.lock()
    }
}

impl LoadingIndicator for FakeHost {
    fn show(&self) {
        *self.loading_shown.lock() += 1;
    }

    fn hide(&self) {
        *self.loading_hidden.lock() += 1;
    }
}

impl Notifier for FakeHost {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

impl SoundCue for FakeHost {
    fn play(&self, name: &str) {
        self.sounds.lock().push(name.to_string());
    }

    fn user_interacted(&self) {
        let played = self.sounds.lock().len();
        self.interactions.lock().push(played);
    }
}

impl DownloadSink for FakeHost {
    fn download(&self, file: Download) -> AppResult<()> {
        self.downloads.lock().push(file);
        Ok(())
    }
}
