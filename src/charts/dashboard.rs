use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::api::SensorApi;
use crate::api::models::{Sensor, SensorId, TimeRange};
use crate::charts::export::{self, DEFAULT_IMAGE_FILENAME, ExportFormat};
use crate::charts::widgets;
use crate::common::{Download, DownloadBody, HostCapabilities};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::render::chart::{ChartHandle, ChartSurface, SensorOption, WidgetId};
use crate::sound;
use crate::sync::RefreshTimer;

pub const EMPTY_STATE_MESSAGE: &str = "No sensor data available to display.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    Uninitialized,
    Ready,
    /// The API reported no sensors; nothing is drawn or polled
    Empty,
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub sensor_id: Option<SensorId>,
    pub time_range: TimeRange,
}

struct DashboardState {
    phase: DashboardPhase,
    sensors: Vec<Sensor>,
    selection: SelectionState,
    charts: HashMap<WidgetId, Box<dyn ChartHandle>>,
}

struct Shared {
    api: Arc<dyn SensorApi>,
    surface: Arc<dyn ChartSurface>,
    host: HostCapabilities,
    state: Mutex<DashboardState>,
}

/// Drives the four chart widgets from the selected sensor and time range.
///
/// Cloning yields another handle to the same dashboard. The auto-refresh loop
/// stops when the last handle is dropped.
#[derive(Clone)]
pub struct ChartDashboardController {
    shared: Arc<Shared>,
    refresh_period: Duration,
    timer: Arc<Mutex<Option<RefreshTimer>>>,
}

impl ChartDashboardController {
    pub fn new(
        api: Arc<dyn SensorApi>,
        surface: Arc<dyn ChartSurface>,
        host: HostCapabilities,
        default_time_range: TimeRange,
        refresh_period: Duration,
    ) -> Self {
        let state = DashboardState {
            phase: DashboardPhase::Uninitialized,
            sensors: Vec::new(),
            selection: SelectionState {
                sensor_id: None,
                time_range: default_time_range,
            },
            charts: HashMap::new(),
        };

        Self {
            shared: Arc::new(Shared {
                api,
                surface,
                host,
                state: Mutex::new(state),
            }),
            refresh_period,
            timer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_config(
        api: Arc<dyn SensorApi>,
        surface: Arc<dyn ChartSurface>,
        host: HostCapabilities,
        config: &Config,
    ) -> Self {
        Self::new(
            api,
            surface,
            host,
            config.default_time_range,
            config.chart_refresh_interval(),
        )
    }

    /// Load sensors, draw every widget and start the refresh loop.
    ///
    /// With no sensors the empty-state placeholder is shown and the dashboard
    /// stays idle for the rest of the session.
    pub async fn init(&self) {
        let shared = &self.shared;
        shared.host.loading.show();

        let sensors = shared.api.list_sensors().await;

        let Some(first) = sensors.first().map(|s| s.id) else {
            tracing::warn!("No sensors available to display charts");
            {
                let mut state = shared.state.lock();
                state.phase = DashboardPhase::Empty;
                state.sensors.clear();
            }
            shared.surface.show_empty_state(EMPTY_STATE_MESSAGE);
            shared.host.loading.hide();
            return;
        };

        let options = sensor_options(&sensors);
        let time_range = {
            let mut state = shared.state.lock();
            state.sensors = sensors;
            state.selection.sensor_id = Some(first);
            state.selection.time_range
        };
        tracing::info!(sensors = options.len(), selected = first, "Sensors loaded");

        shared.surface.populate_sensor_select(&options, Some(first));
        shared.surface.set_active_time_range(time_range);

        shared.create_all_charts().await;
        shared.state.lock().phase = DashboardPhase::Ready;

        self.start_auto_refresh();
        shared.host.loading.hide();
    }

    /// Re-fetch the current selection and update every chart in place.
    pub async fn refresh(&self) {
        self.shared.refresh().await;
    }

    /// Sensor selector changed.
    pub async fn select_sensor(&self, sensor_id: SensorId) {
        self.shared.host.sounds.user_interacted();
        self.shared.state.lock().selection.sensor_id = Some(sensor_id);
        self.shared.host.sounds.play(sound::CLICK);
        self.shared.surface.sync_sensor_select(sensor_id);
        self.shared.refresh().await;
    }

    /// Time-range button clicked.
    pub async fn select_time_range(&self, time_range: TimeRange) {
        self.shared.host.sounds.user_interacted();
        self.shared.state.lock().selection.time_range = time_range;
        self.shared.host.sounds.play(sound::CLICK);
        self.shared.surface.set_active_time_range(time_range);
        self.shared.refresh().await;
    }

    /// (Re)start the periodic refresh, replacing any running loop.
    pub fn start_auto_refresh(&self) {
        let shared = Arc::clone(&self.shared);
        let timer = RefreshTimer::start("charts", self.refresh_period, move || {
            let shared = Arc::clone(&shared);
            async move { shared.refresh().await }
        });
        *self.timer.lock() = Some(timer);
    }

    pub fn stop_auto_refresh(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.stop();
        }
    }

    #[must_use]
    pub fn is_auto_refreshing(&self) -> bool {
        self.timer.lock().as_ref().is_some_and(RefreshTimer::is_running)
    }

    #[must_use]
    pub fn phase(&self) -> DashboardPhase {
        self.shared.state.lock().phase
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        self.shared.state.lock().selection
    }

    #[must_use]
    pub fn sensors(&self) -> Vec<Sensor> {
        self.shared.state.lock().sensors.clone()
    }

    /// Widgets that currently have a live chart.
    #[must_use]
    pub fn charts(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self.shared.state.lock().charts.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Export the current series as `csv` or `json` through the download sink.
    ///
    /// Failures are reported to the user through the notifier; the returned
    /// filename is `None` in that case.
    pub async fn export_data(&self, format: &str) -> Option<String> {
        self.shared.host.sounds.user_interacted();
        let result = match format.parse::<ExportFormat>() {
            Ok(format) => self.shared.export_data(format).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(filename) => {
                self.shared.host.sounds.play(sound::NOTIFICATION);
                Some(filename)
            }
            Err(e) => {
                self.shared.host.notifier.alert(&e.user_message());
                None
            }
        }
    }

    /// Download a PNG snapshot of `widget`.
    pub fn export_chart_image(&self, widget: WidgetId, filename: Option<&str>) -> bool {
        self.shared.host.sounds.user_interacted();
        let filename = filename.unwrap_or(DEFAULT_IMAGE_FILENAME);

        match self.shared.export_chart_image(widget, filename) {
            Ok(()) => {
                self.shared.host.sounds.play(sound::NOTIFICATION);
                true
            }
            Err(e) => {
                self.shared.host.notifier.alert(&e.user_message());
                false
            }
        }
    }
}

impl Shared {
    async fn create_all_charts(&self) {
        let selection = self.state.lock().selection;
        let hours = selection.time_range.hours();

        let (series, averages) = futures::join!(
            self.api.fetch_series(selection.sensor_id, hours),
            self.api.fetch_averages(selection.sensor_id, hours),
        );

        let mut state = self.state.lock();
        for widget in WidgetId::ALL {
            let config = widgets::chart_config(widget, &series, averages.as_ref());
            let Some(chart) = self.surface.create_chart(widget, config) else {
                continue;
            };
            if let Some(mut previous) = state.charts.insert(widget, chart) {
                previous.destroy();
            }
        }

        tracing::info!(
            charts = state.charts.len(),
            points = series.len(),
            "Charts created"
        );
    }

    /// Responses are applied in arrival order; an older request finishing
    /// last overwrites a newer one.
    async fn refresh(&self) {
        self.host.loading.show();

        let selection = self.state.lock().selection;
        let hours = selection.time_range.hours();

        let (series, averages) = futures::join!(
            self.api.fetch_series(selection.sensor_id, hours),
            self.api.fetch_averages(selection.sensor_id, hours),
        );

        let labels = widgets::time_labels(&series);

        {
            let mut state = self.state.lock();
            for widget in WidgetId::ALL {
                let Some(chart) = state.charts.get_mut(&widget) else {
                    continue;
                };
                if let Some(update) = widgets::series_update(widget, &labels, &series) {
                    chart.update_series(&update);
                } else if let Some(averages) = &averages {
                    chart.update_series(&widgets::averages_update(averages));
                }
            }
        }

        tracing::debug!(
            sensor_id = ?selection.sensor_id,
            hours,
            points = series.len(),
            has_averages = averages.is_some(),
            "Charts refreshed"
        );

        self.host.loading.hide();
    }

    async fn export_data(&self, format: ExportFormat) -> AppResult<String> {
        let selection = self.state.lock().selection;
        let sensor_id = selection.sensor_id.ok_or(AppError::NoSensorSelected)?;

        self.host.loading.show();
        let result = self
            .download_series(format, sensor_id, selection.time_range)
            .await;
        self.host.loading.hide();

        result
    }

    async fn download_series(
        &self,
        format: ExportFormat,
        sensor_id: SensorId,
        time_range: TimeRange,
    ) -> AppResult<String> {
        let data = self
            .api
            .fetch_series_records(Some(sensor_id), time_range.hours())
            .await;
        if data.is_empty() {
            return Err(AppError::NoData);
        }

        let file = export::build_download(format, &data)?;
        let filename = file.filename.clone();
        self.host.downloads.download(file)?;

        tracing::info!(%format, sensor_id, records = data.len(), "Data exported");
        Ok(filename)
    }

    fn export_chart_image(&self, widget: WidgetId, filename: &str) -> AppResult<()> {
        let png = self
            .state
            .lock()
            .charts
            .get(&widget)
            .and_then(|chart| chart.snapshot_png())
            .ok_or_else(|| AppError::ChartNotFound(widget.to_string()))?;

        self.host.downloads.download(Download {
            filename: filename.to_string(),
            body: DownloadBody::DataUri(export::png_data_uri(&png)),
        })
    }
}

fn sensor_options(sensors: &[Sensor]) -> Vec<SensorOption> {
    sensors
        .iter()
        .map(|s| SensorOption {
            id: s.id,
            name: s.name.clone(),
        })
        .collect()
}
