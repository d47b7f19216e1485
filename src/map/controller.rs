use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::api::SensorApi;
use crate::api::models::{Sensor, SensorId};
use crate::common::HostCapabilities;
use crate::config::Config;
use crate::map::{AirQuality, PopupContent};
use crate::render::map::{
    ControlPosition, LatLng, LegendEntry, MapControl, MapSurface, MarkerId, MarkerSpec, TileLayer,
};
use crate::sound;
use crate::sync::RefreshTimer;

#[derive(Default)]
struct MapState {
    sensors: Vec<Sensor>,
    markers: Vec<MarkerId>,
}

struct Shared {
    api: Arc<dyn SensorApi>,
    surface: Arc<dyn MapSurface>,
    host: HostCapabilities,
    state: Mutex<MapState>,
}

/// Keeps one map's sensor markers in step with the API.
#[derive(Clone)]
pub struct MapController {
    shared: Arc<Shared>,
    center: LatLng,
    zoom: u8,
    tile_layer: TileLayer,
    refresh_period: Duration,
    timer: Arc<Mutex<Option<RefreshTimer>>>,
}

impl MapController {
    pub fn new(
        api: Arc<dyn SensorApi>,
        surface: Arc<dyn MapSurface>,
        host: HostCapabilities,
        center: LatLng,
        zoom: u8,
        refresh_period: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                surface,
                host,
                state: Mutex::new(MapState::default()),
            }),
            center,
            zoom,
            tile_layer: TileLayer::default(),
            refresh_period,
            timer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_config(
        api: Arc<dyn SensorApi>,
        surface: Arc<dyn MapSurface>,
        host: HostCapabilities,
        config: &Config,
    ) -> Self {
        Self::new(
            api,
            surface,
            host,
            config.map_center,
            config.map_zoom,
            config.map_refresh_interval(),
        )
    }

    #[must_use]
    pub fn with_tile_layer(mut self, tile_layer: TileLayer) -> Self {
        self.tile_layer = tile_layer;
        self
    }

    /// Set up the map, load markers and start the refresh loop.
    pub async fn init(&self) {
        let surface = &self.shared.surface;
        surface.set_view(self.center, self.zoom);
        surface.add_tile_layer(&self.tile_layer);
        surface.add_control(MapControl::RefreshButton {
            position: ControlPosition::TopLeft,
            title: "Refresh data".to_string(),
        });
        surface.add_control(legend());

        self.shared.load_sensors().await;
        self.start_auto_refresh();
    }

    pub async fn refresh(&self) {
        self.shared.load_sensors().await;
    }

    /// Manual refresh control clicked.
    pub async fn handle_refresh_click(&self) {
        self.shared.host.sounds.user_interacted();
        self.shared.host.sounds.play(sound::CLICK);
        self.shared.load_sensors().await;
    }

    /// Marker clicked: audio cue plus the popup to show.
    pub fn handle_marker_click(&self, sensor_id: SensorId) -> Option<PopupContent> {
        self.shared.host.sounds.user_interacted();
        self.shared.host.sounds.play(sound::CLICK);
        self.shared
            .state
            .lock()
            .sensors
            .iter()
            .find(|s| s.id == sensor_id)
            .map(PopupContent::for_sensor)
    }

    pub fn start_auto_refresh(&self) {
        let shared = Arc::clone(&self.shared);
        let timer = RefreshTimer::start("map", self.refresh_period, move || {
            let shared = Arc::clone(&shared);
            async move { shared.load_sensors().await }
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
    pub fn sensors(&self) -> Vec<Sensor> {
        self.shared.state.lock().sensors.clone()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<MarkerId> {
        self.shared.state.lock().markers.clone()
    }
}

impl Shared {
    async fn load_sensors(&self) {
        self.host.loading.show();

        match self.api.get_sensors().await {
            Ok(sensors) => {
                self.replace_markers(sensors);
                self.host.sounds.play(sound::NOTIFICATION);
            }
            Err(e) => {
                // Keep whatever markers are already on the map
                tracing::error!(error = %e, "Error loading sensors for map");
            }
        }

        self.host.loading.hide();
    }

    /// Remove every marker, then add one per sensor in list order.
    fn replace_markers(&self, sensors: Vec<Sensor>) {
        let mut state = self.state.lock();

        for id in state.markers.drain(..) {
            self.surface.remove_marker(id);
        }

        state.markers = sensors
            .iter()
            .map(|sensor| self.surface.add_marker(marker_for(sensor)))
            .collect();

        tracing::debug!(markers = state.markers.len(), "Map markers rebuilt");
        state.sensors = sensors;
    }
}

#[must_use]
pub fn marker_for(sensor: &Sensor) -> MarkerSpec {
    let quality = AirQuality::of(sensor.latest_measurement.as_ref());
    MarkerSpec {
        sensor_id: sensor.id,
        position: LatLng::new(sensor.latitude, sensor.longitude),
        color: quality.color(),
        quality,
        popup: PopupContent::for_sensor(sensor),
    }
}

fn legend() -> MapControl {
    MapControl::Legend {
        position: ControlPosition::BottomRight,
        title: "Air quality".to_string(),
        entries: [AirQuality::Good, AirQuality::Moderate, AirQuality::Poor]
            .into_iter()
            .map(|q| LegendEntry {
                color: q.color(),
                label: format!("{} ({})", q.label(), q.range().unwrap_or_default()),
            })
            .collect(),
    }
}
