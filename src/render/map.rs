use crate::api::models::SensorId;
use crate::map::{AirQuality, PopupContent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPosition {
    TopLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapControl {
    /// Clicking it must call `MapController::handle_refresh_click`
    RefreshButton {
        position: ControlPosition,
        title: String,
    },
    Legend {
        position: ControlPosition,
        title: String,
        entries: Vec<LegendEntry>,
    },
}

/// Marker as handed to the map renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub sensor_id: SensorId,
    pub position: LatLng,
    pub color: &'static str,
    pub quality: AirQuality,
    pub popup: PopupContent,
}

pub type MarkerId = u64;

/// A single map instance.
pub trait MapSurface: Send + Sync {
    fn set_view(&self, center: LatLng, zoom: u8);

    fn add_tile_layer(&self, layer: &TileLayer);

    fn add_control(&self, control: MapControl);

    fn add_marker(&self, marker: MarkerSpec) -> MarkerId;

    fn remove_marker(&self, id: MarkerId);
}
