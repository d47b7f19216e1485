pub mod controller;
pub mod popup;
pub mod quality;

pub use crate::render::map::LatLng;
pub use controller::MapController;
pub use popup::PopupContent;
pub use quality::AirQuality;
