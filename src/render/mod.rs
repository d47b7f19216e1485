//! Rendering contracts. Controllers only talk to these traits; any chart or
//! map engine can sit behind them.

pub mod chart;
pub mod log;
pub mod map;

pub use chart::{
    ChartConfig, ChartHandle, ChartSurface, ChartUpdate, SensorOption, WidgetId,
};
pub use map::{LatLng, MapControl, MapSurface, MarkerId, MarkerSpec, TileLayer};
