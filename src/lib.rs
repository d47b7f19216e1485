//! AQ Dashboard - air-quality monitoring dashboard client
//!
//! Chart dashboard, sensor map and sound cues driven by the air-quality HTTP
//! API. Rendering and host integration are behind traits so any frontend can
//! plug in.

pub mod api;
pub mod charts;
pub mod common;
pub mod config;
pub mod error;
pub mod map;
pub mod render;
pub mod sound;
pub mod sync;
