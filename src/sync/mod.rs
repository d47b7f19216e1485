pub mod scheduler;

pub use scheduler::{MIN_PERIOD, RefreshTimer};
