pub mod dashboard;
pub mod export;
pub mod widgets;

pub use dashboard::{ChartDashboardController, DashboardPhase, SelectionState};
pub use export::ExportFormat;
