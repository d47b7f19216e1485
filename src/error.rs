#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("No sensor selected")]
    NoSensorSelected,

    #[error("No data to export")]
    NoData,

    #[error("Chart not found: {0}")]
    ChartNotFound(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl AppError {
    /// Whether the error was caused by the user rather than by the system.
    ///
    /// User errors are shown as-is and never logged at error level.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoSensorSelected
                | Self::NoData
                | Self::ChartNotFound(_)
                | Self::UnsupportedFormat(_)
        )
    }

    /// Text handed to the notifier when an on-demand action fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSensorSelected => "Please select a sensor to export data.".to_string(),
            Self::NoData => "No data to export.".to_string(),
            Self::ChartNotFound(id) => format!("Chart not found: {id}"),
            Self::UnsupportedFormat(format) => format!("Unsupported export format: {format}"),
            Self::Transport(e) => {
                tracing::error!("Transport error: {e:?}");
                "An error occurred while exporting data.".to_string()
            }
            Self::Status { .. }
            | Self::Parse(_)
            | Self::Io(_)
            | Self::Csv(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Export(_) => {
                tracing::error!("Export error: {self}");
                "An error occurred while exporting data.".to_string()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
