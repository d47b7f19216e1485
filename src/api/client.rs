use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::models::{AggregateComparison, Measurement, Sensor, SensorId};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Read access to the air-quality API.
///
/// Implementors provide the fallible `get_*` calls. The provided
/// `list_sensors` / `fetch_series` / `fetch_averages` wrappers are what the
/// dashboard uses: they log failures and degrade to "no data" so rendering
/// code only ever has to check for emptiness.
#[async_trait]
pub trait SensorApi: Send + Sync {
    /// `GET /api/sensors`
    async fn get_sensors(&self) -> AppResult<Vec<Sensor>>;

    /// `GET /api/data?sensor_id=..&hours=..`
    async fn get_series(&self, sensor_id: SensorId, hours: u32) -> AppResult<Vec<Measurement>>;

    /// `GET /api/data?sensor_id=..&hours=..`, records kept exactly as sent.
    async fn get_series_records(&self, sensor_id: SensorId, hours: u32) -> AppResult<Vec<Value>>;

    /// `GET /api/averages?sensor_id=..&hours=..`
    async fn get_averages(&self, sensor_id: SensorId, hours: u32)
    -> AppResult<AggregateComparison>;

    async fn list_sensors(&self) -> Vec<Sensor> {
        match self.get_sensors().await {
            Ok(sensors) => sensors,
            Err(e) => {
                tracing::error!(error = %e, "Error loading sensors");
                Vec::new()
            }
        }
    }

    async fn fetch_series(&self, sensor_id: Option<SensorId>, hours: u32) -> Vec<Measurement> {
        let Some(sensor_id) = sensor_id else {
            return Vec::new();
        };
        match self.get_series(sensor_id, hours).await {
            Ok(series) => series,
            Err(e) => {
                tracing::error!(error = %e, sensor_id, hours, "Error fetching sensor data");
                Vec::new()
            }
        }
    }

    /// Wire records for export; empty on failure like [`SensorApi::fetch_series`].
    async fn fetch_series_records(&self, sensor_id: Option<SensorId>, hours: u32) -> Vec<Value> {
        let Some(sensor_id) = sensor_id else {
            return Vec::new();
        };
        match self.get_series_records(sensor_id, hours).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, sensor_id, hours, "Error fetching sensor records");
                Vec::new()
            }
        }
    }

    async fn fetch_averages(
        &self,
        sensor_id: Option<SensorId>,
        hours: u32,
    ) -> Option<AggregateComparison> {
        let sensor_id = sensor_id?;
        match self.get_averages(sensor_id, hours).await {
            Ok(averages) => {
                if !averages.keys_match() {
                    tracing::warn!(
                        sensor_id,
                        "Average comparison key sets differ between sensor and fleet"
                    );
                }
                Some(averages)
            }
            Err(e) => {
                tracing::error!(error = %e, sensor_id, hours, "Error fetching average data");
                None
            }
        }
    }
}

/// HTTP implementation of [`SensorApi`].
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the API configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder().timeout(config.http_timeout()).build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        // Any non-success status is a failure; no per-code handling
        if !response.status().is_success() {
            return Err(AppError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            AppError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl SensorApi for ApiClient {
    async fn get_sensors(&self) -> AppResult<Vec<Sensor>> {
        self.get_json("/api/sensors", &[]).await
    }

    async fn get_series(&self, sensor_id: SensorId, hours: u32) -> AppResult<Vec<Measurement>> {
        self.get_json(
            "/api/data",
            &[
                ("sensor_id", sensor_id.to_string()),
                ("hours", hours.to_string()),
            ],
        )
        .await
    }

    async fn get_series_records(&self, sensor_id: SensorId, hours: u32) -> AppResult<Vec<Value>> {
        self.get_json(
            "/api/data",
            &[
                ("sensor_id", sensor_id.to_string()),
                ("hours", hours.to_string()),
            ],
        )
        .await
    }

    async fn get_averages(
        &self,
        sensor_id: SensorId,
        hours: u32,
    ) -> AppResult<AggregateComparison> {
        self.get_json(
            "/api/averages",
            &[
                ("sensor_id", sensor_id.to_string()),
                ("hours", hours.to_string()),
            ],
        )
        .await
    }
}
