use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aq_dashboard::api::{ApiClient, SensorApi};
use aq_dashboard::charts::ChartDashboardController;
use aq_dashboard::common::{DirectorySink, HostCapabilities};
use aq_dashboard::config::Config;
use aq_dashboard::map::MapController;
use aq_dashboard::render::log::{LogChartSurface, LogMapSurface};
use aq_dashboard::sound::{SoundEffectsService, TracingBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aq_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting aq-dashboard...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        api = %config.api_base_url,
        chart_refresh_secs = config.chart_refresh_interval_seconds,
        map_refresh_secs = config.map_refresh_interval_seconds,
        "Configuration loaded"
    );

    let api: Arc<dyn SensorApi> = Arc::new(ApiClient::new(&config)?);

    // One sound service for the whole process
    let sounds = Arc::new(SoundEffectsService::from_config(
        Arc::new(TracingBackend),
        &config,
    ));

    let host = HostCapabilities::default()
        .with_sounds(sounds)
        .with_downloads(Arc::new(DirectorySink::new(config.export_dir.clone())));

    let dashboard = ChartDashboardController::from_config(
        Arc::clone(&api),
        Arc::new(LogChartSurface),
        host.clone(),
        &config,
    );
    let map = MapController::from_config(api, Arc::new(LogMapSurface::default()), host, &config);

    tokio::join!(dashboard.init(), map.init());
    tracing::info!(phase = ?dashboard.phase(), "Dashboard running");

    shutdown_signal().await;

    dashboard.stop_auto_refresh();
    map.stop_auto_refresh();
    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
