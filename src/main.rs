use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;
mod view;

use api::dashboard::DashboardClient;
use commands::Dashboard;
use config::DashboardConfig;
use view::PlottersRenderer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    for directive in ["btc_dashboard=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📊 Starting BTC dashboard...");

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    info!("Backend: {}", config.base_url);

    let client = match DashboardClient::new(&config.base_url, config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };
    let renderer = PlottersRenderer::new(
        config.output_dir.clone(),
        config.chart_width,
        config.chart_height,
    );

    let interactive = config.interactive;
    let mut dashboard = Dashboard::new(config, client, renderer);
    let kind = dashboard.bootstrap().await;
    info!("✓ {:?} page loaded", kind);

    if let Err(e) = dashboard.export_page() {
        warn!("Failed to export page: {}", e);
    }

    if interactive {
        commands::run_interactive(&mut dashboard).await;
        if let Err(e) = dashboard.export_page() {
            warn!("Failed to export page: {}", e);
        }
    }
}
