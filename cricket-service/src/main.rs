use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cricket_service::api;
use cricket_service::config::load_config;
use cricket_service::proxy::CricketProxy;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("Starting cricket chat service v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );
    if config.upstream.uses_default_api_key() {
        warn!("Using the built-in sample API key; set CRICKET__UPSTREAM__API_KEY to override");
    }

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics recorder unavailable");
            None
        }
    };

    let proxy = Arc::new(CricketProxy::new(config.upstream.clone())?);
    let app = api::router(proxy, metrics);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cricket_service=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
