use anyhow::Result;
use cryptoview_rs::selection::validate_catalog;
use dotenv::dotenv;
use shared::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod gate;
mod routes;
mod state;

use state::AppContext;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("Starting CryptoView dashboard...");

    let config = Config::from_env()?;
    info!("Loaded configuration: {:?}", config);

    validate_catalog()?;

    let context = AppContext::from_config(&config)?;
    let app = routes::router(context);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
