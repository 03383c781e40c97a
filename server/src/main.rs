use rafiq_server::backend;
use rafiq_server::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; `log` records from the library are captured too
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading configuration");
    let config = AppConfig::load()?;

    info!("Starting Rafiq backend on {}", config.server.bind_address);
    backend::run(config).await
}
