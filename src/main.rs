use blocklist_server::{config::Config, server::Server, setup::setup, telemetry};
use color_eyre::eyre::Context;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load().wrap_err("Failed to load configuration")?;
    tracing::info!("Loaded configuration: {:?}", config);

    let service = setup(&config).await?;
    let server = Server::new(service, &config.server).await?;

    server.run_until(shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {e}"),
    }
}
