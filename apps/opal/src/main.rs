//! Opal desktop shell entry point.

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Opal");

    // Load configuration.
    let config = opal::config::Config::load()?;
    tracing::info!(language = %config.language, "configuration loaded");

    // The main thread becomes the UI thread.
    opal::app::run(config)?;

    tracing::info!("Opal shut down cleanly");
    Ok(())
}
