mod app;

use std::fs::{self, OpenOptions};

use anyhow::Result;
use tracing_subscriber::{prelude::*, EnvFilter};

use railway_core::{
    catalog::loader,
    config::{self, AppConfig},
    RailwaySession,
};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;

    let session = match config.catalog_path.as_deref() {
        Some(path) => RailwaySession::with_catalog(loader::load_catalog(path)?),
        None => RailwaySession::seeded(),
    };
    tracing::info!(trains = session.catalog().len(), "session ready");

    let mut app = app::RailwayApp::new(session, &config);
    app.run().await
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = match config.log_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?.join("logs"),
    };
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("railtui.log");

    let env_filter = EnvFilter::from_default_env();

    // The UI owns the terminal, so everything goes to the file layer.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
