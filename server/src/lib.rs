pub mod app;
pub mod config;
pub mod server;
pub mod services;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load environment and configuration, then build shared state.
pub fn init_foundation() -> Result<app::SharedState, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load();
    tracing::info!(
        port = config.server_port,
        bind = %config.bind_address,
        preview_timeout_secs = config.preview_timeout_secs,
        "Configuration loaded"
    );

    app::SharedState::new(config)
}
