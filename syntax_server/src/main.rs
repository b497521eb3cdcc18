//! Main entry point for the Syntax API server binary

use anyhow::Result;
use std::net::SocketAddr;
use syntax_core::{create_app, run_server, stores_from_config, AppConfig, AppState, StoreBackend};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    match config.store.backend {
        StoreBackend::Sqlite => info!("Using SQLite store: {}", config.store.database_url),
        StoreBackend::Hosted => info!("Using hosted data service: {}", config.store.hosted_url),
    }

    let (public, admin) = stores_from_config(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize data store: {}", e))?;

    let state = AppState::new(public, admin, &config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;

    info!("App: {} v{}", state.app_name, state.version);
    info!(
        "Email notifications: {}",
        if config.email.enabled && !config.email.api_key.is_empty() { "enabled" } else { "disabled" }
    );

    let app = create_app(state, &config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "{}={},syntax_core={},tower_http=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level,
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
