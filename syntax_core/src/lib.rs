//! Core library for the Syntax studio backend: storage, notifications and route handlers.

pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod export;
pub mod extractors;
pub mod handlers;
pub mod hosted;
pub mod indexnow;
pub mod middleware;
pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{AppConfig, StoreBackend};
pub use database::{get_database_pool, run_migrations, sqlite_stores};
pub use email::{mailer_from_config, DisabledMailer, EmailMessage, Mailer, ResendMailer};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use hosted::{hosted_stores, PostgrestClient};
pub use indexnow::{IndexNowClient, IndexNowOutcome};
pub use store::{BookingStore, ContactStore, ProjectStore, Stores};

use axum::Router;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    /// Stores used by public routes (anon key on the hosted backend).
    pub public: Stores,
    /// Stores used behind the admin token (service-role key on the hosted backend).
    pub admin: Stores,
    pub mailer: Arc<dyn Mailer>,
    pub indexnow: IndexNowClient,
    pub admin_token: String,
    pub email_from: String,
    pub notify_to: Vec<String>,
}

impl AppState {
    pub fn new(public: Stores, admin: Stores, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            app_name: "Syntax API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            public,
            admin,
            mailer: mailer_from_config(config)?,
            indexnow: IndexNowClient::from_config(&config.indexnow)?,
            admin_token: config.admin.api_token.clone(),
            email_from: config.email.from.clone(),
            notify_to: config.notification_recipients(),
        })
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Sends a notification after the record is already stored, so delivery
    /// failures are logged and never reach the caller.
    pub async fn notify(&self, message: EmailMessage) {
        if message.to.is_empty() {
            warn!(subject = %message.subject, "No notification recipients configured, skipping email");
            return;
        }

        if let Err(e) = self.mailer.send(&message).await {
            error!(subject = %message.subject, "Failed to send notification email: {}", e);
        }
    }
}

/// Public and admin store bundles for the configured backend.
pub async fn stores_from_config(config: &AppConfig) -> Result<(Stores, Stores)> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            let pool = get_database_pool(&config.store.database_url, config.store.max_connections).await?;
            run_migrations(pool.clone()).await?;

            let stores = sqlite_stores(pool);
            Ok((stores.clone(), stores))
        }
        StoreBackend::Hosted => {
            let timeout = Duration::from_secs(config.store.timeout_seconds);
            let public = hosted_stores(&config.store.hosted_url, &config.store.anon_key, timeout)?;
            let admin = hosted_stores(&config.store.hosted_url, &config.store.service_role_key, timeout)?;
            Ok((public, admin))
        }
    }
}

pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
