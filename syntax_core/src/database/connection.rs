use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::time::Duration;
use tracing::{info, error};
use crate::error::{AppError, Result};

pub(crate) async fn health_check(pool: &SqlitePool) -> Result<()> {
    let test_value: Option<i32> = sqlx::query_scalar("SELECT 1")
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Database health check failed: {}", e);
            AppError::from(e)
        })?
        .into_iter()
        .next();

    if test_value == Some(1) {
        Ok(())
    } else {
        Err(AppError::Database("Health check returned an unexpected value".to_string()))
    }
}

pub async fn get_database_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(database_url)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    sqlx::query("PRAGMA busy_timeout = 30000")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    info!("Database connection pool created successfully");
    Ok(pool)
}
