use sqlx::{SqlitePool, Row};
use tracing::{info, error};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Starting database migrations");

        self.create_migrations_table().await?;

        let current_version = self.get_current_version().await?;
        info!("Current migration version: {}", current_version);

        let mut applied_count = 0;

        for migration in migrations() {
            if migration.version > current_version {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply_migration(&migration).await?;
                applied_count += 1;
            }
        }

        if applied_count > 0 {
            info!("Applied {} migrations successfully", applied_count);
        } else {
            info!("No new migrations to apply");
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn get_current_version(&self) -> Result<i64> {
        let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM _migrations")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next()
            .unwrap_or(0);

        Ok(version)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.sql_statements.iter().copied() {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query(r#"
            INSERT INTO _migrations (version, name, checksum)
            VALUES (?, ?, ?)
        "#)
        .bind(migration.version)
        .bind(migration.name)
        .bind(migration.checksum)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }

    pub async fn get_migration_history(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query(r#"
            SELECT version, name, applied_at, checksum
            FROM _migrations
            ORDER BY version
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(MigrationRecord {
                version: row.try_get("version").unwrap_or(0),
                name: row.try_get("name").unwrap_or_default(),
                applied_at: row.try_get("applied_at").unwrap_or_else(|_| Utc::now()),
                checksum: row.try_get("checksum").unwrap_or_default(),
            });
        }

        Ok(records)
    }
}

#[derive(Debug, Clone)]
struct Migration {
    version: i64,
    name: &'static str,
    checksum: &'static str,
    sql_statements: &'static [&'static str],
}

fn migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "create_contact_table",
            checksum: "contact_v1",
            sql_statements: &[
                r#"
                CREATE TABLE contact (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    message TEXT NOT NULL,
                    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                "CREATE INDEX idx_contact_created_at ON contact(created_at)",
            ],
        },
        Migration {
            version: 2,
            name: "create_bookings_table",
            checksum: "bookings_v1",
            sql_statements: &[
                r#"
                CREATE TABLE bookings (
                    id TEXT PRIMARY KEY NOT NULL,
                    full_name TEXT,
                    phone TEXT,
                    whatsapp TEXT,
                    project_type TEXT,
                    details TEXT,
                    preferred_contact TEXT,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'processed')),
                    admin_notes TEXT,
                    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                "CREATE INDEX idx_bookings_created_at ON bookings(created_at)",
                "CREATE INDEX idx_bookings_status ON bookings(status)",
            ],
        },
        Migration {
            version: 3,
            name: "create_projects_table",
            checksum: "projects_v1",
            sql_statements: &[
                r#"
                CREATE TABLE projects (
                    id TEXT PRIMARY KEY NOT NULL,
                    title TEXT NOT NULL,
                    slug TEXT,
                    description TEXT NOT NULL DEFAULT '',
                    image_url TEXT,
                    category TEXT,
                    year INTEGER,
                    impact_metrics TEXT,
                    video_url TEXT,
                    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                "CREATE INDEX idx_projects_created_at ON projects(created_at)",
                "CREATE INDEX idx_projects_slug ON projects(slug)",
                "CREATE INDEX idx_projects_category ON projects(category)",
            ],
        },
    ]
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    let migration_manager = MigrationManager::new(pool);
    migration_manager.run_migrations().await
}
