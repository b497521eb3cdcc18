use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::connection;
use crate::database::models::{DbBooking, DbContact, DbProject};
use crate::error::{AppError, Result};
use crate::models::{
    Booking, BookingChanges, BookingStatus, Contact, NewBooking, NewContact, NewProject, Project,
    ProjectChanges, ProjectFilter,
};
use crate::store::{BookingStore, ContactStore, ProjectStore, Stores};

const CONTACT_COLUMNS: &str = "id, name, email, message, created_at";
const BOOKING_COLUMNS: &str = "id, full_name, phone, whatsapp, project_type, details, preferred_contact, status, admin_notes, created_at";
const PROJECT_COLUMNS: &str = "id, title, slug, description, image_url, category, year, impact_metrics, video_url, created_at";

// Rows are read with `fetch_all` so SQLite resets the statement. A partially read
// `RETURNING` keeps its transaction open and hides the row from other connections.

/// Builds the store bundle over a single SQLite pool.
pub fn sqlite_stores(pool: SqlitePool) -> Stores {
    Stores::new(
        std::sync::Arc::new(ContactRepository::new(pool.clone())),
        std::sync::Arc::new(BookingRepository::new(pool.clone())),
        std::sync::Arc::new(ProjectRepository::new(pool)),
    )
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn create_contact(&self, input: NewContact) -> Result<Contact> {
        let query = format!(
            "INSERT INTO contact (id, name, email, message, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {}",
            CONTACT_COLUMNS
        );

        let row: DbContact = sqlx::query_as(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.message)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        row.try_into()
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let query = format!(
            "SELECT {} FROM contact ORDER BY created_at DESC, rowid DESC",
            CONTACT_COLUMNS
        );

        let rows: Vec<DbContact> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database query failed: query={}, error={}", query, e);
                AppError::from(e)
            })?;

        rows.into_iter().map(Contact::try_from).collect()
    }
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let query = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);

        let row: Option<DbBooking> = sqlx::query_as(&query)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next();

        row.map(Booking::try_from).transpose()
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn create_booking(&self, input: NewBooking) -> Result<Booking> {
        let query = format!(
            r#"
            INSERT INTO bookings (id, full_name, phone, whatsapp, project_type, details, preferred_contact, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let row: DbBooking = sqlx::query_as(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.whatsapp)
            .bind(&input.project_type)
            .bind(&input.details)
            .bind(&input.preferred_contact)
            .bind(BookingStatus::Pending.to_string())
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        row.try_into()
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let query = format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC, rowid DESC",
            BOOKING_COLUMNS
        );

        let rows: Vec<DbBooking> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database query failed: query={}, error={}", query, e);
                AppError::from(e)
            })?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Booking> {
        let mut booking = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;

        booking.apply(&changes);

        let result = sqlx::query("UPDATE bookings SET status = ?, admin_notes = ? WHERE id = ?")
            .bind(booking.status.to_string())
            .bind(&booking.admin_notes)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking with id {} not found", id)));
        }

        Ok(booking)
    }
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn create_project(&self, input: NewProject) -> Result<Project> {
        let query = format!(
            r#"
            INSERT INTO projects (id, title, slug, description, image_url, category, year, impact_metrics, video_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        );

        let row: DbProject = sqlx::query_as(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.category)
            .bind(input.year)
            .bind(&input.impact_metrics)
            .bind(&input.video_url)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        row.try_into()
    }

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let query = format!(
            r#"
            SELECT {}
            FROM projects
            WHERE (? IS NULL OR category = ?)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
            PROJECT_COLUMNS
        );

        let category = filter.category();
        // SQLite treats a negative LIMIT as unbounded.
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);

        let rows: Vec<DbProject> = sqlx::query_as(&query)
            .bind(category)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database query failed: query={}, limit={}, error={}", query, limit, e);
                AppError::from(e)
            })?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let query = format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS);

        let row: Option<DbProject> = sqlx::query_as(&query)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next();

        row.map(Project::try_from).transpose()
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let query = format!(
            "SELECT {} FROM projects WHERE slug = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
            PROJECT_COLUMNS
        );

        let row: Option<DbProject> = sqlx::query_as(&query)
            .bind(slug)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .next();

        row.map(Project::try_from).transpose()
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project> {
        let mut project = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))?;

        project.apply(&changes);

        let result = sqlx::query(r#"
            UPDATE projects
            SET title = ?, slug = ?, description = ?, image_url = ?, category = ?,
                year = ?, impact_metrics = ?, video_url = ?
            WHERE id = ?
        "#)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.category)
        .bind(project.year)
        .bind(&project.impact_metrics)
        .bind(&project.video_url)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project with id {} not found", id)));
        }

        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<()> {
        connection::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_database_pool, run_migrations};
    use tempfile::NamedTempFile;

    async fn setup() -> (SqlitePool, NamedTempFile) {
        setup_with_connections(2).await
    }

    async fn setup_with_connections(max_connections: u32) -> (SqlitePool, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());
        let pool = get_database_pool(&database_url, max_connections).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();
        (pool, temp_file)
    }

    fn new_project(title: &str, category: Option<&str>) -> NewProject {
        NewProject {
            title: title.to_string(),
            category: category.map(str::to_string),
            ..Default::default()
        }
        .prepare()
        .unwrap()
    }

    #[tokio::test]
    async fn test_contacts_are_listed_newest_first() {
        let (pool, _guard) = setup().await;
        let repo = ContactRepository::new(pool);

        for name in ["first", "second", "third"] {
            repo.create_contact(NewContact {
                name: name.to_string(),
                email: format!("{}@example.com", name),
                message: "hello".to_string(),
            })
            .await
            .unwrap();
        }

        let contacts = repo.list_contacts().await.unwrap();
        let names: Vec<_> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let (pool, _guard) = setup().await;
        let repo = BookingRepository::new(pool);

        let booking = repo
            .create_booking(NewBooking {
                full_name: Some("Chidi".to_string()),
                phone: Some("+2348000000000".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.admin_notes, None);

        let updated = repo
            .update_booking(
                booking.id,
                BookingChanges {
                    status: Some(BookingStatus::Processed),
                    admin_notes: Some(Some("Quoted 150k".to_string())),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Processed);
        assert_eq!(updated.admin_notes.as_deref(), Some("Quoted 150k"));

        let stored = repo.get_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_missing_booking_is_not_found() {
        let (pool, _guard) = setup().await;
        let repo = BookingRepository::new(pool);

        let result = repo
            .update_booking(
                Uuid::new_v4(),
                BookingChanges {
                    status: Some(BookingStatus::Processed),
                    admin_notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_project_crud() {
        let (pool, _guard) = setup().await;
        let repo = ProjectRepository::new(pool);

        let created = repo
            .create_project(new_project("Lagos Bakery", Some("Web")))
            .await
            .unwrap();
        assert_eq!(created.slug.as_deref(), Some("lagos-bakery"));

        let by_slug = repo.get_project_by_slug("lagos-bakery").await.unwrap().unwrap();
        assert_eq!(by_slug.id, created.id);

        let changes = ProjectChanges {
            description: Some("Rebuilt storefront".to_string()),
            image_url: Some(Some("bakery.png".to_string())),
            ..Default::default()
        };
        let updated = repo.update_project(created.id, changes).await.unwrap();
        assert_eq!(updated.description, "Rebuilt storefront");
        assert_eq!(updated.image_url.as_deref(), Some("bakery.png"));
        assert_eq!(updated.title, "Lagos Bakery");

        assert!(repo.delete_project(created.id).await.unwrap());
        assert!(!repo.delete_project(created.id).await.unwrap());
        assert!(repo.get_project(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_project_filter_and_limit() {
        let (pool, _guard) = setup().await;
        let repo = ProjectRepository::new(pool);

        repo.create_project(new_project("One", Some("Web"))).await.unwrap();
        repo.create_project(new_project("Two", Some("Branding"))).await.unwrap();
        repo.create_project(new_project("Three", Some("Web"))).await.unwrap();

        let all = repo.list_projects(ProjectFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title, "Three");

        let web = repo
            .list_projects(ProjectFilter {
                category: Some("Web".to_string()),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(web.len(), 2);

        let everything = repo
            .list_projects(ProjectFilter {
                category: Some("All".to_string()),
                limit: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(everything.len(), 2);

        repo.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_inserts_are_visible_to_the_next_listing() {
        let (pool, _guard) = setup_with_connections(4).await;
        let contacts = ContactRepository::new(pool.clone());
        let bookings = BookingRepository::new(pool.clone());
        let projects = ProjectRepository::new(pool);

        for i in 0..20 {
            contacts
                .create_contact(NewContact {
                    name: format!("Visitor {}", i),
                    email: format!("visitor{}@example.com", i),
                    message: "hello".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(contacts.list_contacts().await.unwrap().len(), i + 1);

            bookings
                .create_booking(NewBooking {
                    full_name: Some(format!("Client {}", i)),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(bookings.list_bookings().await.unwrap().len(), i + 1);

            let project = projects
                .create_project(new_project(&format!("Project {}", i), None))
                .await
                .unwrap();
            let listed = projects.list_projects(ProjectFilter::default()).await.unwrap();
            assert_eq!(listed.len(), i + 1);
            assert_eq!(listed[0].id, project.id);
        }
    }
}
