//! Store backend for the hosted relational data service (PostgREST dialect).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Booking, BookingChanges, BookingStatus, Contact, NewBooking, NewContact, NewProject, Project,
    ProjectChanges, ProjectFilter,
};
use crate::store::{BookingStore, ContactStore, ProjectStore};

const CONTACT_TABLE: &str = "contact";
const BOOKING_TABLE: &str = "bookings";
const PROJECT_TABLE: &str = "projects";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
}

#[derive(Serialize)]
struct BookingInsert<'a> {
    #[serde(flatten)]
    booking: &'a NewBooking,
    status: BookingStatus,
}

/// One client per API key. The anon key is subject to row-level security on the
/// service side; the service-role key bypasses it.
#[derive(Clone)]
pub struct PostgrestClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_rows<R: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<R>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<PostgrestError>(&body) {
                Ok(PostgrestError { message: Some(message), details }) => match details {
                    Some(details) => format!("{} ({})", message, details),
                    None => message,
                },
                _ => body,
            };
            error!(table = table, status = status.as_u16(), "Hosted store request failed: {}", message);
            return Err(AppError::Upstream(format!("{} on {}: {}", status, table, message)));
        }

        response.json::<Vec<R>>().await.map_err(AppError::from)
    }

    async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(table = table, "Inserting row into hosted store");

        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        Self::read_rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream(format!("Insert into {} returned no rows", table)))
    }

    async fn select<R: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<R>> {
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await?;

        Self::read_rows(table, response).await
    }

    async fn patch<T, R>(&self, table: &str, id: Uuid, changes: &T) -> Result<Option<R>>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await?;

        Ok(Self::read_rows(table, response).await?.into_iter().next())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<bool> {
        let response = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let removed: Vec<serde_json::Value> = Self::read_rows(table, response).await?;
        Ok(!removed.is_empty())
    }
}

fn newest_first() -> (&'static str, String) {
    ("order", "created_at.desc".to_string())
}

#[async_trait]
impl ContactStore for PostgrestClient {
    async fn create_contact(&self, input: NewContact) -> Result<Contact> {
        self.insert(CONTACT_TABLE, &input).await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.select(CONTACT_TABLE, &[newest_first()]).await
    }
}

#[async_trait]
impl BookingStore for PostgrestClient {
    async fn create_booking(&self, input: NewBooking) -> Result<Booking> {
        let row = BookingInsert {
            booking: &input,
            status: BookingStatus::Pending,
        };
        self.insert(BOOKING_TABLE, &row).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.select(BOOKING_TABLE, &[newest_first()]).await
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Booking> {
        self.patch(BOOKING_TABLE, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }
}

#[async_trait]
impl ProjectStore for PostgrestClient {
    async fn create_project(&self, input: NewProject) -> Result<Project> {
        self.insert(PROJECT_TABLE, &input).await
    }

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let mut filters = vec![newest_first()];
        if let Some(category) = filter.category() {
            filters.push(("category", format!("eq.{}", category)));
        }
        if let Some(limit) = filter.limit {
            filters.push(("limit", limit.to_string()));
        }

        self.select(PROJECT_TABLE, &filters).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let rows: Vec<Project> = self
            .select(PROJECT_TABLE, &[("id", format!("eq.{}", id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let rows: Vec<Project> = self
            .select(
                PROJECT_TABLE,
                &[
                    ("slug", format!("eq.{}", slug)),
                    newest_first(),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project> {
        self.patch(PROJECT_TABLE, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        self.delete(PROJECT_TABLE, id).await
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .request(Method::GET, PROJECT_TABLE)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        let _: Vec<serde_json::Value> = Self::read_rows(PROJECT_TABLE, response).await?;
        Ok(())
    }
}
