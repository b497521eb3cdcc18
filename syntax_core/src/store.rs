//! Storage seams shared by the SQLite and hosted backends

use crate::error::Result;
use crate::models::{
    Booking, BookingChanges, Contact, NewBooking, NewContact, NewProject, Project, ProjectChanges,
    ProjectFilter,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create_contact(&self, input: NewContact) -> Result<Contact>;
    /// Newest first.
    async fn list_contacts(&self) -> Result<Vec<Contact>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, input: NewBooking) -> Result<Booking>;
    /// Newest first.
    async fn list_bookings(&self) -> Result<Vec<Booking>>;
    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Booking>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, input: NewProject) -> Result<Project>;
    /// Newest first.
    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>>;
    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project>;
    /// Returns `false` when no project had that id.
    async fn delete_project(&self, id: Uuid) -> Result<bool>;
    async fn health_check(&self) -> Result<()>;
}

/// One handle per entity, all pointing at the same backend.
#[derive(Clone)]
pub struct Stores {
    pub contacts: Arc<dyn ContactStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub projects: Arc<dyn ProjectStore>,
}

impl Stores {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        bookings: Arc<dyn BookingStore>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            contacts,
            bookings,
            projects,
        }
    }

    pub fn from_backend<B>(backend: B) -> Self
    where
        B: ContactStore + BookingStore + ProjectStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            contacts: backend.clone(),
            bookings: backend.clone(),
            projects: backend,
        }
    }
}
