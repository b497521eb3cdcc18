//! In-memory backend and mailers for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::email::{EmailMessage, Mailer};
use crate::error::{AppError, Result};
use crate::models::{
    Booking, BookingChanges, BookingStatus, Contact, NewBooking, NewContact, NewProject, Project,
    ProjectChanges, ProjectFilter,
};
use crate::store::{BookingStore, ContactStore, ProjectStore, Stores};
use crate::AppState;

/// Rows are kept oldest first; listings reverse them.
#[derive(Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<Contact>>,
    bookings: Mutex<Vec<Booking>>,
    projects: Mutex<Vec<Project>>,
    pub fail: Mutex<bool>,
}

impl MemoryStore {
    fn check(&self) -> Result<()> {
        if *self.fail.lock() {
            return Err(AppError::Database("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn create_contact(&self, input: NewContact) -> Result<Contact> {
        self.check()?;
        let contact = Contact {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            message: input.message,
            created_at: Utc::now(),
        };
        self.contacts.lock().push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.check()?;
        Ok(self.contacts.lock().iter().rev().cloned().collect())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_booking(&self, input: NewBooking) -> Result<Booking> {
        self.check()?;
        let booking = Booking {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            phone: input.phone,
            whatsapp: input.whatsapp,
            project_type: input.project_type,
            details: input.details,
            preferred_contact: input.preferred_contact,
            status: BookingStatus::Pending,
            admin_notes: None,
            created_at: Utc::now(),
        };
        self.bookings.lock().push(booking.clone());
        Ok(booking)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.check()?;
        Ok(self.bookings.lock().iter().rev().cloned().collect())
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> Result<Booking> {
        self.check()?;
        let mut bookings = self.bookings.lock();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;
        booking.apply(&changes);
        Ok(booking.clone())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, input: NewProject) -> Result<Project> {
        self.check()?;
        let project = Project {
            id: Uuid::new_v4(),
            title: input.title,
            slug: input.slug,
            description: input.description,
            image_url: input.image_url,
            category: input.category,
            year: input.year,
            impact_metrics: input.impact_metrics,
            video_url: input.video_url,
            created_at: Utc::now(),
        };
        self.projects.lock().push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        self.check()?;
        let projects = self.projects.lock();
        let matching = projects.iter().rev().filter(|p| filter.matches(p)).cloned();
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        self.check()?;
        Ok(self.projects.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        self.check()?;
        Ok(self
            .projects
            .lock()
            .iter()
            .rev()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project> {
        self.check()?;
        let mut projects = self.projects.lock();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))?;
        project.apply(&changes);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        let mut projects = self.projects.lock();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() < before)
    }

    async fn health_check(&self) -> Result<()> {
        self.check()
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<()> {
        Err(AppError::Email("provider down".to_string()))
    }
}

pub const TEST_TOKEN: &str = "test-admin-token";

pub fn state_with(store: Arc<MemoryStore>) -> AppState {
    let mut config = AppConfig::default();
    config.admin.api_token = TEST_TOKEN.to_string();
    config.admin.email = "owner@syntax.com.ng".to_string();

    let stores = Stores::new(store.clone(), store.clone(), store);
    AppState::new(stores.clone(), stores, &config).unwrap()
}

pub fn memory_state() -> AppState {
    state_with(Arc::new(MemoryStore::default()))
}
