use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Booking, BookingStatus, Contact, Project};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbBooking {
    pub id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub project_type: Option<String>,
    pub details: Option<String>,
    pub preferred_contact: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbProject {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub impact_metrics: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| AppError::Database(format!("Corrupt id '{}': {}", raw, e)))
}

impl TryFrom<DbContact> for Contact {
    type Error = AppError;

    fn try_from(row: DbContact) -> Result<Self, Self::Error> {
        Ok(Contact {
            id: parse_id(&row.id)?,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = AppError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status: BookingStatus = row.status.parse().map_err(AppError::Database)?;

        Ok(Booking {
            id: parse_id(&row.id)?,
            full_name: row.full_name,
            phone: row.phone,
            whatsapp: row.whatsapp,
            project_type: row.project_type,
            details: row.details,
            preferred_contact: row.preferred_contact,
            status,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbProject> for Project {
    type Error = AppError;

    fn try_from(row: DbProject) -> Result<Self, Self::Error> {
        Ok(Project {
            id: parse_id(&row.id)?,
            title: row.title,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            year: row.year,
            impact_metrics: row.impact_metrics,
            video_url: row.video_url,
            created_at: row.created_at,
        })
    }
}
