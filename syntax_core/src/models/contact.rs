//! Contact form submissions

use crate::error::{AppError, Result};
use crate::models::non_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactSubmission {
    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 5000, message = "Message must not exceed 5000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn into_new_contact(self) -> Result<NewContact> {
        let trimmed = ContactSubmission {
            name: non_blank(self.name),
            email: non_blank(self.email),
            message: non_blank(self.message),
        };

        let (name, email, message) = match (&trimmed.name, &trimmed.email, &trimmed.message) {
            (Some(name), Some(email), Some(message)) => {
                (name.clone(), email.clone(), message.clone())
            }
            _ => return Err(AppError::BadRequest("All fields are required".to_string())),
        };

        trimmed.validate()?;

        Ok(NewContact { name, email, message })
    }
}
