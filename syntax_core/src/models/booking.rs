//! Booking requests and their admin-side lifecycle

use crate::error::{AppError, Result};
use crate::models::{double_option, non_blank, null_as_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Processed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Processed => write!(f, "processed"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "processed" => Ok(BookingStatus::Processed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub project_type: Option<String>,
    pub details: Option<String>,
    pub preferred_contact: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BookingStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn apply(&mut self, changes: &BookingChanges) {
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(notes) = &changes.admin_notes {
            self.admin_notes = notes.clone();
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("Unknown")
    }
}

/// Body of `POST /api/bookings`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookingSubmission {
    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 40, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 40, message = "WhatsApp number is too long"))]
    pub whatsapp: Option<String>,
    #[validate(length(max = 100, message = "Project type is too long"))]
    pub project_type: Option<String>,
    #[validate(length(max = 5000, message = "Details must not exceed 5000 characters"))]
    pub details: Option<String>,
    #[validate(length(max = 40, message = "Preferred contact method is too long"))]
    pub preferred_contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewBooking {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub project_type: Option<String>,
    pub details: Option<String>,
    pub preferred_contact: Option<String>,
}

impl BookingSubmission {
    pub fn into_new_booking(self) -> Result<NewBooking> {
        let trimmed = BookingSubmission {
            full_name: non_blank(self.full_name),
            phone: non_blank(self.phone),
            whatsapp: non_blank(self.whatsapp),
            project_type: non_blank(self.project_type),
            details: non_blank(self.details),
            preferred_contact: non_blank(self.preferred_contact),
        };

        trimmed.validate()?;

        let booking = NewBooking {
            full_name: trimmed.full_name,
            phone: trimmed.phone,
            whatsapp: trimmed.whatsapp,
            project_type: trimmed.project_type,
            details: trimmed.details,
            preferred_contact: trimmed.preferred_contact,
        };

        if booking == NewBooking::default() {
            return Err(AppError::BadRequest("Booking request is empty".to_string()));
        }

        Ok(booking)
    }
}

/// Admin-side partial update. Absent fields are left alone; `admin_notes: null`
/// or a blank string clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub admin_notes: Option<Option<String>>,
}

impl BookingChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.admin_notes.is_none()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(AppError::BadRequest("No updates provided".to_string()));
        }

        Ok(Self {
            status: self.status,
            admin_notes: self.admin_notes.map(non_blank),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            full_name: Some("Chidi".to_string()),
            phone: Some("+2348000000000".to_string()),
            whatsapp: None,
            project_type: Some("Website".to_string()),
            details: None,
            preferred_contact: Some("whatsapp".to_string()),
            status: BookingStatus::Pending,
            admin_notes: Some("call back".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(BookingStatus::Processed.to_string(), "processed");
        assert_eq!("pending".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert!("paid".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_null_status_reads_as_pending() {
        let booking: Booking = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "full_name": null,
            "phone": null,
            "whatsapp": null,
            "project_type": null,
            "details": null,
            "preferred_contact": null,
            "status": null,
            "admin_notes": null,
            "created_at": "2025-01-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_submission_blank_fields_become_absent() {
        let booking = BookingSubmission {
            full_name: Some("  Chidi ".to_string()),
            phone: Some("".to_string()),
            whatsapp: Some("   ".to_string()),
            ..Default::default()
        }
        .into_new_booking()
        .unwrap();

        assert_eq!(booking.full_name.as_deref(), Some("Chidi"));
        assert!(booking.phone.is_none());
        assert!(booking.whatsapp.is_none());
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let result = BookingSubmission {
            details: Some(" ".to_string()),
            ..Default::default()
        }
        .into_new_booking();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_changes_distinguish_absent_and_null() {
        let changes: BookingChanges = serde_json::from_value(json!({"status": "processed"})).unwrap();
        assert_eq!(changes.admin_notes, None);

        let changes: BookingChanges = serde_json::from_value(json!({"admin_notes": null})).unwrap();
        assert_eq!(changes.admin_notes, Some(None));
        assert_eq!(changes.status, None);
    }

    #[test]
    fn test_apply_changes() {
        let mut booking = sample_booking();

        let changes = BookingChanges {
            status: Some(BookingStatus::Processed),
            admin_notes: None,
        };
        booking.apply(&changes);
        assert_eq!(booking.status, BookingStatus::Processed);
        assert_eq!(booking.admin_notes.as_deref(), Some("call back"));

        let clear = BookingChanges {
            status: None,
            admin_notes: Some(Some("   ".to_string())),
        }
        .normalized()
        .unwrap();
        booking.apply(&clear);
        assert_eq!(booking.admin_notes, None);
        assert_eq!(booking.status, BookingStatus::Processed);
    }

    #[test]
    fn test_empty_changes_are_rejected() {
        assert!(BookingChanges::default().normalized().is_err());
    }

    #[test]
    fn test_changes_serialize_only_present_fields() {
        let changes = BookingChanges {
            status: None,
            admin_notes: Some(None),
        };
        assert_eq!(serde_json::to_value(&changes).unwrap(), json!({"admin_notes": null}));
    }
}
