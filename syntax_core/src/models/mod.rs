pub mod booking;
pub mod contact;
pub mod project;
pub mod request;

pub use booking::{Booking, BookingChanges, BookingStatus, BookingSubmission, NewBooking};
pub use contact::{Contact, ContactSubmission, NewContact};
pub use project::{categories, slugify, NewProject, Project, ProjectChanges, ProjectFilter};
pub use request::ApiResponse;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Trims a form value; blank strings become `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
