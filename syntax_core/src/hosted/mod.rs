pub mod postgrest;

pub use postgrest::PostgrestClient;

use std::time::Duration;

use crate::error::Result;
use crate::store::Stores;

/// Builds the store bundle for a hosted data service from one API key.
pub fn hosted_stores(base_url: &str, api_key: &str, timeout: Duration) -> Result<Stores> {
    let client = PostgrestClient::new(base_url, api_key, timeout)?;
    Ok(Stores::from_backend(client))
}
