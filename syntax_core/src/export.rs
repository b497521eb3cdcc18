//! CSV export of dashboard records.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{AppError, Result};
use crate::models::{Booking, Contact};

/// A record that can be flattened into one CSV row.
pub trait CsvRecord {
    const COLUMNS: &'static [&'static str];

    /// One value per column, `None` for absent values.
    fn values(&self) -> Vec<Option<String>>;
}

impl CsvRecord for Contact {
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "message", "created_at"];

    fn values(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            Some(self.name.clone()),
            Some(self.email.clone()),
            Some(self.message.clone()),
            Some(self.created_at.to_rfc3339()),
        ]
    }
}

impl CsvRecord for Booking {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "full_name",
        "phone",
        "whatsapp",
        "project_type",
        "details",
        "preferred_contact",
        "status",
        "admin_notes",
        "created_at",
    ];

    fn values(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            self.full_name.clone(),
            self.phone.clone(),
            self.whatsapp.clone(),
            self.project_type.clone(),
            self.details.clone(),
            self.preferred_contact.clone(),
            Some(self.status.to_string()),
            self.admin_notes.clone(),
            Some(self.created_at.to_rfc3339()),
        ]
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Csv(csv::Error::from(e.into_error())))
}

/// Header row as bare column names, then every value double-quoted.
pub fn to_csv<R: CsvRecord>(records: &[R]) -> Result<String> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(R::COLUMNS)?;
    let buffer = finish(header)?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for record in records {
        rows.write_record(
            record
                .values()
                .into_iter()
                .map(|v| v.unwrap_or_default()),
        )?;
    }
    let buffer = finish(rows)?;

    String::from_utf8(buffer).map_err(|e| AppError::Other(anyhow::anyhow!("CSV output was not UTF-8: {}", e)))
}
