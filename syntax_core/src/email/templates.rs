//! Notification bodies. Every user-supplied value goes through `escape_html`.

use super::EmailMessage;
use crate::models::{Booking, Contact};

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn multiline(input: &str) -> String {
    escape_html(input).replace("\r\n", "\n").replace('\n', "<br>")
}

fn field(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => "N/A".to_string(),
    }
}

pub fn contact_notification(contact: &Contact, from: &str, to: &[String]) -> EmailMessage {
    let html = format!(
        "<h1>New Contact Message</h1>\n\
         <p><b>Name:</b> {}</p>\n\
         <p><b>Email:</b> {}</p>\n\
         <p><b>Message:</b><br>{}</p>\n",
        escape_html(&contact.name),
        escape_html(&contact.email),
        multiline(&contact.message),
    );

    EmailMessage {
        from: from.to_string(),
        to: to.to_vec(),
        subject: format!("New contact from {}", contact.name),
        html,
    }
}

pub fn booking_notification(booking: &Booking, from: &str, to: &[String]) -> EmailMessage {
    let details = match booking.details.as_deref() {
        Some(d) if !d.is_empty() => multiline(d),
        _ => "N/A".to_string(),
    };

    let html = format!(
        "<h2>New Project Request</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>WhatsApp:</strong> {}</p>\n\
         <p><strong>Project Type:</strong> {}</p>\n\
         <p><strong>Preferred Contact:</strong> {}</p>\n\
         <p><strong>Details:</strong><br>{}</p>\n",
        field(booking.full_name.as_deref()),
        field(booking.phone.as_deref()),
        field(booking.whatsapp.as_deref()),
        field(booking.project_type.as_deref()),
        field(booking.preferred_contact.as_deref()),
        details,
    );

    EmailMessage {
        from: from.to_string(),
        to: to.to_vec(),
        subject: format!("New Project Request from {}", booking.display_name()),
        html,
    }
}
