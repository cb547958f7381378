//! # Contact Form Validation
//!
//! Field rules run in a fixed order (name, email, message) and the first
//! violated rule is the one reported back to the client. Matches the order
//! the contact form presents its fields.

use email_address::EmailAddress;
use serde::Deserialize;
use thiserror::Error;

/// Untrusted request body of `POST /contact`, as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed every rule. Name and message are trimmed and
/// HTML-escaped; email is lowercased and otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

pub fn validate(raw: &RawSubmission) -> Result<ContactSubmission, ValidationError> {
    let name = raw.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(ValidationError("Name is required"));
    }

    let email = raw.email.as_deref().unwrap_or_default().trim();
    if !is_valid_email(email) {
        return Err(ValidationError("Valid email is required"));
    }

    let message = raw.message.as_deref().unwrap_or_default().trim();
    if message.is_empty() {
        return Err(ValidationError("Message is required"));
    }

    Ok(ContactSubmission {
        name: escape_html(name),
        email: email.to_lowercase(),
        message: escape_html(message),
    })
}

// Addresses like `john@localhost` parse fine but never belong on a public
// contact form, so the domain must carry a dot.
fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
