use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag stamped on every contact-form submission
pub const SUBMISSION_SOURCE: &str = "website-contact-form";

/// Raw contact form fields as the user left them
///
/// Nothing here is trimmed or checked yet - see [`crate::validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub interest: String,
    pub message: String,
    pub newsletter: bool,
}

/// One contact-form submission, as posted and as queued in local storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub interest: String,
    pub message: String,
    pub newsletter: bool,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl SubmissionRecord {
    /// Build a record from form fields, trimming the free-text ones
    pub fn from_form(form: &ContactForm, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            interest: form.interest.clone(),
            message: form.message.trim().to_string(),
            newsletter: form.newsletter,
            timestamp,
            source: SUBMISSION_SOURCE.to_string(),
        }
    }
}

/// One tracked interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event: String,
    /// Free-form payload, whatever the call site wanted to attach
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
