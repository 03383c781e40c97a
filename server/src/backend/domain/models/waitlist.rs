use crate::backend::storage::{FieldValue, Fields};

pub const DEFAULT_WAITLIST_SOURCE: &str = "landing";
pub const ASK_RAFIQ_SOURCE: &str = "ask-rafiq";

/// A landing-page signup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub email: String,
    pub source: String,
}

impl WaitlistEntry {
    /// Lowercases and trims the address; no syntax check is made
    pub fn new(email: &str, source: &str) -> Self {
        Self {
            email: normalize_email(email),
            source: source.to_string(),
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), FieldValue::from(self.email));
        fields.insert("source".to_string(), FieldValue::from(self.source));
        fields.insert("createdAt".to_string(), FieldValue::ServerTimestamp);
        fields
    }
}

/// A question asked through the "Ask Rafiq" form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRafiqEmailEntry {
    pub email: String,
    pub question: String,
}

impl AskRafiqEmailEntry {
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), FieldValue::from(self.email));
        fields.insert("question".to_string(), FieldValue::from(self.question));
        fields.insert("createdAt".to_string(), FieldValue::ServerTimestamp);
        fields
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
