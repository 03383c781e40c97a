use chrono::{DateTime, Utc};
use serde_json::json;
use shared::GivingType;

use crate::backend::storage::{Document, FieldValue, Fields, StoreError, StoreResult};

pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_RECIPIENT: &str = "recipient";
pub const FIELD_DATE: &str = "date";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_USER_ID: &str = "userId";
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Fields a user fills in when logging a gift
#[derive(Debug, Clone, PartialEq)]
pub struct NewGivingRecord {
    pub amount: f64,
    pub giving_type: GivingType,
    pub recipient: String,
    pub date: String,
    pub notes: String,
}

impl NewGivingRecord {
    /// Document fields for the owner's collection, stamped by the store
    pub fn into_fields(self, owner_id: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIELD_AMOUNT.to_string(), FieldValue::from(json!(self.amount)));
        fields.insert(FIELD_TYPE.to_string(), FieldValue::from(self.giving_type.as_str()));
        fields.insert(FIELD_RECIPIENT.to_string(), FieldValue::from(self.recipient));
        fields.insert(FIELD_DATE.to_string(), FieldValue::from(self.date));
        fields.insert(FIELD_NOTES.to_string(), FieldValue::from(self.notes));
        fields.insert(FIELD_USER_ID.to_string(), FieldValue::from(owner_id));
        fields.insert(FIELD_CREATED_AT.to_string(), FieldValue::ServerTimestamp);
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainGivingRecord {
    pub id: String,
    pub amount: f64,
    pub giving_type: GivingType,
    pub recipient: String,
    pub date: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl DomainGivingRecord {
    pub fn from_document(document: &Document) -> StoreResult<Self> {
        let giving_type = document
            .str_field(FIELD_TYPE)?
            .parse::<GivingType>()
            .map_err(StoreError::InvalidInput)?;
        let created_at = DateTime::parse_from_rfc3339(document.str_field(FIELD_CREATED_AT)?)
            .map_err(|e| {
                StoreError::InvalidInput(format!("Document {} has a bad createdAt: {}", document.id, e))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: document.id.clone(),
            amount: document.f64_field(FIELD_AMOUNT)?,
            giving_type,
            recipient: document.str_field(FIELD_RECIPIENT)?.to_string(),
            date: document.str_field(FIELD_DATE)?.to_string(),
            // Older records may omit notes entirely
            notes: document
                .get(FIELD_NOTES)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            created_at,
            user_id: document.str_field(FIELD_USER_ID)?.to_string(),
        })
    }
}
