//! # Storage Traits
//!
//! Defines the document store abstraction the domain layer writes through.
//! A store organizes schemaless documents into path-addressed collections
//! (`waitlist`, `users/{uid}/givingRecords`) and assigns creation timestamps
//! on its own clock.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::error::{StoreError, StoreResult};

/// Path of a collection: an odd number of non-empty `/`-separated segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn parse(path: &str) -> StoreResult<Self> {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        if trimmed.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(StoreError::InvalidInput(format!(
                "Collection path has empty segments: '{}'",
                path
            )));
        }
        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidInput(format!(
                "'{}' addresses a document, not a collection",
                path
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a path from raw segments, e.g. `["users", uid, "givingRecords"]`
    pub fn from_segments(segments: &[&str]) -> StoreResult<Self> {
        if segments.iter().any(|s| s.contains('/')) {
            return Err(StoreError::InvalidInput(format!(
                "Path segment contains '/': {:?}",
                segments
            )));
        }
        Self::parse(&segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Full path of a document inside this collection
    pub fn document_path(&self, id: &str) -> String {
        format!("{}/{}", self.0, id)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field to write: either a literal value or a placeholder the store fills
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    /// Replaced with the store's own clock at write time
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Value(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Value(Value::String(value))
    }
}

/// Fields of a document being written
pub type Fields = BTreeMap<String, FieldValue>;

/// A stored document as read back from a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Read a required string field
    pub fn str_field(&self, field: &str) -> StoreResult<&str> {
        self.get(field).and_then(Value::as_str).ok_or_else(|| {
            StoreError::InvalidInput(format!("Document {} has no string field '{}'", self.id, field))
        })
    }

    /// Read a required numeric field
    pub fn f64_field(&self, field: &str) -> StoreResult<f64> {
        self.get(field).and_then(Value::as_f64).ok_or_else(|| {
            StoreError::InvalidInput(format!("Document {} has no numeric field '{}'", self.id, field))
        })
    }
}

/// Opaque identifier of a newly created document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A read over a single collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: CollectionPath,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: CollectionPath) -> Self {
        Self {
            collection,
            order_by: None,
            limit: None,
        }
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort and truncate documents already filtered to this collection
    pub fn apply(&self, mut documents: Vec<Document>) -> Vec<Document> {
        if let Some((field, direction)) = &self.order_by {
            // Documents missing the field sort first ascending and last descending;
            // the sort is stable so ties keep insertion order
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            documents.truncate(limit);
        }
        documents
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Finite, consume-once result of a query
#[derive(Debug)]
pub struct QuerySnapshot {
    documents: std::vec::IntoIter<Document>,
}

impl QuerySnapshot {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into_iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for QuerySnapshot {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        self.documents.next()
    }
}

/// Identity of the caller, as already verified by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub uid: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { uid: None }
    }

    pub fn user(uid: &str) -> Self {
        Self {
            uid: Some(uid.to_string()),
        }
    }
}

/// Trait defining the interface for document store operations
///
/// This trait abstracts away the concrete backend so the domain services can
/// run against the in-memory store in tests and the file store in the app.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document to a collection and return its new handle
    async fn add_document(
        &self,
        auth: &AuthContext,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentHandle>;

    /// Run a query and return a snapshot of the matching documents
    async fn run_query(&self, auth: &AuthContext, query: &Query) -> StoreResult<QuerySnapshot>;
}
