//! In-process document store.
//!
//! Keeps every collection in a map guarded by a mutex. Used by the test
//! suites and by the app when `storage.backend = memory`. The availability
//! switch lets callers simulate a backend outage.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::storage::error::{StoreError, StoreResult};
use crate::backend::storage::rules::{AccessRules, Operation};
use crate::backend::storage::timestamps::{resolve_fields, ServerClock};
use crate::backend::storage::traits::{
    AuthContext, CollectionPath, Document, DocumentHandle, DocumentStore, Fields, Query,
    QuerySnapshot,
};

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<Mutex<HashMap<CollectionPath, Vec<Document>>>>,
    clock: Arc<ServerClock>,
    rules: AccessRules,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a simulated outage; while unavailable every call fails
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Every document in a collection, bypassing access rules
    pub async fn documents(&self, collection: &CollectionPath) -> Vec<Document> {
        let collections = self.collections.lock().await;
        collections.get(collection).cloned().unwrap_or_default()
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::BackendUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add_document(
        &self,
        auth: &AuthContext,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentHandle> {
        self.ensure_available()?;
        self.rules.check(auth, collection, Operation::Create)?;

        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().await;
        // Timestamp taken under the lock so insertion order matches time order
        let fields = resolve_fields(fields, self.clock.next());
        collections
            .entry(collection.clone())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });

        debug!("Stored document {} in {}", id, collection);
        Ok(DocumentHandle {
            path: collection.document_path(&id),
            id,
        })
    }

    async fn run_query(&self, auth: &AuthContext, query: &Query) -> StoreResult<QuerySnapshot> {
        self.ensure_available()?;
        self.rules.check(auth, &query.collection, Operation::Read)?;

        let documents = self.documents(&query.collection).await;
        Ok(QuerySnapshot::new(query.apply(documents)))
    }
}
