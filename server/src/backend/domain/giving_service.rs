//! Giving record service.
//!
//! Writes and reads the giving records a user keeps under
//! `users/{uid}/givingRecords`. Store failures pass through untouched.

use log::{error, info};
use std::sync::Arc;

use crate::backend::domain::models::giving_record::{
    DomainGivingRecord, NewGivingRecord, FIELD_CREATED_AT,
};
use crate::backend::storage::{
    AuthContext, CollectionPath, Direction, DocumentHandle, DocumentStore, Query, StoreResult,
    USERS_COLLECTION,
};

pub const GIVING_RECORDS_COLLECTION: &str = "givingRecords";
pub const DEFAULT_LIST_LIMIT: usize = 50;

pub struct GivingService<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> Clone for GivingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> GivingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn records_collection(owner_id: &str) -> StoreResult<CollectionPath> {
        CollectionPath::from_segments(&[USERS_COLLECTION, owner_id, GIVING_RECORDS_COLLECTION])
    }

    /// Append a record for `owner_id`; the store assigns `createdAt`
    pub async fn submit_record(
        &self,
        auth: &AuthContext,
        owner_id: &str,
        record: NewGivingRecord,
    ) -> StoreResult<DocumentHandle> {
        let collection = Self::records_collection(owner_id)?;
        info!(
            "Submitting {} record of {:.2} for user {}",
            record.giving_type, record.amount, owner_id
        );

        let handle = self
            .store
            .add_document(auth, &collection, record.into_fields(owner_id))
            .await
            .map_err(|e| {
                error!("Failed to store giving record for {}: {}", owner_id, e);
                e
            })?;

        info!("Stored giving record {}", handle.path);
        Ok(handle)
    }

    /// Newest-first records for `owner_id`, at most `max_count` of them
    pub async fn list_records(
        &self,
        auth: &AuthContext,
        owner_id: &str,
        max_count: usize,
    ) -> StoreResult<Vec<DomainGivingRecord>> {
        let query = Query::collection(Self::records_collection(owner_id)?)
            .order_by(FIELD_CREATED_AT, Direction::Descending)
            .limit(max_count);

        let snapshot = self.store.run_query(auth, &query).await.map_err(|e| {
            error!("Failed to list giving records for {}: {}", owner_id, e);
            e
        })?;

        let records = snapshot
            .map(|document| DomainGivingRecord::from_document(&document))
            .collect::<StoreResult<Vec<_>>>()?;
        info!("Loaded {} giving records for user {}", records.len(), owner_id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{MemoryDocumentStore, StoreError};
    use shared::GivingType;

    fn service() -> (GivingService<MemoryDocumentStore>, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (GivingService::new(store.clone()), store)
    }

    fn record(amount: f64) -> NewGivingRecord {
        NewGivingRecord {
            amount,
            giving_type: GivingType::Sadaqah,
            recipient: "Orphanage".to_string(),
            date: "2026-02-25".to_string(),
            notes: "Iftar boxes".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_attaches_owner_and_timestamp() {
        let (service, _store) = service();
        let auth = AuthContext::user("u1");
        let handle = service.submit_record(&auth, "u1", record(20.0)).await.unwrap();
        assert!(handle.path.starts_with("users/u1/givingRecords/"));

        let records = service.list_records(&auth, "u1", DEFAULT_LIST_LIMIT).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, handle.id);
        assert_eq!(records[0].user_id, "u1");
        assert_eq!(records[0].notes, "Iftar boxes");
    }

    #[tokio::test]
    async fn test_list_is_capped_and_newest_first() {
        let (service, _store) = service();
        let auth = AuthContext::user("u1");
        for i in 0..8 {
            service.submit_record(&auth, "u1", record(i as f64)).await.unwrap();
        }

        let records = service.list_records(&auth, "u1", 5).await.unwrap();
        assert_eq!(records.len(), 5);
        assert!(records.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(records[0].amount, 7.0);
    }

    #[tokio::test]
    async fn test_records_are_scoped_per_owner() {
        let (service, _store) = service();
        service
            .submit_record(&AuthContext::user("u1"), "u1", record(1.0))
            .await
            .unwrap();
        let other = service
            .list_records(&AuthContext::user("u2"), "u2", DEFAULT_LIST_LIMIT)
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_propagates() {
        let (service, _store) = service();
        let result = service
            .submit_record(&AuthContext::user("u2"), "u1", record(1.0))
            .await;
        assert!(matches!(result, Err(StoreError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_backend_unavailable_propagates_without_retry() {
        let (service, store) = service();
        store.set_available(false);
        let auth = AuthContext::user("u1");
        assert!(matches!(
            service.submit_record(&auth, "u1", record(1.0)).await,
            Err(StoreError::BackendUnavailable(_))
        ));
        assert!(matches!(
            service.list_records(&auth, "u1", 10).await,
            Err(StoreError::BackendUnavailable(_))
        ));

        store.set_available(true);
        assert!(service.list_records(&auth, "u1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_id_with_slash_is_invalid() {
        let (service, _store) = service();
        let result = service
            .submit_record(&AuthContext::user("a/b"), "a/b", record(1.0))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
    }
}
