//! Waitlist and "Ask Rafiq" signups from the landing page.

use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::models::waitlist::{
    AskRafiqEmailEntry, WaitlistEntry, ASK_RAFIQ_SOURCE,
};
use crate::backend::storage::{
    AuthContext, CollectionPath, DocumentHandle, DocumentStore, StoreResult,
    ASK_RAFIQ_COLLECTION, WAITLIST_COLLECTION,
};

pub struct WaitlistService<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> Clone for WaitlistService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> WaitlistService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add an email to the waitlist
    ///
    /// Every call writes a new entry; repeated signups are not deduplicated.
    pub async fn submit_waitlist_entry(&self, email: &str, source: &str) -> StoreResult<DocumentHandle> {
        let entry = WaitlistEntry::new(email, source);
        let collection = CollectionPath::parse(WAITLIST_COLLECTION)?;
        let handle = self
            .store
            .add_document(&AuthContext::anonymous(), &collection, entry.into_fields())
            .await?;
        info!("Waitlist signup {} from '{}'", handle.id, source);
        Ok(handle)
    }

    /// Store a question, then add the asker to the waitlist
    ///
    /// The two writes are independent. If the waitlist write fails the
    /// question stays stored and the error is returned as is.
    pub async fn submit_ask_rafiq_email(&self, email: &str, question: &str) -> StoreResult<()> {
        let entry = AskRafiqEmailEntry {
            email: email.to_string(),
            question: question.to_string(),
        };
        let collection = CollectionPath::parse(ASK_RAFIQ_COLLECTION)?;
        let question_handle = self
            .store
            .add_document(&AuthContext::anonymous(), &collection, entry.into_fields())
            .await?;
        info!("Stored Ask Rafiq question {}", question_handle.id);

        if let Err(e) = self.submit_waitlist_entry(email, ASK_RAFIQ_SOURCE).await {
            warn!(
                "Question {} stored but waitlist signup failed: {}",
                question_handle.path, e
            );
            return Err(e);
        }
        Ok(())
    }
}
