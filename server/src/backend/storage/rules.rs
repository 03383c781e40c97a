//! Access rules enforced by every document store backend.
//!
//! Owner-scoped data lives under `users/{uid}/...` and is only reachable by
//! that user. The landing-page collections accept anonymous creates and are
//! never readable from the client side.

use super::error::{StoreError, StoreResult};
use super::traits::{AuthContext, CollectionPath};

pub const USERS_COLLECTION: &str = "users";
pub const WAITLIST_COLLECTION: &str = "waitlist";
pub const ASK_RAFIQ_COLLECTION: &str = "askRafiqEmails";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessRules;

impl AccessRules {
    pub fn check(
        &self,
        auth: &AuthContext,
        collection: &CollectionPath,
        operation: Operation,
    ) -> StoreResult<()> {
        let segments: Vec<&str> = collection.segments().collect();
        let allowed = match segments.as_slice() {
            [USERS_COLLECTION, owner, ..] => auth.uid.as_deref() == Some(*owner),
            [WAITLIST_COLLECTION] | [ASK_RAFIQ_COLLECTION] => operation == Operation::Create,
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied(format!(
                "{:?} on '{}' is not allowed for {}",
                operation,
                collection,
                auth.uid.as_deref().unwrap_or("anonymous caller")
            )))
        }
    }
}
