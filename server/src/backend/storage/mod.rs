//! # Storage Module
//!
//! Handles all data persistence for the giving backend.
//!
//! Domain services only see the [`DocumentStore`] trait: a path-addressed
//! document store that appends documents, answers ordered/limited queries
//! and assigns server timestamps. The concrete backend is chosen at startup
//! and injected into the services.
//!
//! ## Backends
//!
//! - **memory**: in-process maps, used by tests and throwaway runs
//! - **json_file**: append-only JSON-lines files under a data directory
//!
//! Both backends enforce the same [`AccessRules`].

pub mod error;
pub mod json_file;
pub mod memory;
pub mod rules;
pub mod timestamps;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use rules::{AccessRules, Operation, ASK_RAFIQ_COLLECTION, USERS_COLLECTION, WAITLIST_COLLECTION};
pub use traits::{
    AuthContext, CollectionPath, Direction, Document, DocumentHandle, DocumentStore, FieldValue,
    Fields, Query, QuerySnapshot,
};
