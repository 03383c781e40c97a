//! # REST API Interface Layer
//!
//! Axum handlers for the giving backend, grouped by resource. Handlers hold
//! no business logic: they check the session, call a service and map the
//! result.

pub mod calendar_apis;
pub mod error;
pub mod giving_apis;
pub mod mappers;
pub mod waitlist_apis;

pub use calendar_apis::*;
pub use error::*;
pub use giving_apis::*;
pub use waitlist_apis::*;
