//! # Domain Module
//!
//! Business logic for the giving app, independent of HTTP and of the
//! concrete document store.
//!
//! ## Module Organization
//!
//! - **ramadan_calendar**: countdown, observance-window status and banner content
//! - **countdown**: cancellable one-second ticker owned by a view
//! - **route_guard**: access decisions from the identity provider's state
//! - **giving_service**: create and list a user's giving records
//! - **waitlist_service**: waitlist and "Ask Rafiq" signups
//! - **models**: domain records and their document field layout

pub mod countdown;
pub mod giving_service;
pub mod models;
pub mod ramadan_calendar;
pub mod route_guard;
pub mod waitlist_service;

pub use countdown::*;
pub use giving_service::*;
pub use ramadan_calendar::*;
pub use route_guard::*;
pub use waitlist_service::*;
