//! Rafiq giving backend.
//!
//! Ramadan countdown and progress calculations, a view-owned countdown
//! ticker, and create/read helpers for giving records and landing-page
//! signups on top of an injected document store.

pub mod backend;

pub use backend::config::AppConfig;
pub use backend::domain::{calendar_window_status, time_remaining, CountdownTicker, RamadanCalendar};
pub use backend::storage::{DocumentStore, StoreError};
