//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services. Translates
//! requests into domain calls, domain results into JSON responses, and store
//! errors into status codes.
//!
//! ## Supported Operations
//!
//! - **GET /api/countdown**: time left until the countdown target
//! - **GET /api/ramadan/status**: observance-window status for today
//! - **GET /api/ramadan/banner**: progress banner content
//! - **GET/POST /api/users/:uid/giving-records**: list and create giving records
//! - **POST /api/waitlist**: waitlist signup
//! - **POST /api/ask-rafiq**: question plus waitlist signup

pub mod rest;

pub use rest::*;
