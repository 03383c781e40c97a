//! # REST API for the Ramadan Calendar
//!
//! Countdown, window status and banner content, computed against the
//! server clock on every request.

use axum::{extract::State, response::Json};
use chrono::Utc;
use log::debug;
use shared::{CalendarWindowStatus, ProgressBanner, TimeRemaining};

use crate::backend::storage::DocumentStore;
use crate::backend::AppState;

/// Time left until the configured countdown target
pub async fn get_countdown<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<TimeRemaining> {
    let remaining = state.calendar.time_remaining(&Utc::now());
    debug!("GET /api/countdown - {:?}", remaining);
    Json(remaining)
}

/// Whether today is inside the observance window
pub async fn get_ramadan_status<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<CalendarWindowStatus> {
    let status = state.calendar.window_status(&Utc::now());
    debug!("GET /api/ramadan/status - {:?}", status);
    Json(status)
}

pub async fn get_progress_banner<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<ProgressBanner> {
    Json(state.calendar.progress_banner(&Utc::now()))
}
