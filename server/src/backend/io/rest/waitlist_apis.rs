//! # REST API for Landing-Page Signups

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::{AskRafiqRequest, WaitlistRequest};

use super::error::ApiError;
use super::mappers::handle_mapper::HandleMapper;
use crate::backend::domain::models::waitlist::DEFAULT_WAITLIST_SOURCE;
use crate::backend::storage::DocumentStore;
use crate::backend::AppState;

/// Join the waitlist
pub async fn join_waitlist<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<WaitlistRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let source = request
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_WAITLIST_SOURCE);
    info!("POST /api/waitlist - source: {}", source);

    let handle = state
        .waitlist_service
        .submit_waitlist_entry(&request.email, source)
        .await?;
    Ok((StatusCode::CREATED, Json(HandleMapper::to_dto(handle))))
}

/// Ask Rafiq a question; also joins the waitlist
pub async fn ask_rafiq<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<AskRafiqRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    info!("POST /api/ask-rafiq");
    let Json(request) = payload?;
    state
        .waitlist_service
        .submit_ask_rafiq_email(&request.email, &request.question)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
