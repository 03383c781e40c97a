//! # REST API for Giving Records
//!
//! Endpoints for creating and listing a user's giving records. The caller's
//! identity arrives already verified in the `x-user-id` header; profile
//! completeness in `x-profile-complete`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use log::info;
use shared::{CreateGivingRecordRequest, GivingRecordListRequest, GivingRecordListResponse};

use super::error::ApiError;
use super::mappers::giving_mapper::GivingMapper;
use super::mappers::handle_mapper::HandleMapper;
use crate::backend::domain::route_guard::{evaluate, AuthState, GuardDecision, Requirement};
use crate::backend::storage::{AuthContext, DocumentStore};
use crate::backend::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const PROFILE_COMPLETE_HEADER: &str = "x-profile-complete";

/// Session state as forwarded by the identity provider
pub fn auth_state_from_headers(headers: &HeaderMap) -> AuthState {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    let profile_complete = headers
        .get(PROFILE_COMPLETE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    AuthState {
        user_id,
        loading: false,
        profile_complete,
    }
}

/// Apply the route guard and return the caller's store identity
pub fn require_session(headers: &HeaderMap, requirement: Requirement) -> Result<AuthContext, ApiError> {
    let state = auth_state_from_headers(headers);
    match evaluate(&state, requirement) {
        GuardDecision::Allow => Ok(AuthContext { uid: state.user_id }),
        GuardDecision::RedirectToOnboarding => Err(ApiError::ProfileIncomplete),
        GuardDecision::RedirectToSignIn | GuardDecision::Loading => Err(ApiError::Unauthorized),
    }
}

/// Create a giving record for `uid`
pub async fn create_giving_record<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<CreateGivingRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = require_session(&headers, Requirement::ProfileComplete)?;
    let Json(request) = payload?;
    info!("POST /api/users/{}/giving-records - request: {:?}", uid, request);

    let handle = state
        .giving_service
        .submit_record(&auth, &uid, GivingMapper::to_new_record(request))
        .await?;
    Ok((StatusCode::CREATED, Json(HandleMapper::to_dto(handle))))
}

/// List `uid`'s giving records, newest first
pub async fn list_giving_records<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Path(uid): Path<String>,
    Query(query): Query<GivingRecordListRequest>,
    headers: HeaderMap,
) -> Result<Json<GivingRecordListResponse>, ApiError> {
    info!("GET /api/users/{}/giving-records - query: {:?}", uid, query);
    let auth = require_session(&headers, Requirement::SignedIn)?;

    let limit = query.limit.unwrap_or(state.default_list_limit);
    let records = state.giving_service.list_records(&auth, &uid, limit).await?;
    Ok(Json(GivingRecordListResponse {
        records: GivingMapper::to_dto_list(records),
    }))
}
