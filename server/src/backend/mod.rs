//! # Backend Module
//!
//! Contains all non-UI logic for the Rafiq giving app.
//!
//! ## Architecture
//!
//! ```text
//! Web frontend
//!     ↓
//! IO Layer (REST handlers, mappers)
//!     ↓
//! Domain Layer (calendar, countdown, route guard, services)
//!     ↓
//! Storage Layer (document store: memory or JSON-lines files)
//! ```
//!
//! The document store is constructed once at startup and handed to the
//! services; nothing below this module reaches for a global client.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::backend::config::{AppConfig, StorageBackend};
use crate::backend::domain::{GivingService, RamadanCalendar, WaitlistService};
use crate::backend::io::rest::{PROFILE_COMPLETE_HEADER, USER_ID_HEADER};
use crate::backend::storage::{DocumentStore, JsonFileDocumentStore, MemoryDocumentStore};

/// Main application state that holds all services
pub struct AppState<S: DocumentStore> {
    pub giving_service: GivingService<S>,
    pub waitlist_service: WaitlistService<S>,
    pub calendar: RamadanCalendar,
    pub default_list_limit: usize,
}

impl<S: DocumentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            giving_service: self.giving_service.clone(),
            waitlist_service: self.waitlist_service.clone(),
            calendar: self.calendar.clone(),
            default_list_limit: self.default_list_limit,
        }
    }
}

impl<S: DocumentStore> AppState<S> {
    /// Wire the services around an already constructed store
    pub fn new(store: Arc<S>, config: &AppConfig) -> Result<Self> {
        let calendar = config
            .calendar
            .to_calendar()
            .context("Invalid calendar configuration")?;

        Ok(Self {
            giving_service: GivingService::new(store.clone()),
            waitlist_service: WaitlistService::new(store),
            calendar,
            default_list_limit: config.records.default_list_limit,
        })
    }
}

/// Create the Axum router with all routes configured
pub fn create_router<S: DocumentStore + 'static>(
    app_state: AppState<S>,
    allowed_origin: &str,
) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", allowed_origin))?;

    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(PROFILE_COMPLETE_HEADER),
        ]);

    let api_routes = Router::new()
        .route("/countdown", get(io::get_countdown::<S>))
        .route("/ramadan/status", get(io::get_ramadan_status::<S>))
        .route("/ramadan/banner", get(io::get_progress_banner::<S>))
        .route(
            "/users/:uid/giving-records",
            get(io::list_giving_records::<S>).post(io::create_giving_record::<S>),
        )
        .route("/waitlist", post(io::join_waitlist::<S>))
        .route("/ask-rafiq", post(io::ask_rafiq::<S>));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

/// Serve the API until the listener fails or the process is stopped
pub async fn serve<S: DocumentStore + 'static>(store: Arc<S>, config: &AppConfig) -> Result<()> {
    info!("Setting up application state");
    let app_state = AppState::new(store, config)?;
    let app = create_router(app_state, &config.server.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!("Listening on {}", config.server.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Open the configured store and serve the API
pub async fn run(config: AppConfig) -> Result<()> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory document store; data is lost on exit");
            serve(Arc::new(MemoryDocumentStore::new()), &config).await
        }
        StorageBackend::File => {
            let data_dir = config.storage.resolved_data_dir();
            info!("Setting up document store in {}", data_dir.display());
            let store = JsonFileDocumentStore::open(&data_dir)
                .await
                .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
            serve(Arc::new(store), &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{CollectionPath, WAITLIST_COLLECTION};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use shared::{ErrorResponse, GivingRecordListResponse, RecordHandleResponse, TimeRemaining};
    use tower::ServiceExt;

    fn setup() -> (Router, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let state = AppState::new(store.clone(), &AppConfig::default()).unwrap();
        let router = create_router(state, "http://localhost:8080").unwrap();
        (router, store)
    }

    fn post_json(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder
                .header(USER_ID_HEADER, user)
                .header(PROFILE_COMPLETE_HEADER, "true");
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_as(uri: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn gift(amount: f64) -> Value {
        json!({
            "amount": amount,
            "type": "sadaqah",
            "recipient": "Food bank",
            "date": "2026-03-01",
            "notes": "Groceries"
        })
    }

    #[tokio::test]
    async fn test_countdown_endpoint() {
        let (router, _) = setup();
        let response = router.oneshot(get_as("/api/countdown", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let remaining: TimeRemaining = body_json(response).await;
        assert!(remaining.hours < 24);
    }

    #[tokio::test]
    async fn test_status_and_banner_endpoints() {
        let (router, _) = setup();
        let status = router
            .clone()
            .oneshot(get_as("/api/ramadan/status", None))
            .await
            .unwrap();
        assert_eq!(status.status(), StatusCode::OK);
        let status: Value = body_json(status).await;
        assert_eq!(status["totalDays"], 30);

        let banner = router.oneshot(get_as("/api/ramadan/banner", None)).await.unwrap();
        assert_eq!(banner.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_and_list_giving_records() {
        let (router, _) = setup();
        for amount in [5.0, 10.0, 15.0] {
            let response = router
                .clone()
                .oneshot(post_json("/api/users/u1/giving-records", Some("u1"), gift(amount)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            let handle: RecordHandleResponse = body_json(response).await;
            assert!(handle.path.starts_with("users/u1/givingRecords/"));
        }

        let response = router
            .oneshot(get_as("/api/users/u1/giving-records?limit=2", Some("u1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list: GivingRecordListResponse = body_json(response).await;
        let amounts: Vec<f64> = list.records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![15.0, 10.0]);
        assert!(list.records.iter().all(|r| r.user_id == "u1"));
    }

    #[tokio::test]
    async fn test_giving_records_require_session() {
        let (router, _) = setup();
        let response = router
            .clone()
            .oneshot(post_json("/api/users/u1/giving-records", None, gift(1.0)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let incomplete = Request::builder()
            .method("POST")
            .uri("/api/users/u1/giving-records")
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, "u1")
            .body(Body::from(gift(1.0).to_string()))
            .unwrap();
        let response = router.oneshot(incomplete).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_other_users_records_are_forbidden() {
        let (router, _) = setup();
        let response = router
            .oneshot(get_as("/api/users/u1/giving-records", Some("u2")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_outage_maps_to_service_unavailable() {
        let (router, store) = setup();
        store.set_available(false);
        let response = router
            .oneshot(post_json("/api/waitlist", None, json!({"email": "a@b.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_waitlist_defaults_source_and_normalizes_email() {
        let (router, store) = setup();
        let response = router
            .clone()
            .oneshot(post_json("/api/waitlist", None, json!({"email": " Foo@Bar.com "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(post_json(
                "/api/ask-rafiq",
                None,
                json!({"email": "foo@bar.com", "question": "How is fitr calculated?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let entries = store
            .documents(&CollectionPath::parse(WAITLIST_COLLECTION).unwrap())
            .await;
        let summary: Vec<(&str, &str)> = entries
            .iter()
            .map(|d| (d.str_field("email").unwrap(), d.str_field("source").unwrap()))
            .collect();
        assert_eq!(summary, vec![("foo@bar.com", "landing"), ("foo@bar.com", "ask-rafiq")]);
    }

    #[tokio::test]
    async fn test_unknown_giving_type_is_rejected() {
        let (router, _) = setup();
        let body = json!({"amount": 1, "type": "lottery", "recipient": "x", "date": "2026-03-01"});
        let response = router
            .oneshot(post_json("/api/users/u1/giving-records", Some("u1"), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error.starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_malformed_signup_bodies_return_error_json() {
        let (router, store) = setup();
        let missing_email = router
            .clone()
            .oneshot(post_json("/api/waitlist", None, json!({"source": "landing"})))
            .await
            .unwrap();
        assert_eq!(missing_email.status(), StatusCode::BAD_REQUEST);
        let _: ErrorResponse = body_json(missing_email).await;

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/ask-rafiq")
            .header("content-type", "application/json")
            .body(Body::from("{\"email\": "))
            .unwrap();
        let response = router.oneshot(not_json).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let _: ErrorResponse = body_json(response).await;

        let entries = store
            .documents(&CollectionPath::parse(WAITLIST_COLLECTION).unwrap())
            .await;
        assert!(entries.is_empty());
    }

    #[test]
    fn test_invalid_origin_is_an_error() {
        let store = Arc::new(MemoryDocumentStore::new());
        let state = AppState::new(store, &AppConfig::default()).unwrap();
        assert!(create_router(state, "bad\norigin").is_err());
    }
}
