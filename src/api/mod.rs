pub mod dashboard;
pub mod friends;
pub mod health;
pub mod sessions;
pub mod users;

use crate::datasource::SessionSupplier;
use crate::db::Repository;
use crate::domain::UserId;
use crate::error::AppError;
use axum::http::HeaderMap;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Header carrying the authenticated caller's id. Authentication itself is
/// external: the fronting identity layer validates the user and injects this
/// header before requests reach us.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub supplier: Arc<dyn SessionSupplier>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, supplier: Arc<dyn SessionSupplier>) -> Self {
        Self { repo, supplier }
    }
}

/// Extract the caller's identity from the request headers.
pub fn require_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");

    if raw.is_empty() {
        return Err(AppError::Unauthorized(format!(
            "missing {} header",
            USER_ID_HEADER
        )));
    }

    Ok(UserId::new(raw))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/users/me", put(users::upsert_me))
        .route("/v1/dashboard", get(dashboard::get_dashboard))
        .route(
            "/v1/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/v1/friends",
            get(friends::list_friends).post(friends::add_friend),
        )
        .route("/v1/friends/requests", get(friends::list_requests))
        .route("/v1/friends/respond", post(friends::respond))
        .layer(cors)
        .with_state(state)
}
