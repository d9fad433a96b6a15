use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{require_user, AppState};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserResponse {
    pub id: String,
}

/// Sync the caller's profile from the identity provider. Called by the
/// fronting auth layer on sign-in; idempotent.
pub async fn upsert_me(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<UpsertUserRequest>,
) -> Result<Json<UpsertUserResponse>, AppError> {
    let user = require_user(&headers)?;

    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }

    state
        .repo
        .upsert_user(&user, body.name.as_deref(), &email)
        .await?;

    Ok(Json(UpsertUserResponse { id: user.0 }))
}
