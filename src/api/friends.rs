use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{require_user, AppState};
use crate::db::{FriendshipStatus, UserRow};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

impl From<UserRow> for FriendDto {
    fn from(user: UserRow) -> Self {
        FriendDto {
            id: user.id.0,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsResponse {
    pub friends: Vec<FriendDto>,
}

pub async fn list_friends(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<FriendsResponse>, AppError> {
    let user = require_user(&headers)?;

    let friends = state
        .repo
        .accepted_friends_of(&user)
        .await?
        .into_iter()
        .map(FriendDto::from)
        .collect();

    Ok(Json(FriendsResponse { friends }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestDto {
    pub id: String,
    pub from: FriendDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsResponse {
    pub requests: Vec<FriendRequestDto>,
}

pub async fn list_requests(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<FriendRequestsResponse>, AppError> {
    let user = require_user(&headers)?;

    let requests = state
        .repo
        .pending_requests_for(&user)
        .await?
        .into_iter()
        .map(|r| FriendRequestDto {
            id: r.id,
            from: FriendDto::from(r.from),
        })
        .collect();

    Ok(Json(FriendRequestsResponse { requests }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFriendRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendActionResponse {
    pub message: String,
}

fn action_response(message: &str) -> Json<FriendActionResponse> {
    Json(FriendActionResponse {
        message: message.to_string(),
    })
}

pub async fn add_friend(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<AddFriendRequest>,
) -> Result<Json<FriendActionResponse>, AppError> {
    let user = require_user(&headers)?;

    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }

    let target = state
        .repo
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("no user with that email".to_string()))?;

    if target.id == user {
        return Err(AppError::BadRequest(
            "you cannot add yourself as a friend".to_string(),
        ));
    }

    if let Some(existing) = state.repo.find_friendship_between(&user, &target.id).await? {
        return match existing.status {
            FriendshipStatus::Accepted => Ok(action_response("already friends")),
            // A pending request from the other side counts as mutual intent;
            // accept it instead of creating a mirror edge.
            FriendshipStatus::Pending if existing.friend_id == user => {
                state
                    .repo
                    .set_friendship_status(&existing.id, FriendshipStatus::Accepted)
                    .await?;
                Ok(action_response("request accepted"))
            }
            FriendshipStatus::Pending => Ok(action_response("request pending")),
        };
    }

    let id = uuid::Uuid::new_v4().to_string();
    state.repo.insert_friendship(&id, &user, &target.id).await?;

    tracing::info!(from = %user, to = %target.id, "friend request sent");

    Ok(action_response("request sent"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub request_id: String,
    pub accept: bool,
}

pub async fn respond(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<RespondRequest>,
) -> Result<Json<FriendActionResponse>, AppError> {
    let user = require_user(&headers)?;

    let request = state
        .repo
        .get_friendship(&body.request_id)
        .await?
        .filter(|r| r.friend_id == user)
        .ok_or_else(|| AppError::NotFound("request not found".to_string()))?;

    if request.status != FriendshipStatus::Pending {
        return Ok(action_response("already handled"));
    }

    if body.accept {
        state
            .repo
            .set_friendship_status(&request.id, FriendshipStatus::Accepted)
            .await?;
        Ok(action_response("request accepted"))
    } else {
        state.repo.delete_friendship(&request.id).await?;
        Ok(action_response("request declined"))
    }
}
