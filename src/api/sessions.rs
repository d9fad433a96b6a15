use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{require_user, AppState};
use crate::domain::{dedupe_participants, ParticipantEntry, SessionId, SessionRecord, UserId};
use crate::engine::SettledSession;
use crate::error::AppError;

const MAX_NOTE_LEN: usize = 500;

/// One session on the wire, with its derived totals flattened in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub date: DateTime<Utc>,
    pub machine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_by: String,
    pub participants: Vec<ParticipantEntry>,
    pub total_invest: i64,
    pub total_payout: i64,
    pub net: i64,
    pub per_head: i64,
}

impl From<SettledSession> for SessionDto {
    fn from(settled: SettledSession) -> Self {
        let SettledSession { record, totals } = settled;
        SessionDto {
            id: record.id.0,
            date: record.date,
            machine_name: record.machine_name,
            location: record.location,
            note: record.note,
            created_by: record.created_by.0,
            participants: record.participants,
            total_invest: totals.total_invest,
            total_payout: totals.total_payout,
            net: totals.net,
            per_head: totals.per_head,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    pub sessions: Vec<SessionDto>,
}

pub async fn list_sessions(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<SessionsResponse>, AppError> {
    let user = require_user(&headers)?;

    let records = state.supplier.sessions_for_user(&user).await?;
    let sessions = records
        .into_iter()
        .map(|r| SessionDto::from(SettledSession::new(r)))
        .collect();

    Ok(Json(SessionsResponse { sessions }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    pub user_id: String,
    pub invested: i64,
    pub payout: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub date: String,
    pub machine_name: String,
    pub location: Option<String>,
    pub note: Option<String>,
    pub participants: Vec<ParticipantInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub id: String,
}

pub async fn create_session(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let user = require_user(&headers)?;

    let date = DateTime::parse_from_rfc3339(&body.date)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest("date must be a valid RFC 3339 timestamp".to_string()))?;

    let machine_name = body.machine_name.trim().to_string();
    if machine_name.is_empty() {
        return Err(AppError::BadRequest("machine name is required".to_string()));
    }

    if let Some(note) = &body.note {
        if note.chars().count() > MAX_NOTE_LEN {
            return Err(AppError::BadRequest(format!(
                "note must be at most {} characters",
                MAX_NOTE_LEN
            )));
        }
    }

    for p in &body.participants {
        if p.invested < 0 || p.payout < 0 {
            return Err(AppError::BadRequest(format!(
                "invested and payout must be non-negative for participant {}",
                p.user_id
            )));
        }
    }

    let participants = dedupe_participants(
        body.participants
            .into_iter()
            .map(|p| ParticipantEntry::new(UserId::new(p.user_id), p.invested, p.payout))
            .collect(),
    );

    if participants.is_empty() {
        return Err(AppError::BadRequest(
            "at least one participant is required".to_string(),
        ));
    }

    if !participants.iter().any(|p| p.user_id == user) {
        return Err(AppError::BadRequest(
            "include yourself in the participants".to_string(),
        ));
    }

    let participant_ids: Vec<UserId> = participants.iter().map(|p| p.user_id.clone()).collect();
    let missing = state.repo.missing_users(&participant_ids).await?;
    if let Some(unknown) = missing.first() {
        return Err(AppError::BadRequest(format!(
            "unknown participant: {}",
            unknown
        )));
    }

    let record = SessionRecord::new(
        SessionId::generate(),
        date,
        machine_name,
        body.location.filter(|s| !s.trim().is_empty()),
        body.note.filter(|s| !s.trim().is_empty()),
        user,
        participants,
    );

    state.repo.insert_session(&record).await?;

    tracing::info!(session_id = %record.id, "session registered");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { id: record.id.0 }),
    ))
}
