use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::sessions::SessionDto;
use crate::api::{require_user, AppState};
use crate::domain::{SessionFilter, UserId};
use crate::engine::{chart_rows, summarize, ChartRow, SettledSession, Summary};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Restrict to sessions this user participated in.
    pub participant: Option<String>,
    /// Restrict to machine names containing this substring (case-insensitive).
    pub machine: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: Summary,
    pub chart: Vec<ChartRow>,
    /// Filtered timeline, newest first, with derived totals.
    pub sessions: Vec<SessionDto>,
    /// Distinct machine names across ALL of the caller's sessions, sorted.
    /// Filter-independent so the filter UI can offer every option.
    pub machines: Vec<String>,
}

pub async fn get_dashboard(
    headers: HeaderMap,
    Query(params): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = require_user(&headers)?;

    let filter = SessionFilter {
        participant: params
            .participant
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(UserId::new),
        machine_name: params.machine,
    };

    let records = state.supplier.sessions_for_user(&user).await?;

    let mut machines: Vec<String> = records.iter().map(|r| r.machine_name.clone()).collect();
    machines.sort();
    machines.dedup();

    let selected: Vec<SettledSession> = records
        .into_iter()
        .filter(|r| filter.matches(r))
        .map(SettledSession::new)
        .collect();

    let summary = summarize(&selected);
    let chart = chart_rows(&selected);
    let sessions = selected.into_iter().map(SessionDto::from).collect();

    Ok(Json(DashboardResponse {
        summary,
        chart,
        sessions,
        machines,
    }))
}
