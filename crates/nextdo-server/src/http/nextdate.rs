use axum::extract::{rejection::QueryRejection, Query, State};
use nextdo_core::recurrence::{next_date, parse_date};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NextDateQuery {
    /// Reference date, `YYYYMMDD`. Defaults to today.
    pub now: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub repeat: String,
}

/// GET /api/nextdate?now=..&date=..&repeat=..
///
/// Replies with the bare `YYYYMMDD` text of the next occurrence.
pub async fn next_date_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NextDateQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(query) = query?;
    let now = match query.now.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => state.clock.today(),
    };

    let next = next_date(now, query.date.trim(), &query.repeat)?;
    debug!(%now, date = %query.date, repeat = %query.repeat, %next, "next date computed");
    Ok(next)
}
