//! Ticket log query handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use dispatch_core::{AuditError, LogFilter, LogRecord};

use super::tickets::ErrorResponse;
use crate::state::AppState;

/// Maximum allowed limit for log queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for log queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for the audit endpoint
#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    pub ticket_id: Option<String>,
    pub action: Option<String>,
    pub performed_by: Option<String>,
    /// Entries at or after this timestamp (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Entries at or before this timestamp (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for log queries
#[derive(Debug, Serialize)]
pub struct LogQueryResponse {
    pub entries: Vec<LogRecord>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

fn audit_error_response(err: AuditError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn run_query(
    state: &AppState,
    base_filter: LogFilter,
    limit: i64,
    offset: i64,
) -> Result<LogQueryResponse, (StatusCode, Json<ErrorResponse>)> {
    let query_filter = LogFilter {
        limit,
        offset,
        ..base_filter.clone()
    };

    let entries = state
        .log_store()
        .query(&query_filter)
        .map_err(audit_error_response)?;

    let total = state
        .log_store()
        .count(&base_filter)
        .map_err(audit_error_response)?;

    Ok(LogQueryResponse {
        entries,
        total,
        limit,
        offset,
    })
}

/// Query the ticket log with optional filters
pub async fn query_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogQueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = LogFilter::new();

    if let Some(ref ticket_id) = params.ticket_id {
        filter = filter.with_ticket_id(ticket_id);
    }

    if let Some(ref action) = params.action {
        filter = filter.with_action(action);
    }

    if let Some(ref performed_by) = params.performed_by {
        filter = filter.with_performed_by(performed_by);
    }

    if params.from.is_some() || params.to.is_some() {
        filter = filter.with_time_range(params.from, params.to);
    }

    run_query(&state, filter, limit, offset).map(Json)
}

/// All log entries for one ticket
pub async fn ticket_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogQueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let filter = LogFilter::new().with_ticket_id(id);
    run_query(&state, filter, limit, offset).map(Json)
}
