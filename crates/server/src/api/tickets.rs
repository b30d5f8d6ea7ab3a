//! Ticket API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use dispatch_core::{
    CreateTicketRequest, FollowUpTask, Ticket, TicketDetails, TicketError, TicketFilter,
    TicketKind, TicketPayload, TicketStats, TicketStatus,
};

use super::middleware::AuthUser;
use crate::state::AppState;

/// Maximum allowed limit for ticket queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for ticket queries
const DEFAULT_LIMIT: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    /// Ticket kind tag; unknown tags are treated as generic
    pub ticket_type: String,
    /// Owning organization
    pub organization_id: String,
    /// Raw field payload
    pub fields: TicketPayload,
    /// Optional idempotency token
    #[serde(default)]
    pub client_request_id: Option<String>,
}

/// Request body for assigning a ticket
#[derive(Debug, Deserialize)]
pub struct AssignTicketBody {
    pub staff_id: String,
    /// Estimated response time in minutes
    pub estimated_response_time: u32,
}

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: TicketStatus,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    pub status: Option<String>,
    pub ticket_type: Option<String>,
    pub organization_id: Option<String>,
    pub created_by: Option<String>,
    pub assigned_staff_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for ticket operations
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub organization_id: String,
    pub created_by: String,
    pub ticket_type: String,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<u8>,
    pub details: TicketDetails,
    pub required_fields_status: std::collections::BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_staff_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_response_time: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_type: ticket.kind().as_str().to_string(),
            id: ticket.id,
            organization_id: ticket.organization_id,
            created_by: ticket.created_by,
            status: ticket.status,
            description: ticket.description,
            category: ticket.category,
            priority_level: ticket.priority_level,
            details: ticket.details,
            required_fields_status: ticket.required_fields_status,
            assigned_staff_id: ticket.assigned_staff_id,
            estimated_response_time: ticket.estimated_response_time,
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
        }
    }
}

/// Response for ticket creation
#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    pub ticket: TicketResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup: Option<FollowUpTask>,
}

/// Response for listing tickets
#[derive(Debug, Serialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map engine errors onto HTTP status codes at the API boundary.
pub fn error_response(err: TicketError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        TicketError::NotFound(_) | TicketError::StaffNotFound(_) => StatusCode::NOT_FOUND,
        TicketError::InvalidTransition { .. } | TicketError::StaffBusy(_) => StatusCode::CONFLICT,
        TicketError::Constraint(_) => StatusCode::BAD_REQUEST,
        TicketError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        TicketError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, Json<CreateTicketResponse>), (StatusCode, Json<ErrorResponse>)> {
    let request = CreateTicketRequest {
        organization_id: body.organization_id,
        created_by: user_id,
        kind: TicketKind::from_tag(&body.ticket_type),
        payload: body.fields,
        client_request_id: body.client_request_id,
    };

    let created = state.tickets().create_ticket(request).map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTicketResponse {
            ticket: TicketResponse::from(created.ticket),
            followup: created.followup,
        }),
    ))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.tickets().get_ticket(&id) {
        Ok(Some(ticket)) => Ok(Json(TicketResponse::from(ticket))),
        Ok(None) => Err(error_response(TicketError::NotFound(id))),
        Err(e) => Err(error_response(e)),
    }
}

/// List tickets with optional filters
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<ListTicketsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = TicketFilter::new().with_limit(limit).with_offset(offset);

    if let Some(ref status) = params.status {
        let status = TicketStatus::parse(status)
            .ok_or_else(|| bad_request(format!("unknown status: {status}")))?;
        filter = filter.with_status(status);
    }

    if let Some(ref ticket_type) = params.ticket_type {
        filter = filter.with_kind(TicketKind::from_tag(ticket_type));
    }

    if let Some(ref organization_id) = params.organization_id {
        filter = filter.with_organization_id(organization_id);
    }

    if let Some(ref created_by) = params.created_by {
        filter = filter.with_created_by(created_by);
    }

    if let Some(ref staff_id) = params.assigned_staff_id {
        filter = filter.with_assigned_staff_id(staff_id);
    }

    let tickets = state.tickets().list_tickets(&filter).map_err(error_response)?;

    let count_filter = TicketFilter {
        limit: i64::MAX,
        offset: 0,
        ..filter.clone()
    };
    let total = state
        .tickets()
        .count_tickets(&count_filter)
        .map_err(error_response)?;

    Ok(Json(ListTicketsResponse {
        tickets: tickets.into_iter().map(TicketResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Assign a ticket to a staff member
pub async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AssignTicketBody>,
) -> Result<Json<TicketResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ticket = state
        .tickets()
        .assign_ticket(&id, &body.staff_id, body.estimated_response_time)
        .map_err(error_response)?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// Transition a ticket's status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<TicketResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ticket = state
        .tickets()
        .transition(&id, body.status, Some(&user_id))
        .map_err(error_response)?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// Soft-delete a ticket
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TicketResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ticket = state
        .tickets()
        .delete_ticket(&id, Some(&user_id))
        .map_err(error_response)?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// List follow-up tasks for a ticket
pub async fn list_followups(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<FollowUpTask>>, (StatusCode, Json<ErrorResponse>)> {
    // Surface 404 for unknown tickets rather than an empty list.
    if state.tickets().get_ticket(&id).map_err(error_response)?.is_none() {
        return Err(error_response(TicketError::NotFound(id)));
    }

    let tasks = state.tickets().followups(&id).map_err(error_response)?;
    Ok(Json(tasks))
}

/// Per-organization ticket statistics
pub async fn organization_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketStats>, (StatusCode, Json<ErrorResponse>)> {
    let stats = state.tickets().stats(&id).map_err(error_response)?;
    Ok(Json(stats))
}
