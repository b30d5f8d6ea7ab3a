//! Staff API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use dispatch_core::{Staff, StaffError, StaffSkill};

use super::tickets::ErrorResponse;
use crate::state::AppState;

/// Request body for creating a staff member
#[derive(Debug, Deserialize)]
pub struct CreateStaffBody {
    pub organization_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<StaffSkill>,
}

/// Query parameters for listing available staff
#[derive(Debug, Deserialize)]
pub struct ListStaffParams {
    pub organization_id: String,
    /// Restrict to members holding a skill in this category
    pub skill: Option<String>,
}

fn staff_error_response(err: StaffError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        StaffError::NotFound(_) => StatusCode::NOT_FOUND,
        StaffError::Constraint(_) => StatusCode::BAD_REQUEST,
        StaffError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StaffError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Create a staff member
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateStaffBody>,
) -> Result<(StatusCode, Json<Staff>), (StatusCode, Json<ErrorResponse>)> {
    let staff = Staff {
        id: uuid::Uuid::new_v4().to_string(),
        organization_id: body.organization_id,
        name: body.name,
        email: body.email,
        is_on_job: false,
        is_active: true,
        skills: body.skills,
        created_at: state.clock().now(),
    };

    state
        .staff_store()
        .create(&staff)
        .map_err(staff_error_response)?;

    Ok((StatusCode::CREATED, Json(staff)))
}

/// Get a staff member by ID
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Staff>, (StatusCode, Json<ErrorResponse>)> {
    match state.staff_store().get(&id) {
        Ok(Some(staff)) => Ok(Json(staff)),
        Ok(None) => Err(staff_error_response(StaffError::NotFound(id))),
        Err(e) => Err(staff_error_response(e)),
    }
}

/// List available staff for an organization
pub async fn list_available(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListStaffParams>,
) -> Result<Json<Vec<Staff>>, (StatusCode, Json<ErrorResponse>)> {
    let staff = state
        .staff_store()
        .list_available(&params.organization_id, params.skill.as_deref())
        .map_err(staff_error_response)?;

    Ok(Json(staff))
}

/// Clear a staff member's occupancy flag.
///
/// The external "ticket completed" hook; the assignment engine never
/// releases staff on its own.
pub async fn release_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Staff>, (StatusCode, Json<ErrorResponse>)> {
    let staff = state
        .staff_store()
        .release(&id)
        .map_err(staff_error_response)?;

    Ok(Json(staff))
}
