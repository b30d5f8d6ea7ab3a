use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{audit, handlers, middleware, staff, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Tickets
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/{id}", get(tickets::get_ticket))
        .route("/tickets/{id}", delete(tickets::delete_ticket))
        .route("/tickets/{id}/assign", post(tickets::assign_ticket))
        .route("/tickets/{id}/status", post(tickets::update_status))
        .route("/tickets/{id}/followups", get(tickets::list_followups))
        .route("/tickets/{id}/logs", get(audit::ticket_logs))
        // Audit log
        .route("/audit", get(audit::query_logs))
        // Staff
        .route("/staff", post(staff::create_staff))
        .route("/staff", get(staff::list_available))
        .route("/staff/{id}", get(staff::get_staff))
        .route("/staff/{id}/release", post(staff::release_staff))
        // Statistics
        .route("/organizations/{id}/stats", get(tickets::organization_stats))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
