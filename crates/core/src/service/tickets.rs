//! Ticket service.
//!
//! Composes the completeness validator, the lifecycle state machine and the
//! follow-up generator over a [`TicketStore`]. Each operation hands the
//! store one atomic unit; the service itself holds no mutable state.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::ticket::{
    generate_followup, required_fields, validate_completion, FollowUpTask, Ticket, TicketError,
    TicketFilter, TicketKind, TicketPayload, TicketStats, TicketStatus, TicketStore,
};

/// Request to create a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    /// Owning organization reference.
    pub organization_id: String,
    /// Identity creating the ticket (from auth).
    pub created_by: String,
    /// Declared ticket kind.
    pub kind: TicketKind,
    /// Raw field payload.
    pub payload: TicketPayload,
    /// Optional idempotency token. Retrying a creation with the same token
    /// returns the originally created ticket instead of double-inserting.
    pub client_request_id: Option<String>,
}

/// Outcome of a creation: the persisted ticket and, when it was created
/// incomplete, the follow-up task generated alongside it.
#[derive(Debug, Clone)]
pub struct CreatedTicket {
    pub ticket: Ticket,
    pub followup: Option<FollowUpTask>,
}

/// The ticket lifecycle engine.
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create a ticket.
    ///
    /// Resolves the required-field set for the declared kind, records which
    /// fields the payload fills in, and persists the ticket as `pending`
    /// (all required fields present) or `incomplete` (anything missing,
    /// with exactly one follow-up task). The ticket, its `created` log
    /// entry and the optional follow-up commit as one unit.
    pub fn create_ticket(&self, request: CreateTicketRequest) -> Result<CreatedTicket, TicketError> {
        if let Some(ref token) = request.client_request_id {
            if let Some(existing) = self.store.find_by_request_id(token)? {
                debug!(ticket_id = %existing.id, token = %token, "create replay, returning original");
                return Ok(CreatedTicket {
                    ticket: existing,
                    followup: None,
                });
            }
        }

        let required = required_fields(request.kind);
        let completion = validate_completion(&request.payload, &required);
        let complete = completion.values().all(|filled| *filled);
        let status = if complete {
            TicketStatus::Pending
        } else {
            TicketStatus::Incomplete
        };

        let now = self.clock.now();
        let ticket = Ticket {
            id: uuid::Uuid::new_v4().to_string(),
            organization_id: request.organization_id,
            created_by: request.created_by,
            status,
            description: request.payload.description.clone(),
            category: request.payload.category.clone(),
            priority_level: request.payload.priority_level,
            details: request.payload.details_for(request.kind),
            required_fields_status: completion.clone(),
            assigned_staff_id: None,
            estimated_response_time: None,
            extensions: request.payload.extensions.clone(),
            client_request_id: request.client_request_id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        let followup = if complete {
            None
        } else {
            Some(generate_followup(&ticket.id, &completion, now))
        };

        self.store.create(&ticket, followup.as_ref())?;

        info!(
            ticket_id = %ticket.id,
            kind = %ticket.kind(),
            status = %ticket.status,
            followup = followup.is_some(),
            "ticket created"
        );

        Ok(CreatedTicket { ticket, followup })
    }

    /// Bind a ticket to a staff member with an estimated response time in
    /// minutes. Fails with `NotFound`/`StaffNotFound` for missing entities,
    /// `InvalidTransition` when the ticket cannot move to `assigned`, and
    /// `StaffBusy` when the member already holds an assignment.
    pub fn assign_ticket(
        &self,
        ticket_id: &str,
        staff_id: &str,
        eta_minutes: u32,
    ) -> Result<Ticket, TicketError> {
        let ticket = self
            .store
            .assign(ticket_id, staff_id, eta_minutes, self.clock.now())?;
        info!(ticket_id = %ticket_id, staff_id = %staff_id, eta_minutes, "ticket assigned");
        Ok(ticket)
    }

    /// Move a ticket along the lifecycle table.
    pub fn transition(
        &self,
        ticket_id: &str,
        requested: TicketStatus,
        performed_by: Option<&str>,
    ) -> Result<Ticket, TicketError> {
        let ticket =
            self.store
                .update_status(ticket_id, requested, performed_by, self.clock.now())?;
        info!(ticket_id = %ticket_id, status = %requested, "ticket status changed");
        Ok(ticket)
    }

    pub fn get_ticket(&self, ticket_id: &str) -> Result<Option<Ticket>, TicketError> {
        self.store.get(ticket_id)
    }

    pub fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        self.store.list(filter)
    }

    pub fn count_tickets(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        self.store.count(filter)
    }

    /// Soft-delete a ticket, removing it from every read path.
    pub fn delete_ticket(
        &self,
        ticket_id: &str,
        performed_by: Option<&str>,
    ) -> Result<Ticket, TicketError> {
        let ticket = self
            .store
            .soft_delete(ticket_id, performed_by, self.clock.now())?;
        info!(ticket_id = %ticket_id, "ticket deleted");
        Ok(ticket)
    }

    /// Per-organization statistics, recomputed from the store on demand.
    pub fn stats(&self, organization_id: &str) -> Result<TicketStats, TicketError> {
        self.store.stats(organization_id)
    }

    pub fn followups(&self, ticket_id: &str) -> Result<Vec<FollowUpTask>, TicketError> {
        self.store.followups(ticket_id)
    }

    /// The required-field completion a payload would get for a kind,
    /// without persisting anything.
    pub fn preview_completion(
        &self,
        kind: TicketKind,
        payload: &TicketPayload,
    ) -> BTreeMap<String, bool> {
        validate_completion(payload, &required_fields(kind))
    }
}
