//! Ticket storage contract.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{FollowUpTask, Ticket, TicketKind, TicketStats, TicketStatus};

/// Error type for ticket operations, mapping storage failures onto the
/// caller-facing taxonomy.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Referenced ticket does not exist (or is soft-deleted).
    #[error("ticket not found: {0}")]
    NotFound(String),

    /// Referenced staff member does not exist or is inactive.
    #[error("staff not found: {0}")]
    StaffNotFound(String),

    /// Staff member is already occupied with another ticket.
    #[error("staff {0} is already on a job")]
    StaffBusy(String),

    /// Requested status change is not permitted by the lifecycle table.
    #[error("invalid transition for ticket {ticket_id}: {from} -> {to}")]
    InvalidTransition {
        ticket_id: String,
        from: TicketStatus,
        to: TicketStatus,
    },

    /// The store rejected a write due to a uniqueness/foreign-key rule.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Transient store failure (busy, locked, connectivity).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Any other database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Filter for querying tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Filter by owning organization.
    pub organization_id: Option<String>,
    /// Filter by status.
    pub status: Option<TicketStatus>,
    /// Filter by kind.
    pub kind: Option<TicketKind>,
    /// Filter by creator.
    pub created_by: Option<String>,
    /// Filter by assigned staff member.
    pub assigned_staff_id: Option<String>,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl TicketFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
            ..Default::default()
        }
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_kind(mut self, kind: TicketKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn with_assigned_staff_id(mut self, staff_id: impl Into<String>) -> Self {
        self.assigned_staff_id = Some(staff_id.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for ticket storage backends.
///
/// Multi-row operations (`create`, `assign`, `update_status`, `soft_delete`)
/// are atomic: either every effect of the operation is visible, or none is.
/// Soft-deleted tickets are excluded from every read path.
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket, its `created` log entry and, for incomplete
    /// tickets, the follow-up task, as one unit.
    fn create(&self, ticket: &Ticket, followup: Option<&FollowUpTask>) -> Result<(), TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError>;

    /// Look up a ticket by its idempotency token.
    fn find_by_request_id(&self, client_request_id: &str) -> Result<Option<Ticket>, TicketError>;

    /// List tickets matching the filter, newest first.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError>;

    /// Count tickets matching the filter.
    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError>;

    /// Bind a ticket to a staff member: transition-checked status write,
    /// occupancy claim on the staff row and `assigned` log entry, as one
    /// unit. Exactly one of two concurrent claims on the same staff member
    /// succeeds; the loser sees [`TicketError::StaffBusy`].
    fn assign(
        &self,
        id: &str,
        staff_id: &str,
        eta_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError>;

    /// Move a ticket to `requested`, refusing transitions outside the
    /// lifecycle table, and record a `status_changed` log entry.
    fn update_status(
        &self,
        id: &str,
        requested: TicketStatus,
        performed_by: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError>;

    /// Soft-delete a ticket and record a `deleted` log entry.
    fn soft_delete(
        &self,
        id: &str,
        performed_by: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError>;

    /// Derived per-organization statistics.
    fn stats(&self, organization_id: &str) -> Result<TicketStats, TicketError>;

    /// Follow-up tasks belonging to a ticket.
    fn followups(&self, ticket_id: &str) -> Result<Vec<FollowUpTask>, TicketError>;
}
