use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ticket::TicketStatus;

/// Lifecycle event payloads recorded in the ticket log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketEvent {
    /// Ticket was created with the given initial status.
    Created {
        ticket_id: String,
        initial_status: TicketStatus,
        /// Required fields recorded as missing at creation, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        missing_fields: Vec<String>,
    },

    /// Ticket was bound to a staff member.
    Assigned {
        ticket_id: String,
        staff_id: String,
        /// Estimated response time in minutes.
        estimated_response_time: u32,
    },

    /// Ticket status moved along the lifecycle table.
    StatusChanged {
        ticket_id: String,
        from: TicketStatus,
        to: TicketStatus,
    },

    /// Ticket was soft-deleted.
    Deleted {
        ticket_id: String,
        previous_status: TicketStatus,
    },
}

impl TicketEvent {
    /// Returns the action name used as the indexed storage column.
    pub fn action(&self) -> &'static str {
        match self {
            TicketEvent::Created { .. } => "created",
            TicketEvent::Assigned { .. } => "assigned",
            TicketEvent::StatusChanged { .. } => "status_changed",
            TicketEvent::Deleted { .. } => "deleted",
        }
    }

    /// The ticket this event belongs to.
    pub fn ticket_id(&self) -> &str {
        match self {
            TicketEvent::Created { ticket_id, .. }
            | TicketEvent::Assigned { ticket_id, .. }
            | TicketEvent::StatusChanged { ticket_id, .. }
            | TicketEvent::Deleted { ticket_id, .. } => ticket_id,
        }
    }

    /// The performer implied by the event itself, if any. Assignment is
    /// performed by the assigned staff member; other performers are passed
    /// through by the caller.
    pub fn performer(&self) -> Option<&str> {
        match self {
            TicketEvent::Assigned { staff_id, .. } => Some(staff_id),
            _ => None,
        }
    }
}

/// A stored ticket log row. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    pub id: i64,
    pub ticket_id: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub data: TicketEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        let created = TicketEvent::Created {
            ticket_id: "t-1".to_string(),
            initial_status: TicketStatus::Pending,
            missing_fields: vec![],
        };
        assert_eq!(created.action(), "created");

        let assigned = TicketEvent::Assigned {
            ticket_id: "t-1".to_string(),
            staff_id: "s-1".to_string(),
            estimated_response_time: 30,
        };
        assert_eq!(assigned.action(), "assigned");

        let changed = TicketEvent::StatusChanged {
            ticket_id: "t-1".to_string(),
            from: TicketStatus::Assigned,
            to: TicketStatus::InProgress,
        };
        assert_eq!(changed.action(), "status_changed");
    }

    #[test]
    fn test_ticket_id_extraction() {
        let event = TicketEvent::Deleted {
            ticket_id: "t-9".to_string(),
            previous_status: TicketStatus::Pending,
        };
        assert_eq!(event.ticket_id(), "t-9");
    }

    #[test]
    fn test_performer_only_for_assignment() {
        let assigned = TicketEvent::Assigned {
            ticket_id: "t-1".to_string(),
            staff_id: "s-7".to_string(),
            estimated_response_time: 45,
        };
        assert_eq!(assigned.performer(), Some("s-7"));

        let created = TicketEvent::Created {
            ticket_id: "t-1".to_string(),
            initial_status: TicketStatus::Incomplete,
            missing_fields: vec!["category".to_string()],
        };
        assert_eq!(created.performer(), None);
    }

    #[test]
    fn test_tagged_serialization() {
        let event = TicketEvent::StatusChanged {
            ticket_id: "t-1".to_string(),
            from: TicketStatus::InProgress,
            to: TicketStatus::Resolved,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"status_changed""#));
        assert!(json.contains(r#""from":"in_progress""#));
        assert!(json.contains(r#""to":"resolved""#));

        let parsed: TicketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_created_skips_empty_missing_fields() {
        let event = TicketEvent::Created {
            ticket_id: "t-1".to_string(),
            initial_status: TicketStatus::Pending,
            missing_fields: vec![],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("missing_fields"));
    }

    #[test]
    fn test_log_record_serialization() {
        let record = LogRecord {
            id: 3,
            ticket_id: "t-1".to_string(),
            action: "created".to_string(),
            performed_by: None,
            timestamp: Utc::now(),
            data: TicketEvent::Created {
                ticket_id: "t-1".to_string(),
                initial_status: TicketStatus::Pending,
                missing_fields: vec![],
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""id":3"#));
        assert!(json.contains(r#""action":"created""#));
        assert!(!json.contains("performed_by"));
    }
}
