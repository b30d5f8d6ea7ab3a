//! Core ticket data types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Status
// ============================================================================

/// Lifecycle status of a ticket.
///
/// `Draft` exists only before a ticket is persisted; the creation path
/// always produces `Pending` or `Incomplete`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Draft,
    Incomplete,
    Pending,
    NeedsInfo,
    Assigned,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Returns the status as its wire/storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Draft => "draft",
            TicketStatus::Incomplete => "incomplete",
            TicketStatus::Pending => "pending",
            TicketStatus::NeedsInfo => "needs_info",
            TicketStatus::Assigned => "assigned",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    /// Parse a status from its storage string.
    pub fn parse(s: &str) -> Option<TicketStatus> {
        match s {
            "draft" => Some(TicketStatus::Draft),
            "incomplete" => Some(TicketStatus::Incomplete),
            "pending" => Some(TicketStatus::Pending),
            "needs_info" => Some(TicketStatus::NeedsInfo),
            "assigned" => Some(TicketStatus::Assigned),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Closed)
    }

    /// Returns true if the ticket counts as open for statistics.
    pub fn is_open(&self) -> bool {
        matches!(self, TicketStatus::Pending | TicketStatus::Assigned)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Kind and typed details
// ============================================================================

/// Ticket variant tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    Generic,
    Emergency,
    Maintenance,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Generic => "generic",
            TicketKind::Emergency => "emergency",
            TicketKind::Maintenance => "maintenance",
        }
    }

    /// Resolve a kind from a request tag. Unknown tags fall back to
    /// `Generic`, which carries only the base required-field set.
    pub fn from_tag(tag: &str) -> TicketKind {
        match tag {
            "emergency" => TicketKind::Emergency,
            "maintenance" => TicketKind::Maintenance,
            _ => TicketKind::Generic,
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific ticket fields.
///
/// Base fields shared by every variant (description, category, priority
/// level) live directly on [`Ticket`]; only the type-specific ones are here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketDetails {
    Generic,

    Emergency {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emergency_level: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        safety_measures_taken: Option<bool>,
    },

    Maintenance {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scheduled_maintenance_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maintenance_type: Option<String>,
    },
}

impl TicketDetails {
    pub fn kind(&self) -> TicketKind {
        match self {
            TicketDetails::Generic => TicketKind::Generic,
            TicketDetails::Emergency { .. } => TicketKind::Emergency,
            TicketDetails::Maintenance { .. } => TicketKind::Maintenance,
        }
    }
}

// ============================================================================
// Creation payload
// ============================================================================

/// Raw field payload submitted when creating a ticket.
///
/// Every field is optional at this point; the completeness validator decides
/// whether the ticket is actionable. `extensions` carries client-specific
/// optional attributes that are stored but never required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TicketPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_measures_taken: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_maintenance_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl TicketPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority_level(mut self, level: u8) -> Self {
        self.priority_level = Some(level);
        self
    }

    pub fn with_emergency_level(mut self, level: impl Into<String>) -> Self {
        self.emergency_level = Some(level.into());
        self
    }

    pub fn with_safety_measures_taken(mut self, taken: bool) -> Self {
        self.safety_measures_taken = Some(taken);
        self
    }

    pub fn with_scheduled_maintenance_date(mut self, date: NaiveDate) -> Self {
        self.scheduled_maintenance_date = Some(date);
        self
    }

    pub fn with_maintenance_type(mut self, kind: impl Into<String>) -> Self {
        self.maintenance_type = Some(kind.into());
        self
    }

    /// Build the typed detail variant for the declared kind, carrying over
    /// the variant-specific fields from this payload.
    pub fn details_for(&self, kind: TicketKind) -> TicketDetails {
        match kind {
            TicketKind::Generic => TicketDetails::Generic,
            TicketKind::Emergency => TicketDetails::Emergency {
                emergency_level: self.emergency_level.clone(),
                safety_measures_taken: self.safety_measures_taken,
            },
            TicketKind::Maintenance => TicketDetails::Maintenance {
                scheduled_maintenance_date: self.scheduled_maintenance_date,
                maintenance_type: self.maintenance_type.clone(),
            },
        }
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// A tracked incident/maintenance ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Unique identifier (UUID), assigned at creation, immutable.
    pub id: String,

    /// Owning organization reference.
    pub organization_id: String,

    /// Identity that created the ticket.
    pub created_by: String,

    /// Current lifecycle status. Mutated only through transition-checked
    /// storage operations.
    pub status: TicketStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<u8>,

    /// Variant-specific fields, tagged by kind.
    pub details: TicketDetails,

    /// Required-field completion recorded at creation time. Keys are exactly
    /// the required set for the declared kind; never recomputed afterwards.
    pub required_fields_status: BTreeMap<String, bool>,

    /// Set only by the assignment coordinator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_staff_id: Option<String>,

    /// Estimated response time in minutes, set alongside assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_response_time: Option<u32>,

    /// Client-specific optional attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,

    /// Optional idempotency token supplied by the caller at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_request_id: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Changes on every mutation.
    pub updated_at: DateTime<Utc>,

    /// Soft-delete flag; deleted tickets are excluded from all read paths.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Ticket {
    pub fn kind(&self) -> TicketKind {
        self.details.kind()
    }

    /// Names of required fields recorded as missing at creation time.
    pub fn missing_fields(&self) -> Vec<String> {
        self.required_fields_status
            .iter()
            .filter(|(_, complete)| !**complete)
            .map(|(field, _)| field.clone())
            .collect()
    }
}

// ============================================================================
// Follow-up tasks
// ============================================================================

/// Priority of a follow-up task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
        }
    }

    pub fn parse(s: &str) -> Option<TaskPriority> {
        match s {
            "high" => Some(TaskPriority::High),
            "medium" => Some(TaskPriority::Medium),
            _ => None,
        }
    }
}

/// Status of a follow-up task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Remediation work item generated when a ticket is created without all of
/// its required fields. Created exactly once per incomplete ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUpTask {
    pub id: String,
    pub ticket_id: String,
    /// Required fields recorded as missing, in field-name order.
    pub missing_fields: Vec<String>,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Derived per-organization ticket statistics, recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketStats {
    pub total_tickets: i64,
    /// Tickets with status pending or assigned.
    pub open_tickets: i64,
    /// `(total - open) / total`, or 0 when there are no tickets.
    pub resolution_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TicketStatus::Draft,
            TicketStatus::Incomplete,
            TicketStatus::Pending,
            TicketStatus::NeedsInfo,
            TicketStatus::Assigned,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TicketStatus::parse("open"), None);
    }

    #[test]
    fn test_status_serialization_uses_snake_case() {
        let json = serde_json::to_string(&TicketStatus::NeedsInfo).unwrap();
        assert_eq!(json, r#""needs_info""#);

        let parsed: TicketStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(parsed, TicketStatus::InProgress);
    }

    #[test]
    fn test_only_closed_is_terminal() {
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Resolved.is_terminal());
        assert!(!TicketStatus::Pending.is_terminal());
    }

    #[test]
    fn test_open_statuses() {
        assert!(TicketStatus::Pending.is_open());
        assert!(TicketStatus::Assigned.is_open());
        assert!(!TicketStatus::InProgress.is_open());
        assert!(!TicketStatus::Resolved.is_open());
        assert!(!TicketStatus::Incomplete.is_open());
    }

    #[test]
    fn test_kind_from_tag_unknown_is_generic() {
        assert_eq!(TicketKind::from_tag("emergency"), TicketKind::Emergency);
        assert_eq!(TicketKind::from_tag("maintenance"), TicketKind::Maintenance);
        assert_eq!(TicketKind::from_tag("generic"), TicketKind::Generic);
        assert_eq!(TicketKind::from_tag("plumbing"), TicketKind::Generic);
        assert_eq!(TicketKind::from_tag(""), TicketKind::Generic);
    }

    #[test]
    fn test_details_tagged_serialization() {
        let details = TicketDetails::Emergency {
            emergency_level: Some("critical".to_string()),
            safety_measures_taken: Some(true),
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains(r#""type":"emergency""#));
        assert!(json.contains(r#""emergency_level":"critical""#));

        let parsed: TicketDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, details);
        assert_eq!(parsed.kind(), TicketKind::Emergency);
    }

    #[test]
    fn test_details_generic_serialization() {
        let json = serde_json::to_string(&TicketDetails::Generic).unwrap();
        assert_eq!(json, r#"{"type":"generic"}"#);
    }

    #[test]
    fn test_details_omits_absent_fields() {
        let details = TicketDetails::Maintenance {
            scheduled_maintenance_date: None,
            maintenance_type: None,
        };
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"type":"maintenance"}"#);
    }

    #[test]
    fn test_payload_details_for_emergency() {
        let payload = TicketPayload::new()
            .with_description("water leak")
            .with_emergency_level("high")
            .with_safety_measures_taken(true);

        let details = payload.details_for(TicketKind::Emergency);
        assert_eq!(
            details,
            TicketDetails::Emergency {
                emergency_level: Some("high".to_string()),
                safety_measures_taken: Some(true),
            }
        );
    }

    #[test]
    fn test_payload_details_for_generic_drops_variant_fields() {
        let payload = TicketPayload::new().with_emergency_level("high");
        assert_eq!(payload.details_for(TicketKind::Generic), TicketDetails::Generic);
    }

    #[test]
    fn test_missing_fields() {
        let mut required = BTreeMap::new();
        required.insert("description".to_string(), true);
        required.insert("emergency_level".to_string(), false);
        required.insert("safety_measures_taken".to_string(), false);

        let ticket = Ticket {
            id: "t-1".to_string(),
            organization_id: "org-1".to_string(),
            created_by: "user-1".to_string(),
            status: TicketStatus::Incomplete,
            description: Some("broken pipe".to_string()),
            category: None,
            priority_level: None,
            details: TicketDetails::Generic,
            required_fields_status: required,
            assigned_staff_id: None,
            estimated_response_time: None,
            extensions: BTreeMap::new(),
            client_request_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
        };

        assert_eq!(
            ticket.missing_fields(),
            vec!["emergency_level".to_string(), "safety_measures_taken".to_string()]
        );
    }

    #[test]
    fn test_task_priority_strings() {
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_payload_serialization_skips_empty() {
        let payload = TicketPayload::new().with_description("x");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"description":"x"}"#);
    }
}
