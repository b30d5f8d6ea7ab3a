//! Follow-up task generation for incomplete tickets.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::{FollowUpTask, TaskPriority, TaskStatus};

/// Derive a follow-up task from a ticket's completion status.
///
/// The missing-field list is the set of required fields recorded as
/// unfilled. Priority is high when the emergency level itself is missing,
/// medium otherwise. The task starts pending and is due one day after
/// creation. Exactly one task is generated per incomplete ticket; a later
/// incompleteness event needs a new task.
pub fn generate_followup(
    ticket_id: &str,
    completion_status: &BTreeMap<String, bool>,
    now: DateTime<Utc>,
) -> FollowUpTask {
    let missing_fields: Vec<String> = completion_status
        .iter()
        .filter(|(_, complete)| !**complete)
        .map(|(field, _)| field.clone())
        .collect();

    let priority = if missing_fields.iter().any(|f| f == "emergency_level") {
        TaskPriority::High
    } else {
        TaskPriority::Medium
    };

    FollowUpTask {
        id: uuid::Uuid::new_v4().to_string(),
        ticket_id: ticket_id.to_string(),
        missing_fields,
        priority,
        due_date: now + Duration::days(1),
        status: TaskStatus::Pending,
        created_at: now,
    }
}
