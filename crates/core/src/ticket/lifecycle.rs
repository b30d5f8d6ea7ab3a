//! Ticket lifecycle state machine.
//!
//! State machine flow:
//! ```text
//! draft ------> pending -----> assigned -> in_progress -> resolved -> closed
//!   |    ^        |  ^            |             |            |
//!   v    |        v  |            v             v            |
//! incomplete <-> needs_info <-----+-------------+     (reopen to in_progress)
//! ```
//!
//! Every status write in storage is gated through [`can_transition`]; there
//! is no path that forces a status outside this table.

use super::TicketStatus;

/// Statuses legally reachable from `current` in a single transition.
///
/// `closed` has no outgoing edges and is terminal.
pub fn transitions_from(current: TicketStatus) -> &'static [TicketStatus] {
    match current {
        TicketStatus::Draft => &[TicketStatus::Pending, TicketStatus::Incomplete],
        TicketStatus::Incomplete => &[TicketStatus::Pending, TicketStatus::NeedsInfo],
        TicketStatus::Pending => &[TicketStatus::Assigned, TicketStatus::NeedsInfo],
        TicketStatus::Assigned => &[TicketStatus::InProgress, TicketStatus::NeedsInfo],
        TicketStatus::InProgress => &[TicketStatus::Resolved, TicketStatus::NeedsInfo],
        TicketStatus::NeedsInfo => &[TicketStatus::Pending, TicketStatus::Incomplete],
        TicketStatus::Resolved => &[TicketStatus::Closed, TicketStatus::InProgress],
        TicketStatus::Closed => &[],
    }
}

/// Returns true if moving from `current` to `requested` is legal.
pub fn can_transition(current: TicketStatus, requested: TicketStatus) -> bool {
    transitions_from(current).contains(&requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_is_terminal() {
        for requested in [
            TicketStatus::Draft,
            TicketStatus::Incomplete,
            TicketStatus::Pending,
            TicketStatus::NeedsInfo,
            TicketStatus::Assigned,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert!(!can_transition(TicketStatus::Closed, requested));
        }
    }

    #[test]
    fn test_pending_transitions() {
        assert!(can_transition(TicketStatus::Pending, TicketStatus::Assigned));
        assert!(can_transition(TicketStatus::Pending, TicketStatus::NeedsInfo));
        assert!(!can_transition(TicketStatus::Pending, TicketStatus::Closed));
        assert!(!can_transition(TicketStatus::Pending, TicketStatus::Resolved));
        assert!(!can_transition(TicketStatus::Pending, TicketStatus::InProgress));
    }

    #[test]
    fn test_draft_transitions() {
        assert!(can_transition(TicketStatus::Draft, TicketStatus::Pending));
        assert!(can_transition(TicketStatus::Draft, TicketStatus::Incomplete));
        assert!(!can_transition(TicketStatus::Draft, TicketStatus::Assigned));
    }

    #[test]
    fn test_incomplete_transitions() {
        assert!(can_transition(TicketStatus::Incomplete, TicketStatus::Pending));
        assert!(can_transition(TicketStatus::Incomplete, TicketStatus::NeedsInfo));
        assert!(!can_transition(TicketStatus::Incomplete, TicketStatus::Assigned));
    }

    #[test]
    fn test_needs_info_recovery_paths() {
        assert!(can_transition(TicketStatus::NeedsInfo, TicketStatus::Pending));
        assert!(can_transition(TicketStatus::NeedsInfo, TicketStatus::Incomplete));
        assert!(!can_transition(TicketStatus::NeedsInfo, TicketStatus::Assigned));
    }

    #[test]
    fn test_assignment_processing_path() {
        assert!(can_transition(TicketStatus::Assigned, TicketStatus::InProgress));
        assert!(can_transition(TicketStatus::InProgress, TicketStatus::Resolved));
        assert!(can_transition(TicketStatus::Resolved, TicketStatus::Closed));
    }

    #[test]
    fn test_resolved_can_reopen() {
        assert!(can_transition(TicketStatus::Resolved, TicketStatus::InProgress));
        assert!(!can_transition(TicketStatus::Resolved, TicketStatus::Pending));
    }

    #[test]
    fn test_no_self_transitions() {
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
            assert!(!can_transition(status, status));
        }
    }

    #[test]
    fn test_transitions_from_matches_can_transition() {
        for status in [
            TicketStatus::Pending,
            TicketStatus::Assigned,
            TicketStatus::Resolved,
        ] {
            for allowed in transitions_from(status) {
                assert!(can_transition(status, *allowed));
            }
        }
    }
}
