//! Staff storage contract.

use thiserror::Error;

use super::Staff;

/// Error type for staff operations.
#[derive(Debug, Error)]
pub enum StaffError {
    #[error("staff not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Trait for staff storage backends.
pub trait StaffStore: Send + Sync {
    /// Persist a new staff member.
    fn create(&self, staff: &Staff) -> Result<(), StaffError>;

    /// Get a staff member by ID.
    fn get(&self, id: &str) -> Result<Option<Staff>, StaffError>;

    /// List active, unoccupied staff in an organization, optionally
    /// restricted to those holding a skill in `skill_category`.
    fn list_available(
        &self,
        organization_id: &str,
        skill_category: Option<&str>,
    ) -> Result<Vec<Staff>, StaffError>;

    /// Clear the occupancy flag. This is the external "ticket completed"
    /// hook; the assignment engine itself never releases staff.
    fn release(&self, id: &str) -> Result<Staff, StaffError>;
}
