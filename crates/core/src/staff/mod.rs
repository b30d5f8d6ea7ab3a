//! Staff domain: members, skills and the availability/occupancy contract.

mod store;
mod types;

pub use store::{StaffError, StaffStore};
pub use types::{SkillLevel, Staff, StaffSkill};
