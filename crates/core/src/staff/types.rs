//! Staff data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proficiency level for a staff skill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

/// A skill held by a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffSkill {
    /// Skill category, e.g. "plumbing" or "it_support".
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub level: SkillLevel,
}

/// A staff member who can be assigned tickets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    /// Unique identifier (UUID).
    pub id: String,

    /// Owning organization reference.
    pub organization_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Occupancy flag: true while handling an assigned ticket. Set only by
    /// a successful assignment; cleared by an explicit release.
    pub is_on_job: bool,

    /// Inactive staff are never assignable and never listed as available.
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<StaffSkill>,

    pub created_at: DateTime<Utc>,
}

impl Staff {
    /// Returns true if the member holds a skill in the given category.
    pub fn has_skill(&self, category: &str) -> bool {
        self.skills.iter().any(|skill| skill.category == category)
    }

    /// Returns true if the member can take a new assignment.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_on_job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_with_skills(skills: Vec<StaffSkill>) -> Staff {
        Staff {
            id: "s-1".to_string(),
            organization_id: "org-1".to_string(),
            name: "Dana".to_string(),
            email: None,
            is_on_job: false,
            is_active: true,
            skills,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_skill() {
        let staff = staff_with_skills(vec![StaffSkill {
            category: "plumbing".to_string(),
            subcategory: None,
            level: SkillLevel::Expert,
        }]);

        assert!(staff.has_skill("plumbing"));
        assert!(!staff.has_skill("electrical"));
    }

    #[test]
    fn test_availability() {
        let mut staff = staff_with_skills(vec![]);
        assert!(staff.is_available());

        staff.is_on_job = true;
        assert!(!staff.is_available());

        staff.is_on_job = false;
        staff.is_active = false;
        assert!(!staff.is_available());
    }

    #[test]
    fn test_skill_level_serialization() {
        let json = serde_json::to_string(&SkillLevel::Intermediate).unwrap();
        assert_eq!(json, r#""intermediate""#);

        let parsed: SkillLevel = serde_json::from_str(r#""expert""#).unwrap();
        assert_eq!(parsed, SkillLevel::Expert);
    }

    #[test]
    fn test_staff_serialization_round_trip() {
        let staff = staff_with_skills(vec![StaffSkill {
            category: "it_support".to_string(),
            subcategory: Some("networking".to_string()),
            level: SkillLevel::Beginner,
        }]);

        let json = serde_json::to_string(&staff).unwrap();
        let parsed: Staff = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, staff);
    }
}
