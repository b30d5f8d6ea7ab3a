//! Field completeness validation.
//!
//! Pure functions deciding which fields a ticket kind requires and which of
//! them a payload actually fills in. A field counts as filled when its value
//! is "truthy": present and not empty, zero or false.

use std::collections::BTreeMap;

use super::{TicketKind, TicketPayload};

/// Required fields shared by every ticket kind.
const BASE_FIELDS: [&str; 3] = ["description", "category", "priority_level"];

/// Additional required fields for emergency tickets.
const EMERGENCY_FIELDS: [&str; 2] = ["emergency_level", "safety_measures_taken"];

/// Additional required fields for maintenance tickets.
const MAINTENANCE_FIELDS: [&str; 2] = ["scheduled_maintenance_date", "maintenance_type"];

/// The fixed required-field set for a ticket kind.
pub fn required_fields(kind: TicketKind) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = BASE_FIELDS.to_vec();
    match kind {
        TicketKind::Generic => {}
        TicketKind::Emergency => fields.extend(EMERGENCY_FIELDS),
        TicketKind::Maintenance => fields.extend(MAINTENANCE_FIELDS),
    }
    fields
}

/// For every required field, record whether the payload fills it in.
///
/// Fields outside the required set are never reported.
pub fn validate_completion(
    payload: &TicketPayload,
    required: &[&'static str],
) -> BTreeMap<String, bool> {
    required
        .iter()
        .map(|field| (field.to_string(), field_is_set(payload, field)))
        .collect()
}

fn field_is_set(payload: &TicketPayload, field: &str) -> bool {
    match field {
        "description" => is_nonempty(payload.description.as_deref()),
        "category" => is_nonempty(payload.category.as_deref()),
        "priority_level" => payload.priority_level.is_some_and(|level| level != 0),
        "emergency_level" => is_nonempty(payload.emergency_level.as_deref()),
        "safety_measures_taken" => payload.safety_measures_taken == Some(true),
        "scheduled_maintenance_date" => payload.scheduled_maintenance_date.is_some(),
        "maintenance_type" => is_nonempty(payload.maintenance_type.as_deref()),
        other => payload.extensions.get(other).is_some_and(json_truthy),
    }
}

fn is_nonempty(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

fn json_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_emergency_payload() -> TicketPayload {
        TicketPayload::new()
            .with_description("gas smell in basement")
            .with_category("safety")
            .with_priority_level(5)
            .with_emergency_level("critical")
            .with_safety_measures_taken(true)
    }

    #[test]
    fn test_generic_requires_base_fields() {
        assert_eq!(
            required_fields(TicketKind::Generic),
            vec!["description", "category", "priority_level"]
        );
    }

    #[test]
    fn test_emergency_adds_its_fields() {
        assert_eq!(
            required_fields(TicketKind::Emergency),
            vec![
                "description",
                "category",
                "priority_level",
                "emergency_level",
                "safety_measures_taken",
            ]
        );
    }

    #[test]
    fn test_maintenance_adds_its_fields() {
        assert_eq!(
            required_fields(TicketKind::Maintenance),
            vec![
                "description",
                "category",
                "priority_level",
                "scheduled_maintenance_date",
                "maintenance_type",
            ]
        );
    }

    #[test]
    fn test_required_fields_is_deterministic() {
        assert_eq!(
            required_fields(TicketKind::Emergency),
            required_fields(TicketKind::Emergency)
        );
    }

    #[test]
    fn test_complete_payload_reports_all_true() {
        let payload = complete_emergency_payload();
        let required = required_fields(TicketKind::Emergency);
        let completion = validate_completion(&payload, &required);

        assert_eq!(completion.len(), 5);
        assert!(completion.values().all(|v| *v));
    }

    #[test]
    fn test_missing_field_reports_false() {
        let mut payload = complete_emergency_payload();
        payload.safety_measures_taken = None;

        let required = required_fields(TicketKind::Emergency);
        let completion = validate_completion(&payload, &required);

        assert_eq!(completion.get("safety_measures_taken"), Some(&false));
        assert_eq!(completion.get("description"), Some(&true));
    }

    #[test]
    fn test_empty_string_is_not_set() {
        let payload = TicketPayload::new().with_description("   ");
        let completion = validate_completion(&payload, &required_fields(TicketKind::Generic));
        assert_eq!(completion.get("description"), Some(&false));
    }

    #[test]
    fn test_zero_priority_is_not_set() {
        let payload = TicketPayload::new().with_priority_level(0);
        let completion = validate_completion(&payload, &required_fields(TicketKind::Generic));
        assert_eq!(completion.get("priority_level"), Some(&false));
    }

    #[test]
    fn test_false_safety_measures_is_not_set() {
        let payload = complete_emergency_payload().with_safety_measures_taken(false);
        let completion =
            validate_completion(&payload, &required_fields(TicketKind::Emergency));
        assert_eq!(completion.get("safety_measures_taken"), Some(&false));
    }

    #[test]
    fn test_never_reports_fields_outside_required_set() {
        let payload = complete_emergency_payload();
        let completion = validate_completion(&payload, &required_fields(TicketKind::Generic));

        assert_eq!(completion.len(), 3);
        assert!(!completion.contains_key("emergency_level"));
        assert!(!completion.contains_key("safety_measures_taken"));
    }

    #[test]
    fn test_extension_field_truthiness() {
        let mut payload = TicketPayload::new();
        payload
            .extensions
            .insert("room_number".to_string(), serde_json::json!("B-204"));
        payload
            .extensions
            .insert("floor".to_string(), serde_json::json!(0));

        assert!(field_is_set(&payload, "room_number"));
        assert!(!field_is_set(&payload, "floor"));
        assert!(!field_is_set(&payload, "absent"));
    }
}
