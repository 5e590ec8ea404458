//! Field groups shared by several resource kinds

use redfin_core::{Attributes, FieldKind, FieldSpec};

pub const STATUS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("state", &["State"], FieldKind::String),
    FieldSpec::new("health", &["Health"], FieldKind::String),
    FieldSpec::new("health_rollup", &["HealthRollup"], FieldKind::String),
];

/// The `Status` object most resources carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub state: Option<String>,
    pub health: Option<String>,
    pub health_rollup: Option<String>,
}

impl Status {
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            state: attributes.str("state").map(str::to_string),
            health: attributes.str("health").map(str::to_string),
            health_rollup: attributes.str("health_rollup").map(str::to_string),
        }
    }

    /// Status of a resource whose schema declares a `status` composite
    pub fn of(resource: &redfin_core::Resource) -> Option<Self> {
        resource.composite("status").map(Self::from_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfin_core::parse_fields;
    use serde_json::json;

    #[test]
    fn test_status_from_attributes() {
        let attributes = parse_fields(
            STATUS_FIELDS,
            &json!({"State": "Enabled", "Health": "OK"}),
            "/redfish/v1/Systems/1",
        )
        .unwrap();

        let status = Status::from_attributes(&attributes);
        assert_eq!(status.state.as_deref(), Some("Enabled"));
        assert_eq!(status.health.as_deref(), Some("OK"));
        assert_eq!(status.health_rollup, None);
    }
}
