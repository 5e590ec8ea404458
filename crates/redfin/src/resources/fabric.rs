//! Fabrics interconnecting endpoints

use redfin_core::{FieldKind, FieldSpec, Result};

use super::common::{Status, STATUS_FIELDS};

pub const FABRIC_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("fabric_type", &["FabricType"], FieldKind::String),
    FieldSpec::new("max_zones", &["MaxZones"], FieldKind::Integer),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct Fabric("Fabric", FABRIC_FIELDS);
}

impl Fabric {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn fabric_type(&self) -> Option<&str> {
        self.0.str("fabric_type")
    }

    pub fn max_zones(&self) -> Option<i64> {
        self.0.int("max_zones")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfin_core::testing::MockConnector;
    use redfin_core::{Error, ResourceContext, ResourceKind};
    use serde_json::json;
    use std::rc::Rc;

    const FABRIC: &str = "/redfish/v1/Fabrics/SAS";

    #[test]
    fn test_parse_attributes() {
        let conn = Rc::new(MockConnector::new());
        conn.insert(
            FABRIC,
            json!({
                "Id": "SAS",
                "Name": "SAS Fabric",
                "Description": "A SAS Fabric with redundant switches.",
                "FabricType": "SAS",
                "MaxZones": 32,
                "Status": {"State": "Enabled", "Health": "OK"}
            }),
        );

        let fabric = Fabric::fetch(ResourceContext::new(conn.clone()), FABRIC).unwrap();
        assert_eq!(fabric.identity().unwrap(), "SAS");
        assert_eq!(fabric.name(), Some("SAS Fabric"));
        assert_eq!(fabric.description(), Some("A SAS Fabric with redundant switches."));
        assert_eq!(fabric.fabric_type(), Some("SAS"));
        assert_eq!(fabric.max_zones(), Some(32));
        assert_eq!(fabric.status().unwrap().state.as_deref(), Some("Enabled"));
    }

    #[test]
    fn test_malformed_max_zones() {
        let conn = Rc::new(MockConnector::new());
        conn.insert(FABRIC, json!({"Id": "SAS", "MaxZones": "many"}));

        let err = Fabric::fetch(ResourceContext::new(conn.clone()), FABRIC).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedAttribute { ref attribute, .. } if attribute == "MaxZones"
        ));
    }
}
