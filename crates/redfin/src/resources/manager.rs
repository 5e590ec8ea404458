//! Management controllers (BMCs)

use redfin_core::{FieldKind, FieldSpec, Result};

use super::common::{Status, STATUS_FIELDS};

pub const MANAGER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("manager_type", &["ManagerType"], FieldKind::String),
    FieldSpec::new("firmware_version", &["FirmwareVersion"], FieldKind::String),
    FieldSpec::new("model", &["Model"], FieldKind::String),
    FieldSpec::new("uuid", &["UUID"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct Manager("Manager", MANAGER_FIELDS);
}

impl Manager {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn manager_type(&self) -> Option<&str> {
        self.0.str("manager_type")
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.0.str("firmware_version")
    }

    pub fn model(&self) -> Option<&str> {
        self.0.str("model")
    }

    pub fn uuid(&self) -> Option<&str> {
        self.0.str("uuid")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfin_core::testing::MockConnector;
    use redfin_core::{ResourceContext, ResourceKind};
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn test_parse_attributes() {
        let conn = Rc::new(MockConnector::new());
        conn.insert(
            "/redfish/v1/Managers/BMC",
            json!({
                "Id": "BMC",
                "Name": "Manager",
                "ManagerType": "BMC",
                "FirmwareVersion": "1.00",
                "Model": "Joo Janta 200",
                "UUID": "58893887-8974-2487-2389-841168418919",
                "Status": {"State": "Enabled", "Health": "OK"}
            }),
        );

        let manager = Manager::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/Managers/BMC").unwrap();
        assert_eq!(manager.identity().unwrap(), "BMC");
        assert_eq!(manager.manager_type(), Some("BMC"));
        assert_eq!(manager.firmware_version(), Some("1.00"));
        assert_eq!(manager.model(), Some("Joo Janta 200"));
        assert_eq!(manager.uuid(), Some("58893887-8974-2487-2389-841168418919"));
        assert_eq!(manager.status().unwrap().health.as_deref(), Some("OK"));
        assert_eq!(manager.description(), None);
    }

    #[test]
    fn test_missing_identity() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Managers/BMC", json!({"Name": "Manager"}));

        let manager = Manager::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/Managers/BMC").unwrap();
        assert_eq!(
            manager.identity().unwrap_err().to_string(),
            "The attribute Id is missing from the resource /redfish/v1/Managers/BMC"
        );
    }
}
