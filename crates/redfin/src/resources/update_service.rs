//! Firmware update service

use redfin_core::{FieldKind, FieldSpec, Result};

use super::common::{Status, STATUS_FIELDS};

pub const UPDATE_SERVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("service_enabled", &["ServiceEnabled"], FieldKind::Bool),
    FieldSpec::new("http_push_uri", &["HttpPushUri"], FieldKind::String),
    FieldSpec::new(
        "firmware_inventory_path",
        &["FirmwareInventory", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new(
        "software_inventory_path",
        &["SoftwareInventory", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct UpdateService("UpdateService", UPDATE_SERVICE_FIELDS);
}

impl UpdateService {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn service_enabled(&self) -> Option<bool> {
        self.0.bool("service_enabled")
    }

    pub fn http_push_uri(&self) -> Option<&str> {
        self.0.str("http_push_uri")
    }

    pub fn firmware_inventory_path(&self) -> Option<&str> {
        self.0.str("firmware_inventory_path")
    }

    pub fn software_inventory_path(&self) -> Option<&str> {
        self.0.str("software_inventory_path")
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
            "/redfish/v1/UpdateService",
            json!({
                "Id": "UpdateService",
                "Name": "Update service",
                "ServiceEnabled": true,
                "HttpPushUri": "/FWUpdate",
                "FirmwareInventory": {"@odata.id": "/redfish/v1/UpdateService/FirmwareInventory"},
                "SoftwareInventory": {"@odata.id": "/redfish/v1/UpdateService/SoftwareInventory"},
                "Status": {"State": "Enabled", "Health": "OK", "HealthRollup": "OK"}
            }),
        );

        let update_service =
            UpdateService::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/UpdateService").unwrap();
        assert_eq!(update_service.identity().unwrap(), "UpdateService");
        assert_eq!(update_service.name(), Some("Update service"));
        assert_eq!(update_service.service_enabled(), Some(true));
        assert_eq!(update_service.http_push_uri(), Some("/FWUpdate"));
        assert_eq!(
            update_service.firmware_inventory_path(),
            Some("/redfish/v1/UpdateService/FirmwareInventory")
        );
        assert_eq!(
            update_service.software_inventory_path(),
            Some("/redfish/v1/UpdateService/SoftwareInventory")
        );
        assert_eq!(update_service.status().unwrap().health_rollup.as_deref(), Some("OK"));
    }

    #[test]
    fn test_optional_inventories() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/UpdateService", json!({"Id": "UpdateService"}));

        let update_service =
            UpdateService::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/UpdateService").unwrap();
        assert_eq!(update_service.service_enabled(), None);
        assert_eq!(update_service.firmware_inventory_path(), None);
        assert!(update_service.status().is_none());
    }
}
