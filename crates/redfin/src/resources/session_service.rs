//! Session service and the sessions it tracks

use redfin_core::{Collection, FieldKind, FieldSpec, Result, ResourceKind};

use super::common::{Status, STATUS_FIELDS};

pub const SESSION_SERVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("service_enabled", &["ServiceEnabled"], FieldKind::Bool),
    FieldSpec::new("session_timeout", &["SessionTimeout"], FieldKind::Integer),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new("sessions_path", &["Sessions", "@odata.id"], FieldKind::String),
];

pub const SESSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("username", &["UserName"], FieldKind::String),
];

redfin_core::resource_kind! {
    /// Never carries the registry mapping: it has no diagnostics to resolve
    pub struct SessionService("SessionService", SESSION_SERVICE_FIELDS);
}

redfin_core::resource_kind! {
    pub struct Session("Session", SESSION_FIELDS);
}

impl SessionService {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn service_enabled(&self) -> Option<bool> {
        self.0.bool("service_enabled")
    }

    /// Idle timeout in seconds
    pub fn session_timeout(&self) -> Option<i64> {
        self.0.int("session_timeout")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    pub fn sessions(&self) -> Result<Collection<Session>> {
        let path = self.0.require_str("sessions_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }
}

impl Session {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn username(&self) -> Option<&str> {
        self.0.str("username")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfin_core::testing::MockConnector;
    use redfin_core::ResourceContext;
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn test_session_service_sessions() {
        let conn = Rc::new(MockConnector::new());
        conn.insert(
            "/redfish/v1/SessionService",
            json!({
                "Id": "SessionService",
                "ServiceEnabled": true,
                "SessionTimeout": 30,
                "Sessions": {"@odata.id": "/redfish/v1/SessionService/Sessions"}
            }),
        );
        conn.insert(
            "/redfish/v1/SessionService/Sessions",
            json!({"Members": [{"@odata.id": "/redfish/v1/SessionService/Sessions/1234"}]}),
        );
        conn.insert(
            "/redfish/v1/SessionService/Sessions/1234",
            json!({"Id": "1234", "UserName": "Administrator"}),
        );

        let service = SessionService::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/SessionService").unwrap();
        assert_eq!(service.service_enabled(), Some(true));
        assert_eq!(service.session_timeout(), Some(30));

        let sessions = service.sessions().unwrap().get_members().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].username(), Some("Administrator"));
    }
}
