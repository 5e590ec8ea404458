//! Resources: one document snapshot bound to a static field schema

use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

use crate::connector::{Connector, PublicConnector};
use crate::error::{Error, Result};
use crate::field::{parse_fields, parse_fields_lenient, Attributes, FieldSpec, FieldValue};
use crate::registry::LazyRegistries;

/// Where a resource's document comes from, and is re-fetched from on refresh
#[derive(Clone)]
pub enum Source {
    /// The authenticated management channel
    Service(Rc<dyn Connector>),
    /// The public transport used for registry content
    Public(Rc<dyn PublicConnector>),
    /// Built from a document in hand (bundled content); cannot be refreshed
    Detached,
}

impl Source {
    pub fn get(&self, path: &str) -> Result<Value> {
        match self {
            Self::Service(conn) => Ok(conn.get(path)?),
            Self::Public(conn) => Ok(conn.get(path)?),
            Self::Detached => Err(Error::Configuration(format!(
                "resource {path} has no connector to fetch from"
            ))),
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(_) => f.write_str("Service"),
            Self::Public(_) => f.write_str("Public"),
            Self::Detached => f.write_str("Detached"),
        }
    }
}

/// What every resource in one graph shares: its source, the service's
/// protocol version and a handle on the lazily built registry mapping.
#[derive(Debug, Clone)]
pub struct ResourceContext {
    source: Source,
    redfish_version: Option<String>,
    registries: Option<Rc<LazyRegistries>>,
}

impl ResourceContext {
    pub fn new(conn: Rc<dyn Connector>) -> Self {
        Self::from_source(Source::Service(conn))
    }

    pub fn public(conn: Rc<dyn PublicConnector>) -> Self {
        Self::from_source(Source::Public(conn))
    }

    pub fn detached() -> Self {
        Self::from_source(Source::Detached)
    }

    fn from_source(source: Source) -> Self {
        Self {
            source,
            redfish_version: None,
            registries: None,
        }
    }

    pub fn with_redfish_version(mut self, redfish_version: Option<String>) -> Self {
        self.redfish_version = redfish_version;
        self
    }

    pub fn with_registries(mut self, registries: Rc<LazyRegistries>) -> Self {
        self.registries = Some(registries);
        self
    }

    pub fn without_registries(mut self) -> Self {
        self.registries = None;
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The management connector, if this context talks to the service
    pub fn connector(&self) -> Option<&Rc<dyn Connector>> {
        match &self.source {
            Source::Service(conn) => Some(conn),
            _ => None,
        }
    }

    pub fn redfish_version(&self) -> Option<&str> {
        self.redfish_version.as_deref()
    }

    pub fn registries(&self) -> Option<&Rc<LazyRegistries>> {
        self.registries.as_ref()
    }
}

/// A document snapshot and the attributes its schema resolved out of it
#[derive(Debug)]
pub struct Resource {
    path: String,
    schema: &'static [FieldSpec],
    json: Value,
    attributes: Attributes,
    context: ResourceContext,
}

impl Resource {
    /// Fetch the document at `path` and parse it
    pub fn fetch(context: ResourceContext, path: impl Into<String>, schema: &'static [FieldSpec]) -> Result<Self> {
        let path = path.into();
        debug!(path = %path, "Fetching resource");
        let json = context.source.get(&path)?;
        Self::from_json(context, path, schema, json)
    }

    /// Bind an already retrieved document
    pub fn from_json(
        context: ResourceContext,
        path: impl Into<String>,
        schema: &'static [FieldSpec],
        json: Value,
    ) -> Result<Self> {
        let path = path.into();
        let attributes = parse_fields(schema, &json, &path)?;
        Ok(Self {
            path,
            schema,
            json,
            attributes,
            context,
        })
    }

    /// Re-materialize every declared field from the current snapshot
    pub fn parse(&mut self) -> Result<()> {
        self.attributes = parse_fields(self.schema, &self.json, &self.path)?;
        Ok(())
    }

    /// Re-fetch the document and re-parse it.
    ///
    /// Once the new document arrives it replaces the old one outright. A
    /// field of the new document that fails to parse reads as absent and
    /// the first such failure is returned; every other field stays readable.
    pub fn refresh(&mut self) -> Result<()> {
        debug!(path = %self.path, "Refreshing resource");
        let json = self.context.source.get(&self.path)?;
        let (attributes, error) = parse_fields_lenient(self.schema, &json, &self.path);
        self.json = json;
        self.attributes = attributes;
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    /// Replace the context children of this resource inherit
    pub fn set_context(&mut self, context: ResourceContext) {
        self.context = context;
    }

    pub fn redfish_version(&self) -> Option<&str> {
        self.context.redfish_version()
    }

    pub fn registries(&self) -> Option<&Rc<LazyRegistries>> {
        self.context.registries()
    }

    /// Access a field, enforcing its `required` flag
    pub fn get(&self, name: &str) -> Result<&FieldValue> {
        self.attributes.require(name, &self.path)
    }

    /// A string field that must be present, whether declared required or not
    pub fn require_str(&self, name: &str) -> Result<&str> {
        if let Some(value) = self.attributes.str(name) {
            return Ok(value);
        }
        let attribute = self
            .attributes
            .spec(name)
            .or_else(|| self.schema.iter().find(|spec| spec.name == name))
            .map(FieldSpec::attribute)
            .unwrap_or_else(|| name.to_string());
        Err(Error::missing_attribute(attribute, &self.path))
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.attributes.str(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.attributes.int(name)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.attributes.float(name)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.attributes.bool(name)
    }

    pub fn strings(&self, name: &str) -> &[String] {
        self.attributes.strings(name)
    }

    pub fn links(&self, name: &str) -> &[String] {
        self.attributes.links(name)
    }

    pub fn composite(&self, name: &str) -> Option<&Attributes> {
        self.attributes.composite(name)
    }

    pub fn list(&self, name: &str) -> &[Attributes] {
        self.attributes.list(name)
    }

    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, Attributes>> {
        self.attributes.map(name)
    }

    /// Render a diagnostic message through the shared registry mapping.
    ///
    /// Returns `None` when this resource carries no registries or the
    /// message is unknown to them.
    pub fn registry_message(&self, message_id: &str, args: &[&str]) -> Result<Option<String>> {
        match self.context.registries() {
            Some(registries) => registries.message(message_id, args),
            None => Ok(None),
        }
    }
}

/// A typed resource kind backed by a static schema
pub trait ResourceKind: Sized {
    /// Name used when reporting on this kind, e.g. `ComputerSystem`
    const KIND: &'static str;
    const SCHEMA: &'static [FieldSpec];

    fn from_resource(resource: Resource) -> Self;
    fn resource(&self) -> &Resource;
    fn resource_mut(&mut self) -> &mut Resource;

    fn fetch(context: ResourceContext, path: impl Into<String>) -> Result<Self> {
        Resource::fetch(context, path, Self::SCHEMA).map(Self::from_resource)
    }

    fn path(&self) -> &str {
        self.resource().path()
    }

    fn json(&self) -> &Value {
        self.resource().json()
    }

    fn redfish_version(&self) -> Option<&str> {
        self.resource().redfish_version()
    }

    fn refresh(&mut self) -> Result<()> {
        self.resource_mut().refresh()
    }
}

/// Declare a newtype over [`Resource`] implementing [`ResourceKind`]
#[macro_export]
macro_rules! resource_kind {
    ($(#[$meta:meta])* $vis:vis struct $name:ident($kind:literal, $schema:expr);) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name($crate::Resource);

        impl $crate::ResourceKind for $name {
            const KIND: &'static str = $kind;
            const SCHEMA: &'static [$crate::FieldSpec] = $schema;

            fn from_resource(resource: $crate::Resource) -> Self {
                Self(resource)
            }

            fn resource(&self) -> &$crate::Resource {
                &self.0
            }

            fn resource_mut(&mut self) -> &mut $crate::Resource {
                &mut self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::testing::MockConnector;
    use serde_json::json;

    const THING_FIELDS: &[FieldSpec] = &[
        FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
        FieldSpec::new("name", &["Name"], FieldKind::String),
        FieldSpec::new("power_state", &["PowerState"], FieldKind::String),
    ];

    crate::resource_kind! {
        struct Thing("Thing", THING_FIELDS);
    }

    fn context(conn: &Rc<MockConnector>) -> ResourceContext {
        ResourceContext::new(conn.clone())
    }

    #[test]
    fn test_fetch_parses_schema() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/1", json!({"Id": "1", "Name": "One"}));

        let thing = Thing::fetch(context(&conn), "/redfish/v1/Things/1").unwrap();
        assert_eq!(thing.path(), "/redfish/v1/Things/1");
        assert_eq!(thing.resource().require_str("identity").unwrap(), "1");
        assert_eq!(thing.resource().str("name"), Some("One"));
        assert_eq!(thing.resource().str("power_state"), None);
    }

    #[test]
    fn test_required_field_access_names_resource() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/2", json!({"Name": "No id"}));

        let thing = Thing::fetch(context(&conn), "/redfish/v1/Things/2").unwrap();
        let err = thing.resource().get("identity").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The attribute Id is missing from the resource /redfish/v1/Things/2"
        );
    }

    #[test]
    fn test_refresh_replaces_snapshot() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/1", json!({"Id": "1", "PowerState": "Off"}));

        let mut thing = Thing::fetch(context(&conn), "/redfish/v1/Things/1").unwrap();
        assert_eq!(thing.resource().str("power_state"), Some("Off"));

        conn.insert("/redfish/v1/Things/1", json!({"Id": "1", "Name": "Renamed"}));
        thing.refresh().unwrap();

        assert_eq!(thing.resource().str("power_state"), None);
        assert_eq!(thing.resource().str("name"), Some("Renamed"));
        assert_eq!(conn.get_count("/redfish/v1/Things/1"), 2);
    }

    #[test]
    fn test_refresh_failure_propagates() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/1", json!({"Id": "1"}));

        let mut thing = Thing::fetch(context(&conn), "/redfish/v1/Things/1").unwrap();
        conn.remove("/redfish/v1/Things/1");

        let err = thing.refresh().unwrap_err();
        assert!(matches!(err, Error::Transport(ref e) if e.status() == Some(404)));
    }

    #[test]
    fn test_malformed_refresh_keeps_well_formed_fields() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/1", json!({"Id": "1", "Name": "One", "PowerState": "On"}));

        let mut thing = Thing::fetch(context(&conn), "/redfish/v1/Things/1").unwrap();
        conn.insert("/redfish/v1/Things/1", json!({"Id": "1", "Name": 5}));

        let err = thing.refresh().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedAttribute { ref attribute, .. } if attribute == "Name"
        ));
        assert_eq!(thing.json()["Name"], 5);
        assert_eq!(thing.resource().require_str("identity").unwrap(), "1");
        assert_eq!(thing.resource().str("name"), None);
        assert_eq!(thing.resource().str("power_state"), None);

        let err = thing.resource().require_str("name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The attribute Name is missing from the resource /redfish/v1/Things/1"
        );
    }

    #[test]
    fn test_require_str_names_wire_attribute() {
        let conn = Rc::new(MockConnector::new());
        conn.insert("/redfish/v1/Things/3", json!({"Id": "3"}));

        let thing = Thing::fetch(context(&conn), "/redfish/v1/Things/3").unwrap();
        let err = thing.resource().require_str("power_state").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The attribute PowerState is missing from the resource /redfish/v1/Things/3"
        );
    }

    #[test]
    fn test_detached_resource_cannot_refresh() {
        let mut resource = Resource::from_json(
            ResourceContext::detached(),
            "bundled/Thing.json",
            THING_FIELDS,
            json!({"Id": "bundled"}),
        )
        .unwrap();

        assert_eq!(resource.require_str("identity").unwrap(), "bundled");
        assert!(matches!(resource.refresh(), Err(Error::Configuration(_))));
    }
}
