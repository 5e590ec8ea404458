//! Message registries and the lazily built registry mapping
//!
//! Registries are large and rarely consulted, so the mapping that merges
//! them is built on first use only. Every resource of a graph shares one
//! [`LazyRegistries`] through an `Rc`; constructing a resource never forces
//! the build.

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::connector::PublicConnector;
use crate::error::Result;
use crate::field::{FieldKind, FieldSpec};
use crate::resource::{ResourceContext, ResourceKind};

const MESSAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("message", &["Message"], FieldKind::String).required(),
    FieldSpec::new("severity", &["Severity"], FieldKind::String),
    FieldSpec::new("number_of_args", &["NumberOfArgs"], FieldKind::Integer),
    FieldSpec::new("param_types", &["ParamTypes"], FieldKind::StringList),
    FieldSpec::new("resolution", &["Resolution"], FieldKind::String),
];

pub const MESSAGE_REGISTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("language", &["Language"], FieldKind::String).required(),
    FieldSpec::new("registry_prefix", &["RegistryPrefix"], FieldKind::String).required(),
    FieldSpec::new("registry_version", &["RegistryVersion"], FieldKind::String).required(),
    FieldSpec::new("owning_entity", &["OwningEntity"], FieldKind::String),
    FieldSpec::new("messages", &["Messages"], FieldKind::Map(MESSAGE_FIELDS)),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("language", &["Language"], FieldKind::String),
    FieldSpec::new("uri", &["Uri"], FieldKind::String),
    FieldSpec::new("archive_uri", &["ArchiveUri"], FieldKind::String),
    FieldSpec::new("publication_uri", &["PublicationUri"], FieldKind::String),
    FieldSpec::new("archive_file", &["ArchiveFile"], FieldKind::String),
];

pub const MESSAGE_REGISTRY_FILE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("registry", &["Registry"], FieldKind::String).required(),
    FieldSpec::new("languages", &["Languages"], FieldKind::StringList),
    FieldSpec::new("location", &["Location"], FieldKind::List(LOCATION_FIELDS)),
];

/// Compound registry key: `prefix.major.minor`, patch version dropped
pub fn registry_key(prefix: &str, version: &str) -> String {
    if let Ok(parsed) = semver::Version::parse(version) {
        return format!("{}.{}.{}", prefix, parsed.major, parsed.minor);
    }
    match version.rsplit_once('.') {
        Some((head, _)) if head.contains('.') => format!("{prefix}.{head}"),
        _ => format!("{prefix}.{version}"),
    }
}

/// Substitute `%1`..`%N` in a message template
fn render_template(template: &str, args: &[&str]) -> String {
    let mut rendered = template.to_string();
    // Highest index first so that %1 never eats the prefix of %10
    for (index, arg) in args.iter().enumerate().rev() {
        rendered = rendered.replace(&format!("%{}", index + 1), arg);
    }
    rendered
}

crate::resource_kind! {
    /// A catalog of message templates in one language
    pub struct MessageRegistry("MessageRegistry", MESSAGE_REGISTRY_FIELDS);
}

impl MessageRegistry {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn language(&self) -> Result<&str> {
        self.0.require_str("language")
    }

    pub fn registry_prefix(&self) -> Result<&str> {
        self.0.require_str("registry_prefix")
    }

    pub fn registry_version(&self) -> Result<&str> {
        self.0.require_str("registry_version")
    }

    pub fn owning_entity(&self) -> Option<&str> {
        self.0.str("owning_entity")
    }

    /// `prefix.major.minor` of this registry
    pub fn compound_key(&self) -> Result<String> {
        Ok(registry_key(self.registry_prefix()?, self.registry_version()?))
    }

    pub fn message_keys(&self) -> Vec<&str> {
        self.0
            .map("messages")
            .map(|messages| messages.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn message_template(&self, key: &str) -> Option<&str> {
        self.0.map("messages")?.get(key)?.str("message")
    }

    pub fn severity(&self, key: &str) -> Option<&str> {
        self.0.map("messages")?.get(key)?.str("severity")
    }

    pub fn resolution(&self, key: &str) -> Option<&str> {
        self.0.map("messages")?.get(key)?.str("resolution")
    }

    /// Render message `key` with its `%N` placeholders substituted
    pub fn parse_message(&self, key: &str, args: &[&str]) -> Option<String> {
        self.message_template(key)
            .map(|template| render_template(template, args))
    }
}

crate::resource_kind! {
    /// Where the service publishes one registry, per language
    pub struct MessageRegistryFile("MessageRegistryFile", MESSAGE_REGISTRY_FILE_FIELDS);
}

impl MessageRegistryFile {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    /// Compound key of the registry this file describes, e.g. `Base.1.4`
    pub fn registry(&self) -> Result<&str> {
        self.0.require_str("registry")
    }

    pub fn languages(&self) -> &[String] {
        self.0.strings("languages")
    }

    /// Fetch the registry body published for `language`.
    ///
    /// A service-local `Uri` is read through the management connector, a
    /// `PublicationUri` through `public_conn`. Returns `None` when no
    /// location for the language can be read; fetch errors propagate.
    pub fn get_message_registry(
        &self,
        language: &str,
        public_conn: &Rc<dyn PublicConnector>,
    ) -> Result<Option<MessageRegistry>> {
        let context = self.0.context();
        for location in self.0.list("location") {
            if location.str("language") != Some(language) {
                continue;
            }

            if let (Some(uri), Some(_)) = (location.str("uri"), context.connector()) {
                debug!(registry = %self.0.path(), uri = %uri, "Fetching message registry from service");
                return MessageRegistry::fetch(context.clone().without_registries(), uri).map(Some);
            }

            if let Some(uri) = location.str("publication_uri") {
                debug!(registry = %self.0.path(), uri = %uri, "Fetching published message registry");
                let public = ResourceContext::public(public_conn.clone())
                    .with_redfish_version(context.redfish_version().map(str::to_string));
                return MessageRegistry::fetch(public, uri).map(Some);
            }

            warn!(
                registry = %self.0.path(),
                language = %language,
                archive = ?location.str("archive_uri"),
                "Incomplete message registry location, skipping"
            );
        }

        warn!(
            registry = %self.0.path(),
            language = %language,
            "No message registry found for language"
        );
        Ok(None)
    }
}

/// Registries keyed by compound key and by registry file identity
pub type Registries = BTreeMap<String, Rc<MessageRegistry>>;

/// Builds the merged registry mapping
pub trait RegistrySource {
    fn build(&self) -> Result<Registries>;
}

/// A keyed mapping that runs its [`RegistrySource`] on first access only.
///
/// Every operation after the first reuses the realized mapping, including
/// inserts and removals. There is no locking: the type is `!Sync` and meant
/// for one thread.
pub struct LazyRegistries {
    source: Box<dyn RegistrySource>,
    registries: RefCell<Option<Registries>>,
}

impl std::fmt::Debug for LazyRegistries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRegistries")
            .field("built", &self.is_built())
            .finish()
    }
}

impl LazyRegistries {
    pub fn new(source: impl RegistrySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            registries: RefCell::new(None),
        }
    }

    pub fn is_built(&self) -> bool {
        self.registries.borrow().is_some()
    }

    fn realize(&self) -> Result<RefMut<'_, Registries>> {
        let mut slot = self.registries.borrow_mut();
        if slot.is_none() {
            debug!("Building message registries on first access");
            *slot = Some(self.source.build()?);
        }
        Ok(RefMut::map(slot, |slot| slot.get_or_insert_with(Registries::new)))
    }

    pub fn get(&self, key: &str) -> Result<Option<Rc<MessageRegistry>>> {
        Ok(self.realize()?.get(key).cloned())
    }

    pub fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.realize()?.contains_key(key))
    }

    pub fn insert(
        &self,
        key: impl Into<String>,
        registry: Rc<MessageRegistry>,
    ) -> Result<Option<Rc<MessageRegistry>>> {
        Ok(self.realize()?.insert(key.into(), registry))
    }

    pub fn remove(&self, key: &str) -> Result<Option<Rc<MessageRegistry>>> {
        Ok(self.realize()?.remove(key))
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.realize()?.keys().cloned().collect())
    }

    /// Key/registry pairs in key order
    pub fn entries(&self) -> Result<Vec<(String, Rc<MessageRegistry>)>> {
        Ok(self
            .realize()?
            .iter()
            .map(|(key, registry)| (key.clone(), registry.clone()))
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.realize()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.realize()?.is_empty())
    }

    /// A copy of the realized mapping; entries stay shared
    pub fn snapshot(&self) -> Result<Registries> {
        Ok(self.realize()?.clone())
    }

    /// Render a message by id, e.g. `Base.1.4.PropertyUnknown`.
    ///
    /// The registry is looked up by the id's compound key (its first three
    /// segments) and the message by the last segment.
    pub fn message(&self, message_id: &str, args: &[&str]) -> Result<Option<String>> {
        let segments: Vec<&str> = message_id.split('.').collect();
        if segments.len() < 2 {
            return Ok(None);
        }
        let key = segments[segments.len() - 1];
        let registry_segments = &segments[..segments.len() - 1];
        let registry_id = registry_segments[..registry_segments.len().min(3)].join(".");

        Ok(self
            .get(&registry_id)?
            .and_then(|registry| registry.parse_message(key, args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use crate::testing::MockConnector;
    use serde_json::json;
    use std::cell::Cell;

    fn base_registry() -> Rc<MessageRegistry> {
        let json = json!({
            "Id": "Base.1.4.0",
            "Language": "en",
            "RegistryPrefix": "Base",
            "RegistryVersion": "1.4.0",
            "Messages": {
                "PropertyValueNotInList": {
                    "Message": "The value %1 for the property %2 is not in the list of acceptable values.",
                    "Severity": "Warning",
                    "NumberOfArgs": 2,
                    "Resolution": "Choose a value from the enumeration list."
                }
            }
        });
        let resource = Resource::from_json(
            ResourceContext::detached(),
            "standard_registries/Base.1.4.0.json",
            MESSAGE_REGISTRY_FIELDS,
            json,
        )
        .unwrap();
        Rc::new(MessageRegistry::from_resource(resource))
    }

    struct CountingSource {
        builds: Rc<Cell<usize>>,
    }

    impl RegistrySource for CountingSource {
        fn build(&self) -> Result<Registries> {
            self.builds.set(self.builds.get() + 1);
            let mut registries = Registries::new();
            registries.insert("Base.1.4".to_string(), base_registry());
            Ok(registries)
        }
    }

    fn lazy() -> (LazyRegistries, Rc<Cell<usize>>) {
        let builds = Rc::new(Cell::new(0));
        let lazy = LazyRegistries::new(CountingSource {
            builds: builds.clone(),
        });
        (lazy, builds)
    }

    #[test]
    fn test_registry_key_drops_patch() {
        assert_eq!(registry_key("Base", "1.4.0"), "Base.1.4");
        assert_eq!(registry_key("Oem", "2.10.3"), "Oem.2.10");
        assert_eq!(registry_key("Legacy", "1.0"), "Legacy.1.0");
    }

    #[test]
    fn test_construction_does_not_build() {
        let (lazy, builds) = lazy();
        assert_eq!(builds.get(), 0);
        assert!(!lazy.is_built());
    }

    #[test]
    fn test_first_access_builds_once() {
        let (lazy, builds) = lazy();

        assert_eq!(lazy.len().unwrap(), 1);
        assert_eq!(builds.get(), 1);

        assert!(lazy.get("Base.1.4").unwrap().is_some());
        assert_eq!(lazy.keys().unwrap(), vec!["Base.1.4".to_string()]);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_iteration_triggers_build() {
        let (lazy, builds) = lazy();
        assert_eq!(lazy.entries().unwrap().len(), 1);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_mutation_after_build_does_not_rebuild() {
        let (lazy, builds) = lazy();

        lazy.insert("Custom.1.0", base_registry()).unwrap();
        assert_eq!(builds.get(), 1);
        assert_eq!(lazy.len().unwrap(), 2);

        assert!(lazy.remove("Base.1.4").unwrap().is_some());
        assert!(!lazy.contains_key("Base.1.4").unwrap());
        assert_eq!(lazy.len().unwrap(), 1);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_message_rendering() {
        let (lazy, _) = lazy();
        let message = lazy
            .message("Base.1.4.PropertyValueNotInList", &["Blue", "IndicatorLED"])
            .unwrap();
        assert_eq!(
            message.as_deref(),
            Some("The value Blue for the property IndicatorLED is not in the list of acceptable values.")
        );

        assert_eq!(lazy.message("Base.1.4.Unknown", &[]).unwrap(), None);
        assert_eq!(lazy.message("Missing.1.0.Success", &[]).unwrap(), None);
    }

    #[test]
    fn test_render_template_handles_double_digits() {
        let args: Vec<String> = (1..=10).map(|i| format!("a{i}")).collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        assert_eq!(render_template("%1 %10", &args), "a1 a10");
    }

    #[test]
    fn test_registry_accessors() {
        let registry = base_registry();
        assert_eq!(registry.compound_key().unwrap(), "Base.1.4");
        assert_eq!(registry.language().unwrap(), "en");
        assert_eq!(registry.severity("PropertyValueNotInList"), Some("Warning"));
        assert_eq!(registry.message_keys(), vec!["PropertyValueNotInList"]);
    }

    fn registry_file(conn: &Rc<MockConnector>, location: serde_json::Value) -> MessageRegistryFile {
        conn.insert(
            "/redfish/v1/Registries/Base",
            json!({"Id": "Base", "Registry": "Base.1.4", "Location": location}),
        );
        MessageRegistryFile::fetch(ResourceContext::new(conn.clone()), "/redfish/v1/Registries/Base").unwrap()
    }

    #[test]
    fn test_registry_file_prefers_service_uri() {
        let conn = Rc::new(MockConnector::new());
        conn.insert(
            "/redfish/v1/Registries/Base/Base.json",
            json!({"Id": "Base.1.4.1", "Language": "en", "RegistryPrefix": "Base", "RegistryVersion": "1.4.1"}),
        );
        let file = registry_file(
            &conn,
            json!([{"Language": "en", "Uri": "/redfish/v1/Registries/Base/Base.json", "PublicationUri": "https://example.org/Base.json"}]),
        );
        let public: Rc<dyn PublicConnector> = Rc::new(MockConnector::new());

        let registry = file.get_message_registry("en", &public).unwrap().unwrap();
        assert_eq!(registry.identity().unwrap(), "Base.1.4.1");
        assert_eq!(file.registry().unwrap(), "Base.1.4");
    }

    #[test]
    fn test_registry_file_uses_public_connector_for_publication_uri() {
        let conn = Rc::new(MockConnector::new());
        let file = registry_file(
            &conn,
            json!([
                {"Language": "de", "Uri": "/redfish/v1/Registries/Base/Base.de.json"},
                {"Language": "en", "PublicationUri": "https://example.org/Base.1.4.1.json"}
            ]),
        );
        let public = Rc::new(MockConnector::new());
        public.insert(
            "https://example.org/Base.1.4.1.json",
            json!({"Id": "Base.1.4.1", "Language": "en", "RegistryPrefix": "Base", "RegistryVersion": "1.4.1"}),
        );
        let public_dyn: Rc<dyn PublicConnector> = public.clone();

        let registry = file.get_message_registry("en", &public_dyn).unwrap().unwrap();
        assert_eq!(registry.language().unwrap(), "en");
        assert_eq!(public.get_count("https://example.org/Base.1.4.1.json"), 1);
        assert_eq!(conn.get_count("/redfish/v1/Registries/Base/Base.de.json"), 0);
    }

    #[test]
    fn test_registry_file_without_language_yields_none() {
        let conn = Rc::new(MockConnector::new());
        let file = registry_file(&conn, json!([{"Language": "fr"}, {"Language": "en"}]));
        let public: Rc<dyn PublicConnector> = Rc::new(MockConnector::new());

        assert!(file.get_message_registry("en", &public).unwrap().is_none());
        assert!(file.get_message_registry("ja", &public).unwrap().is_none());
    }

    #[test]
    fn test_registry_file_fetch_error_propagates() {
        let conn = Rc::new(MockConnector::new());
        let file = registry_file(
            &conn,
            json!([{"Language": "en", "Uri": "/redfish/v1/Registries/Base/Missing.json"}]),
        );
        let public: Rc<dyn PublicConnector> = Rc::new(MockConnector::new());

        assert!(file.get_message_registry("en", &public).is_err());
    }
}
