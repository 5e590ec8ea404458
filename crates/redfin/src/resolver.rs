//! Merges bundled and service-provided message registries

use redfin_core::{
    Collection, Connector, MessageRegistry, MessageRegistryFile, PublicConnector, Registries,
    RegistrySource, Resource, ResourceContext, ResourceKind, Result,
};
use std::rc::Rc;
use tracing::{debug, info};

use crate::bundled::BundledRegistries;

/// Everything needed to build the registry mapping of one service.
///
/// Holds the connectors rather than the service root, so the mapping the
/// root owns never points back at it.
pub struct RegistryResolver {
    conn: Rc<dyn Connector>,
    public_conn: Rc<dyn PublicConnector>,
    bundled: Rc<dyn BundledRegistries>,
    registries_path: Option<String>,
    language: String,
    redfish_version: Option<String>,
}

impl RegistryResolver {
    pub fn new(
        conn: Rc<dyn Connector>,
        public_conn: Rc<dyn PublicConnector>,
        bundled: Rc<dyn BundledRegistries>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            public_conn,
            bundled,
            registries_path: None,
            language: language.into(),
            redfish_version: None,
        }
    }

    /// Path of the service's registries collection, when it has one
    pub fn with_registries_path(mut self, path: Option<String>) -> Self {
        self.registries_path = path;
        self
    }

    pub fn with_redfish_version(mut self, redfish_version: Option<String>) -> Self {
        self.redfish_version = redfish_version;
        self
    }

    /// Bundled registries in the configured language, by compound key
    pub fn standard_registries(&self) -> Result<Registries> {
        let mut registries = Registries::new();
        for name in self.bundled.names()? {
            let json = self.bundled.read(&name)?;
            let resource = Resource::from_json(
                ResourceContext::detached(),
                format!("standard_registries/{name}"),
                MessageRegistry::SCHEMA,
                json,
            )?;
            let registry = MessageRegistry::from_resource(resource);
            if registry.language().ok() != Some(self.language.as_str()) {
                continue;
            }
            registries.insert(registry.compound_key()?, Rc::new(registry));
        }
        debug!(language = %self.language, count = registries.len(), "Loaded standard registries");
        Ok(registries)
    }

    /// Fetch the service's registries and merge them over `registries`.
    ///
    /// A provided registry always replaces the entry under its compound key;
    /// its file identity is only added when that key is still free.
    pub fn merge_provided(&self, registries: &mut Registries, path: &str) -> Result<()> {
        let context = ResourceContext::new(self.conn.clone())
            .with_redfish_version(self.redfish_version.clone());
        let files: Collection<MessageRegistryFile> = Collection::fetch(context, path)?;

        let mut provided = 0;
        for file in files.get_members()? {
            let Some(registry) = file.get_message_registry(&self.language, &self.public_conn)? else {
                continue;
            };
            let registry = Rc::new(registry);
            registries.insert(file.registry()?.to_string(), registry.clone());
            registries
                .entry(file.identity()?.to_string())
                .or_insert(registry);
            provided += 1;
        }
        info!(path = %path, provided, "Merged service message registries");
        Ok(())
    }
}

impl RegistrySource for RegistryResolver {
    fn build(&self) -> Result<Registries> {
        let mut registries = self.standard_registries()?;
        if let Some(path) = &self.registries_path {
            self.merge_provided(&mut registries, path)?;
        }
        Ok(registries)
    }
}
