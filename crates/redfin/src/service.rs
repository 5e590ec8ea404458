//! The service root and the navigator over its relations

use redfin_core::{
    Attributes, Collection, Connector, Error, FieldKind, FieldSpec, LazyRegistries,
    MessageRegistryFile, PublicConnector, Registries, Resource, ResourceContext, ResourceKind,
    Result,
};
use redfin_http::{HttpConnector, PublicHttpConnector};
use std::rc::Rc;
use tracing::{debug, info};

use crate::auth::{AuthContext, AuthMechanism, AuthState};
use crate::bundled::{BundledRegistries, DirectoryRegistries, EmbeddedRegistries};
use crate::config::ServiceConfig;
use crate::resolver::RegistryResolver;
use crate::resources::{
    Chassis, CompositionService, Fabric, Manager, Session, SessionService, System, UpdateService,
};

const EXPAND_QUERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("expand_all", &["ExpandAll"], FieldKind::Bool),
    FieldSpec::new("levels", &["Levels"], FieldKind::Bool),
    FieldSpec::new("links", &["Links"], FieldKind::Bool),
    FieldSpec::new("max_levels", &["MaxLevels"], FieldKind::Integer),
    FieldSpec::new("no_links", &["NoLinks"], FieldKind::Bool),
];

const PROTOCOL_FEATURES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("excerpt_query", &["ExcerptQuery"], FieldKind::Bool),
    FieldSpec::new("expand_query", &["ExpandQuery"], FieldKind::Composite(EXPAND_QUERY_FIELDS)),
    FieldSpec::new("filter_query", &["FilterQuery"], FieldKind::Bool),
    FieldSpec::new("only_member_query", &["OnlyMemberQuery"], FieldKind::Bool),
    FieldSpec::new("select_query", &["SelectQuery"], FieldKind::Bool),
];

pub const SERVICE_ROOT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("uuid", &["UUID"], FieldKind::String),
    FieldSpec::new("product", &["Product"], FieldKind::String),
    FieldSpec::new("redfish_version", &["RedfishVersion"], FieldKind::String),
    FieldSpec::new(
        "protocol_features_supported",
        &["ProtocolFeaturesSupported"],
        FieldKind::Composite(PROTOCOL_FEATURES_FIELDS),
    ),
    FieldSpec::new("systems_path", &["Systems", "@odata.id"], FieldKind::String),
    FieldSpec::new("managers_path", &["Managers", "@odata.id"], FieldKind::String),
    FieldSpec::new("chassis_path", &["Chassis", "@odata.id"], FieldKind::String),
    FieldSpec::new("fabrics_path", &["Fabrics", "@odata.id"], FieldKind::String),
    FieldSpec::new(
        "session_service_path",
        &["SessionService", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new("registries_path", &["Registries", "@odata.id"], FieldKind::String),
    FieldSpec::new(
        "update_service_path",
        &["UpdateService", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new(
        "composition_service_path",
        &["CompositionService", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new(
        "sessions_path",
        &["Links", "Sessions", "@odata.id"],
        FieldKind::String,
    ),
];

/// Optional query parameters the service announces support for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolFeatures {
    pub excerpt_query: Option<bool>,
    pub expand_all: Option<bool>,
    pub expand_levels: Option<bool>,
    pub expand_max_levels: Option<i64>,
    pub filter_query: Option<bool>,
    pub only_member_query: Option<bool>,
    pub select_query: Option<bool>,
}

impl ProtocolFeatures {
    fn from_attributes(attributes: &Attributes) -> Self {
        let expand = attributes.composite("expand_query");
        Self {
            excerpt_query: attributes.bool("excerpt_query"),
            expand_all: expand.and_then(|e| e.bool("expand_all")),
            expand_levels: expand.and_then(|e| e.bool("levels")),
            expand_max_levels: expand.and_then(|e| e.int("max_levels")),
            filter_query: attributes.bool("filter_query"),
            only_member_query: attributes.bool("only_member_query"),
            select_query: attributes.bool("select_query"),
        }
    }
}

/// Collects the overrides a [`Service`] is connected with
pub struct ServiceBuilder {
    config: ServiceConfig,
    auth: Option<Box<dyn AuthMechanism>>,
    connector: Option<Rc<dyn Connector>>,
    public_connector: Option<Rc<dyn PublicConnector>>,
    bundled: Option<Rc<dyn BundledRegistries>>,
}

impl ServiceBuilder {
    /// Use `auth` instead of session-or-basic authentication
    pub fn auth(mut self, auth: impl AuthMechanism + 'static) -> Self {
        self.auth = Some(Box::new(auth));
        self
    }

    /// Transport for the management channel
    pub fn connector(mut self, connector: Rc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Transport for registry content published outside the service
    pub fn public_connector(mut self, connector: Rc<dyn PublicConnector>) -> Self {
        self.public_connector = Some(connector);
        self
    }

    pub fn bundled_registries(mut self, bundled: Rc<dyn BundledRegistries>) -> Self {
        self.bundled = Some(bundled);
        self
    }

    /// Fetch the service root and authenticate
    pub fn connect(self) -> Result<Service> {
        let config = self.config;

        // Rejected before any transport exists
        let mut auth = AuthContext::new(self.auth, config.username.clone(), config.password.clone())?;

        let conn: Rc<dyn Connector> = match self.connector {
            Some(conn) => conn,
            None => Rc::new(HttpConnector::new(&config.base_url, &config.verify, config.timeout())?),
        };
        let public_conn: Rc<dyn PublicConnector> = match self.public_connector {
            Some(conn) => conn,
            None => Rc::new(PublicHttpConnector::new(config.timeout())?),
        };
        let bundled: Rc<dyn BundledRegistries> = match (self.bundled, &config.registries_dir) {
            (Some(bundled), _) => bundled,
            (None, Some(dir)) => Rc::new(DirectoryRegistries::new(dir)),
            (None, None) => Rc::new(EmbeddedRegistries),
        };

        auth.bind(conn.clone())?;

        let mut root = match Resource::fetch(
            ResourceContext::new(conn.clone()),
            config.root_prefix.as_str(),
            SERVICE_ROOT_FIELDS,
        ) {
            Ok(root) => root,
            Err(e) => {
                auth.close();
                return Err(e);
            }
        };

        let redfish_version = root.str("redfish_version").map(str::to_string);
        let resolver = RegistryResolver::new(conn.clone(), public_conn.clone(), bundled, &config.language)
            .with_registries_path(root.str("registries_path").map(str::to_string))
            .with_redfish_version(redfish_version.clone());
        let registries = Rc::new(LazyRegistries::new(resolver));
        root.set_context(
            ResourceContext::new(conn.clone())
                .with_redfish_version(redfish_version)
                .with_registries(registries.clone()),
        );

        if let Err(e) = auth.authenticate(&root) {
            auth.close();
            return Err(e);
        }

        info!(
            base_url = %config.base_url,
            root = %root.path(),
            redfish_version = ?root.redfish_version(),
            "Connected to Redfish service"
        );

        Ok(Service {
            root,
            conn,
            registries,
            auth,
            config,
        })
    }
}

/// A connected Redfish service.
///
/// Owns the authenticated session, which is closed when the service is
/// closed or dropped, and the lazily built registry mapping every child
/// resource shares.
pub struct Service {
    root: Resource,
    conn: Rc<dyn Connector>,
    registries: Rc<LazyRegistries>,
    auth: AuthContext,
    config: ServiceConfig,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("base_url", &self.config.base_url)
            .field("root", &self.root.path())
            .field("registries", &self.registries)
            .field("auth", &self.auth)
            .finish()
    }
}

impl Service {
    pub fn builder(config: ServiceConfig) -> ServiceBuilder {
        ServiceBuilder {
            config,
            auth: None,
            connector: None,
            public_connector: None,
            bundled: None,
        }
    }

    /// Connect with the default transports and authentication
    pub fn connect(config: ServiceConfig) -> Result<Self> {
        Self::builder(config).connect()
    }

    pub fn root(&self) -> &Resource {
        &self.root
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn connector(&self) -> &Rc<dyn Connector> {
        &self.conn
    }

    pub fn identity(&self) -> Result<&str> {
        self.root.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.root.str("name")
    }

    pub fn uuid(&self) -> Option<&str> {
        self.root.str("uuid")
    }

    pub fn product(&self) -> Option<&str> {
        self.root.str("product")
    }

    pub fn redfish_version(&self) -> Option<&str> {
        self.root.str("redfish_version")
    }

    pub fn protocol_features(&self) -> Option<ProtocolFeatures> {
        self.root
            .composite("protocol_features_supported")
            .map(ProtocolFeatures::from_attributes)
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    fn child_context(&self) -> ResourceContext {
        self.root.context().clone()
    }

    fn collection<T: ResourceKind>(&self, relation: &str) -> Result<Collection<T>> {
        let path = self.root.require_str(relation)?;
        Collection::fetch(self.child_context(), path)
    }

    /// The member at `identity`, or the only member of the collection
    fn member<T: ResourceKind>(&self, relation: &str, identity: Option<&str>) -> Result<T> {
        if let Some(path) = identity {
            return T::fetch(self.child_context(), path);
        }

        let collection = self.collection::<T>(relation)?;
        match collection.members_identities() {
            [only] => {
                debug!(kind = T::KIND, path = %only, "Selected default member");
                collection.get_member(only)
            }
            _ => Err(Error::UnknownDefault {
                entity: T::KIND.to_string(),
                error: format!("{} count is not exactly one", T::KIND),
            }),
        }
    }

    pub fn systems(&self) -> Result<Collection<System>> {
        self.collection("systems_path")
    }

    /// The system at `identity`, or the only one when `None`
    pub fn system(&self, identity: Option<&str>) -> Result<System> {
        self.member("systems_path", identity)
    }

    pub fn chassis_collection(&self) -> Result<Collection<Chassis>> {
        self.collection("chassis_path")
    }

    pub fn chassis(&self, identity: Option<&str>) -> Result<Chassis> {
        self.member("chassis_path", identity)
    }

    pub fn managers(&self) -> Result<Collection<Manager>> {
        self.collection("managers_path")
    }

    pub fn manager(&self, identity: Option<&str>) -> Result<Manager> {
        self.member("managers_path", identity)
    }

    pub fn fabrics(&self) -> Result<Collection<Fabric>> {
        self.collection("fabrics_path")
    }

    pub fn fabric(&self, identity: Option<&str>) -> Result<Fabric> {
        self.member("fabrics_path", identity)
    }

    /// Sessions collection, linked from `Links/Sessions`
    pub fn sessions(&self) -> Result<Collection<Session>> {
        self.collection("sessions_path")
    }

    pub fn session(&self, identity: Option<&str>) -> Result<Session> {
        self.member("sessions_path", identity)
    }

    pub fn sessions_path(&self) -> Result<&str> {
        self.root.require_str("sessions_path")
    }

    /// The session service never resolves diagnostics, so it is built
    /// without the registry mapping
    pub fn session_service(&self) -> Result<SessionService> {
        let path = self.root.require_str("session_service_path")?;
        SessionService::fetch(self.child_context().without_registries(), path)
    }

    pub fn update_service(&self) -> Result<UpdateService> {
        let path = self.root.require_str("update_service_path")?;
        UpdateService::fetch(self.child_context(), path)
    }

    pub fn composition_service(&self) -> Result<CompositionService> {
        let path = self.root.require_str("composition_service_path")?;
        CompositionService::fetch(self.child_context(), path)
    }

    /// The registry files the service publishes, if it has any.
    ///
    /// Built without the registry mapping, which is itself built from them
    pub fn registry_collection(&self) -> Result<Option<Collection<MessageRegistryFile>>> {
        match self.root.str("registries_path") {
            Some(path) => Collection::fetch(self.child_context().without_registries(), path).map(Some),
            None => Ok(None),
        }
    }

    pub fn registry_file(&self, identity: Option<&str>) -> Result<MessageRegistryFile> {
        self.member("registries_path", identity)
    }

    /// The registry mapping, built now if it has not been yet
    pub fn registries(&self) -> Result<Registries> {
        self.registries.snapshot()
    }

    /// The shared registry mapping, built on first use
    pub fn lazy_registries(&self) -> &Rc<LazyRegistries> {
        &self.registries
    }

    /// Re-fetch the root document.
    ///
    /// Children built afterwards report the root's current `RedfishVersion`.
    /// The registry mapping keeps the registries path seen at connect, since
    /// a built mapping is never rebuilt.
    pub fn refresh(&mut self) -> Result<()> {
        let result = self.root.refresh();
        let redfish_version = self.root.str("redfish_version").map(str::to_string);
        debug!(redfish_version = ?redfish_version, ok = result.is_ok(), "Refreshed service root");
        let context = self.root.context().clone().with_redfish_version(redfish_version);
        self.root.set_context(context);
        result
    }

    /// End the session and release the connector; later calls do nothing
    pub fn close(&mut self) {
        self.auth.close();
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        self.auth.close();
    }
}
