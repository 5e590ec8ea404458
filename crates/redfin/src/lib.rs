//! Redfin - Typed client object model over a Redfish service
//!
//! Connecting fetches the service root and authenticates; typed resources
//! are then reached by following the root's relations:
//!
//! ```no_run
//! use redfin::{Service, ServiceConfig};
//!
//! let config = ServiceConfig::new("https://bmc.example.com").with_credentials("admin", "secret");
//! let service = Service::connect(config)?;
//! let system = service.system(None)?;
//! println!("{:?}", system.power_state());
//! # Ok::<(), redfin::Error>(())
//! ```

pub mod auth;
pub mod bundled;
pub mod config;
pub mod resolver;
pub mod resources;
pub mod service;

pub use auth::{AuthContext, AuthMechanism, AuthState, BasicAuth, SessionAuth, SessionOrBasicAuth};
pub use bundled::{BundledRegistries, DirectoryRegistries, EmbeddedRegistries};
pub use config::{load_config, save_config, ServiceConfig};
pub use resolver::RegistryResolver;
pub use service::{ProtocolFeatures, Service, ServiceBuilder};

pub use redfin_core::{
    Collection, Connector, Error, LazyRegistries, MessageRegistry, MessageRegistryFile,
    PublicConnector, Registries, Resource, ResourceKind, Result,
};
pub use redfin_http::{HttpConnector, PublicHttpConnector, Verify};
