//! Redfin Core - Typed resource model over a Redfish document graph
//!
//! This crate provides the building blocks the Redfin client is made of:
//! - Field descriptors that resolve typed attributes out of JSON documents
//! - Resources binding a fetched document to a static field schema
//! - Collections producing member resources on demand
//! - Message registry resources and the lazily built registry mapping
//! - The connector contract every document retrieval goes through

pub mod collection;
pub mod connector;
pub mod error;
pub mod field;
pub mod registry;
pub mod resource;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use collection::{Collection, COLLECTION_FIELDS};
pub use connector::{Connector, Credentials, PostResponse, PublicConnector};
pub use error::{Error, Result, TransportError};
pub use field::{parse_fields, parse_fields_lenient, Attributes, FieldKind, FieldSpec, FieldValue};
pub use registry::{
    registry_key, LazyRegistries, MessageRegistry, MessageRegistryFile, Registries,
    RegistrySource,
};
pub use resource::{Resource, ResourceContext, ResourceKind, Source};
