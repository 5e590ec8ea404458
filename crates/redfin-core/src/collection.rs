//! Collection resources enumerating member links

use std::marker::PhantomData;
use tracing::debug;

use crate::error::Result;
use crate::field::{FieldKind, FieldSpec};
use crate::resource::{Resource, ResourceKind};

pub const COLLECTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("members", &["Members"], FieldKind::Links),
];

/// A collection of `T` resources.
///
/// Members are fetched on every call to [`get_member`](Self::get_member) or
/// [`get_members`](Self::get_members); the collection keeps none of them.
#[derive(Debug)]
pub struct Collection<T> {
    resource: Resource,
    _member: PhantomData<fn() -> T>,
}

impl<T: ResourceKind> ResourceKind for Collection<T> {
    const KIND: &'static str = "Collection";
    const SCHEMA: &'static [FieldSpec] = COLLECTION_FIELDS;

    fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            _member: PhantomData,
        }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl<T: ResourceKind> Collection<T> {
    pub fn name(&self) -> Option<&str> {
        self.resource.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.resource.str("description")
    }

    /// Member paths in document order
    pub fn members_identities(&self) -> &[String] {
        self.resource.links("members")
    }

    /// Build the member at `path`; membership is not checked
    pub fn get_member(&self, path: &str) -> Result<T> {
        T::fetch(self.resource.context().clone(), path)
    }

    pub fn get_members(&self) -> Result<Vec<T>> {
        debug!(
            path = %self.resource.path(),
            count = self.members_identities().len(),
            "Fetching collection members"
        );
        self.members_identities()
            .iter()
            .map(|path| self.get_member(path))
            .collect()
    }
}
