//! Composition service for composable infrastructure

use redfin_core::{FieldKind, FieldSpec, Result};

use super::common::{Status, STATUS_FIELDS};

pub const COMPOSITION_SERVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("service_enabled", &["ServiceEnabled"], FieldKind::Bool),
    FieldSpec::new(
        "allow_overprovisioning",
        &["AllowOverprovisioning"],
        FieldKind::Bool,
    ),
    FieldSpec::new("allow_zone_affinity", &["AllowZoneAffinity"], FieldKind::Bool),
    FieldSpec::new(
        "resource_blocks_path",
        &["ResourceBlocks", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new(
        "resource_zones_path",
        &["ResourceZones", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct CompositionService("CompositionService", COMPOSITION_SERVICE_FIELDS);
}

impl CompositionService {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn service_enabled(&self) -> Option<bool> {
        self.0.bool("service_enabled")
    }

    pub fn allow_overprovisioning(&self) -> Option<bool> {
        self.0.bool("allow_overprovisioning")
    }

    pub fn allow_zone_affinity(&self) -> Option<bool> {
        self.0.bool("allow_zone_affinity")
    }

    pub fn resource_blocks_path(&self) -> Option<&str> {
        self.0.str("resource_blocks_path")
    }

    pub fn resource_zones_path(&self) -> Option<&str> {
        self.0.str("resource_zones_path")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }
}
