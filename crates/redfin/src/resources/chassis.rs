//! Chassis enclosing systems and components

use redfin_core::{FieldKind, FieldSpec, Result};

use super::common::{Status, STATUS_FIELDS};

pub const CHASSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("chassis_type", &["ChassisType"], FieldKind::String),
    FieldSpec::new("manufacturer", &["Manufacturer"], FieldKind::String),
    FieldSpec::new("model", &["Model"], FieldKind::String),
    FieldSpec::new("serial_number", &["SerialNumber"], FieldKind::String),
    FieldSpec::new("asset_tag", &["AssetTag"], FieldKind::String),
    FieldSpec::new("indicator_led", &["IndicatorLED"], FieldKind::String),
    FieldSpec::new("power_state", &["PowerState"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new(
        "computer_systems",
        &["Links", "ComputerSystems"],
        FieldKind::Links,
    ),
    FieldSpec::new("managed_by", &["Links", "ManagedBy"], FieldKind::Links),
];

redfin_core::resource_kind! {
    pub struct Chassis("Chassis", CHASSIS_FIELDS);
}

impl Chassis {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn chassis_type(&self) -> Option<&str> {
        self.0.str("chassis_type")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.0.str("manufacturer")
    }

    pub fn model(&self) -> Option<&str> {
        self.0.str("model")
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.0.str("serial_number")
    }

    pub fn asset_tag(&self) -> Option<&str> {
        self.0.str("asset_tag")
    }

    pub fn indicator_led(&self) -> Option<&str> {
        self.0.str("indicator_led")
    }

    pub fn power_state(&self) -> Option<&str> {
        self.0.str("power_state")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    /// Paths of the systems this chassis contains
    pub fn computer_systems(&self) -> &[String] {
        self.0.links("computer_systems")
    }

    /// Paths of the managers responsible for this chassis
    pub fn managed_by(&self) -> &[String] {
        self.0.links("managed_by")
    }
}
