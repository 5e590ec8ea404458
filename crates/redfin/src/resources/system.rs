//! Computer systems

use redfin_core::{Collection, FieldKind, FieldSpec, Result, ResourceKind};

use super::common::{Status, STATUS_FIELDS};
use super::ethernet_interface::EthernetInterface;
use super::processor::Processor;
use super::storage::Storage;

pub const SYSTEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("uuid", &["UUID"], FieldKind::String),
    FieldSpec::new("hostname", &["HostName"], FieldKind::String),
    FieldSpec::new("manufacturer", &["Manufacturer"], FieldKind::String),
    FieldSpec::new("model", &["Model"], FieldKind::String),
    FieldSpec::new("serial_number", &["SerialNumber"], FieldKind::String),
    FieldSpec::new("power_state", &["PowerState"], FieldKind::String),
    FieldSpec::new("system_type", &["SystemType"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new(
        "processors_path",
        &["Processors", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new(
        "ethernet_interfaces_path",
        &["EthernetInterfaces", "@odata.id"],
        FieldKind::String,
    ),
    FieldSpec::new("storage_path", &["Storage", "@odata.id"], FieldKind::String),
];

redfin_core::resource_kind! {
    pub struct System("ComputerSystem", SYSTEM_FIELDS);
}

impl System {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn uuid(&self) -> Option<&str> {
        self.0.str("uuid")
    }

    pub fn hostname(&self) -> Option<&str> {
        self.0.str("hostname")
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

    pub fn power_state(&self) -> Option<&str> {
        self.0.str("power_state")
    }

    pub fn system_type(&self) -> Option<&str> {
        self.0.str("system_type")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    pub fn processors(&self) -> Result<Collection<Processor>> {
        let path = self.0.require_str("processors_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }

    pub fn ethernet_interfaces(&self) -> Result<Collection<EthernetInterface>> {
        let path = self.0.require_str("ethernet_interfaces_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }

    pub fn storage(&self) -> Result<Collection<Storage>> {
        let path = self.0.require_str("storage_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }
}
