//! Storage subsystems of a computer system: controllers, drives and volumes

use redfin_core::{Attributes, Collection, FieldKind, FieldSpec, Resource, ResourceKind, Result};

use super::common::{Status, STATUS_FIELDS};

const IDENTIFIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("durable_name", &["DurableName"], FieldKind::String),
    FieldSpec::new(
        "durable_name_format",
        &["DurableNameFormat"],
        FieldKind::String,
    ),
];

pub const STORAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new("drives", &["Drives"], FieldKind::Links),
    FieldSpec::new("volumes_path", &["Volumes", "@odata.id"], FieldKind::String),
];

pub const DRIVE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("block_size_bytes", &["BlockSizeBytes"], FieldKind::Integer),
    FieldSpec::new("capacity_bytes", &["CapacityBytes"], FieldKind::Integer),
    FieldSpec::new(
        "identifiers",
        &["Identifiers"],
        FieldKind::List(IDENTIFIER_FIELDS),
    ),
    FieldSpec::new("indicator_led", &["IndicatorLED"], FieldKind::String),
    FieldSpec::new("manufacturer", &["Manufacturer"], FieldKind::String),
    FieldSpec::new("media_type", &["MediaType"], FieldKind::String),
    FieldSpec::new("model", &["Model"], FieldKind::String),
    FieldSpec::new("part_number", &["PartNumber"], FieldKind::String),
    FieldSpec::new("protocol", &["Protocol"], FieldKind::String),
    FieldSpec::new("revision", &["Revision"], FieldKind::String),
    FieldSpec::new("serial_number", &["SerialNumber"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new("volumes", &["Links", "Volumes"], FieldKind::Links),
];

pub const VOLUME_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("block_size_bytes", &["BlockSizeBytes"], FieldKind::Integer),
    FieldSpec::new("capacity_bytes", &["CapacityBytes"], FieldKind::Integer),
    FieldSpec::new("encrypted", &["Encrypted"], FieldKind::Bool),
    FieldSpec::new(
        "identifiers",
        &["Identifiers"],
        FieldKind::List(IDENTIFIER_FIELDS),
    ),
    FieldSpec::new("raid_type", &["RAIDType"], FieldKind::String),
    FieldSpec::new("volume_type", &["VolumeType"], FieldKind::String),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct Storage("Storage", STORAGE_FIELDS);
}

redfin_core::resource_kind! {
    pub struct Drive("Drive", DRIVE_FIELDS);
}

redfin_core::resource_kind! {
    pub struct Volume("Volume", VOLUME_FIELDS);
}

/// A durable name a drive or volume is known by
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifier {
    pub durable_name: Option<String>,
    pub durable_name_format: Option<String>,
}

impl Identifier {
    fn of(attributes: &Attributes) -> Self {
        Self {
            durable_name: attributes.str("durable_name").map(str::to_string),
            durable_name_format: attributes.str("durable_name_format").map(str::to_string),
        }
    }
}

fn identifiers(resource: &Resource) -> Vec<Identifier> {
    resource.list("identifiers").iter().map(Identifier::of).collect()
}

fn fetch_all<T: ResourceKind>(resource: &Resource, paths: &[String]) -> Result<Vec<T>> {
    paths
        .iter()
        .map(|path| T::fetch(resource.context().clone(), path.as_str()))
        .collect()
}

impl Storage {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    /// Paths of the drives attached to this subsystem
    pub fn drive_paths(&self) -> &[String] {
        self.0.links("drives")
    }

    /// Fetch every drive attached to this subsystem
    pub fn drives(&self) -> Result<Vec<Drive>> {
        fetch_all(&self.0, self.drive_paths())
    }

    pub fn volumes(&self) -> Result<Collection<Volume>> {
        let path = self.0.require_str("volumes_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }
}

impl Drive {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn block_size_bytes(&self) -> Option<i64> {
        self.0.int("block_size_bytes")
    }

    pub fn capacity_bytes(&self) -> Option<i64> {
        self.0.int("capacity_bytes")
    }

    pub fn identifiers(&self) -> Vec<Identifier> {
        identifiers(&self.0)
    }

    pub fn indicator_led(&self) -> Option<&str> {
        self.0.str("indicator_led")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.0.str("manufacturer")
    }

    pub fn media_type(&self) -> Option<&str> {
        self.0.str("media_type")
    }

    pub fn model(&self) -> Option<&str> {
        self.0.str("model")
    }

    pub fn part_number(&self) -> Option<&str> {
        self.0.str("part_number")
    }

    pub fn protocol(&self) -> Option<&str> {
        self.0.str("protocol")
    }

    pub fn revision(&self) -> Option<&str> {
        self.0.str("revision")
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.0.str("serial_number")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    /// Fetch the volumes this drive backs
    pub fn volumes(&self) -> Result<Vec<Volume>> {
        fetch_all(&self.0, self.0.links("volumes"))
    }
}

impl Volume {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn block_size_bytes(&self) -> Option<i64> {
        self.0.int("block_size_bytes")
    }

    pub fn capacity_bytes(&self) -> Option<i64> {
        self.0.int("capacity_bytes")
    }

    pub fn encrypted(&self) -> Option<bool> {
        self.0.bool("encrypted")
    }

    pub fn identifiers(&self) -> Vec<Identifier> {
        identifiers(&self.0)
    }

    pub fn raid_type(&self) -> Option<&str> {
        self.0.str("raid_type")
    }

    pub fn volume_type(&self) -> Option<&str> {
        self.0.str("volume_type")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }
}

/// Largest `CapacityBytes` over the members of a volume collection
pub fn max_volume_size_bytes(volumes: &Collection<Volume>) -> Result<Option<i64>> {
    let members = volumes.get_members()?;
    Ok(members.iter().filter_map(Volume::capacity_bytes).max())
}
