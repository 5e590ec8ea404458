//! Network interfaces of a computer system

use redfin_core::{Collection, FieldKind, FieldSpec, Result};
use std::collections::BTreeMap;

use super::common::{Status, STATUS_FIELDS};

pub const ETHERNET_INTERFACE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("description", &["Description"], FieldKind::String),
    FieldSpec::new(
        "permanent_mac_address",
        &["PermanentMACAddress"],
        FieldKind::String,
    ),
    FieldSpec::new("mac_address", &["MACAddress"], FieldKind::String),
    FieldSpec::new("speed_mbps", &["SpeedMbps"], FieldKind::Integer),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
];

redfin_core::resource_kind! {
    pub struct EthernetInterface("EthernetInterface", ETHERNET_INTERFACE_FIELDS);
}

impl EthernetInterface {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str("description")
    }

    pub fn permanent_mac_address(&self) -> Option<&str> {
        self.0.str("permanent_mac_address")
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.0.str("mac_address")
    }

    pub fn speed_mbps(&self) -> Option<i64> {
        self.0.int("speed_mbps")
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }
}

/// MAC address to interface state, for every member reporting both
pub fn interface_summary(collection: &Collection<EthernetInterface>) -> Result<BTreeMap<String, String>> {
    let summary = collection
        .get_members()?
        .iter()
        .filter_map(|interface| {
            let mac = interface.mac_address()?.to_string();
            let state = interface.status()?.state?;
            Some((mac, state))
        })
        .collect();
    Ok(summary)
}
