//! Processors of a computer system

use redfin_core::{Collection, FieldKind, FieldSpec, Result, ResourceKind};

use super::common::{Status, STATUS_FIELDS};

const PROCESSOR_ID_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("effective_family", &["EffectiveFamily"], FieldKind::String),
    FieldSpec::new("effective_model", &["EffectiveModel"], FieldKind::String),
    FieldSpec::new(
        "identification_registers",
        &["IdentificationRegisters"],
        FieldKind::String,
    ),
    FieldSpec::new("microcode_info", &["MicrocodeInfo"], FieldKind::String),
    FieldSpec::new("step", &["Step"], FieldKind::String),
    FieldSpec::new("vendor_id", &["VendorId"], FieldKind::String),
];

pub const PROCESSOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("identity", &["Id"], FieldKind::String).required(),
    FieldSpec::new("name", &["Name"], FieldKind::String),
    FieldSpec::new("socket", &["Socket"], FieldKind::String),
    FieldSpec::new("processor_type", &["ProcessorType"], FieldKind::String),
    FieldSpec::new(
        "processor_architecture",
        &["ProcessorArchitecture"],
        FieldKind::String,
    ),
    FieldSpec::new("instruction_set", &["InstructionSet"], FieldKind::String),
    FieldSpec::new("manufacturer", &["Manufacturer"], FieldKind::String),
    FieldSpec::new("model", &["Model"], FieldKind::String),
    FieldSpec::new("max_speed_mhz", &["MaxSpeedMHz"], FieldKind::Integer),
    FieldSpec::new("total_cores", &["TotalCores"], FieldKind::Integer),
    FieldSpec::new("total_threads", &["TotalThreads"], FieldKind::Integer),
    FieldSpec::new(
        "processor_id",
        &["ProcessorId"],
        FieldKind::Composite(PROCESSOR_ID_FIELDS),
    ),
    FieldSpec::new("status", &["Status"], FieldKind::Composite(STATUS_FIELDS)),
    FieldSpec::new(
        "sub_processors_path",
        &["SubProcessors", "@odata.id"],
        FieldKind::String,
    ),
];

redfin_core::resource_kind! {
    pub struct Processor("Processor", PROCESSOR_FIELDS);
}

/// CPU identification registers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorId {
    pub effective_family: Option<String>,
    pub effective_model: Option<String>,
    pub identification_registers: Option<String>,
    pub microcode_info: Option<String>,
    pub step: Option<String>,
    pub vendor_id: Option<String>,
}

impl Processor {
    pub fn identity(&self) -> Result<&str> {
        self.0.require_str("identity")
    }

    pub fn socket(&self) -> Option<&str> {
        self.0.str("socket")
    }

    pub fn processor_type(&self) -> Option<&str> {
        self.0.str("processor_type")
    }

    pub fn processor_architecture(&self) -> Option<&str> {
        self.0.str("processor_architecture")
    }

    pub fn instruction_set(&self) -> Option<&str> {
        self.0.str("instruction_set")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.0.str("manufacturer")
    }

    pub fn model(&self) -> Option<&str> {
        self.0.str("model")
    }

    pub fn max_speed_mhz(&self) -> Option<i64> {
        self.0.int("max_speed_mhz")
    }

    pub fn total_cores(&self) -> Option<i64> {
        self.0.int("total_cores")
    }

    pub fn total_threads(&self) -> Option<i64> {
        self.0.int("total_threads")
    }

    pub fn processor_id(&self) -> Option<ProcessorId> {
        let id = self.0.composite("processor_id")?;
        let owned = |name: &str| id.str(name).map(str::to_string);
        Some(ProcessorId {
            effective_family: owned("effective_family"),
            effective_model: owned("effective_model"),
            identification_registers: owned("identification_registers"),
            microcode_info: owned("microcode_info"),
            step: owned("step"),
            vendor_id: owned("vendor_id"),
        })
    }

    pub fn status(&self) -> Option<Status> {
        Status::of(&self.0)
    }

    /// Cores or threads of this processor, as their own collection
    pub fn sub_processors(&self) -> Result<Collection<Processor>> {
        let path = self.0.require_str("sub_processors_path")?;
        Collection::fetch(self.0.context().clone(), path)
    }
}

/// Aggregate over a processor collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorSummary {
    /// Sum of `TotalThreads` over all members
    pub count: i64,
    /// Architecture of the first member reporting one
    pub architecture: Option<String>,
}

impl ProcessorSummary {
    /// Fetch every member of `collection` and summarize them
    pub fn from_collection(collection: &Collection<Processor>) -> Result<Self> {
        let processors = collection.get_members()?;
        Ok(Self::from_processors(&processors))
    }

    pub fn from_processors(processors: &[Processor]) -> Self {
        Self {
            count: processors.iter().filter_map(Processor::total_threads).sum(),
            architecture: processors
                .iter()
                .find_map(Processor::processor_architecture)
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfin_core::testing::MockConnector;
    use redfin_core::{Connector, Error, ResourceContext};
    use serde_json::json;
    use std::rc::Rc;

    const CPU1: &str = "/redfish/v1/Systems/437XR1138R2/Processors/CPU1";
    const CPU2: &str = "/redfish/v1/Systems/437XR1138R2/Processors/CPU2";
    const COLLECTION: &str = "/redfish/v1/Systems/437XR1138R2/Processors";

    fn mock() -> Rc<MockConnector> {
        let conn = Rc::new(MockConnector::new());
        conn.insert(
            CPU1,
            json!({
                "Id": "CPU1",
                "Socket": "CPU 1",
                "ProcessorType": "CPU",
                "ProcessorArchitecture": "x86",
                "InstructionSet": "x86-64",
                "Manufacturer": "Intel(R) Corporation",
                "Model": "Multi-Core Intel(R) Xeon(R) processor 7xxx Series",
                "ProcessorId": {
                    "VendorId": "GenuineIntel",
                    "IdentificationRegisters": "0x34AC34DC8901274A",
                    "EffectiveFamily": "0x42",
                    "EffectiveModel": "0x61",
                    "Step": "0x1",
                    "MicrocodeInfo": "0x429943"
                },
                "MaxSpeedMHz": 3700,
                "TotalCores": 8,
                "TotalThreads": 16,
                "Status": {"State": "Enabled", "Health": "OK", "HealthRollup": "OK"},
                "SubProcessors": {"@odata.id": format!("{CPU1}/SubProcessors")}
            }),
        );
        conn.insert(CPU2, json!({"Id": "CPU2", "Socket": "CPU 2", "Status": {"State": "Absent"}}));
        conn.insert(
            COLLECTION,
            json!({
                "Name": "Processors Collection",
                "Members": [{"@odata.id": CPU1}, {"@odata.id": CPU2}]
            }),
        );
        conn.insert(
            &format!("{CPU1}/SubProcessors"),
            json!({"Members": [{"@odata.id": format!("{CPU1}/SubProcessors/Core1")}]}),
        );
        conn.insert(&format!("{CPU1}/SubProcessors/Core1"), json!({"Id": "Core1"}));
        conn
    }

    fn context(conn: &Rc<MockConnector>) -> ResourceContext {
        ResourceContext::new(conn.clone()).with_redfish_version(Some("1.0.2".to_string()))
    }

    #[test]
    fn test_parse_attributes() {
        let conn = mock();
        let cpu = Processor::fetch(context(&conn), CPU1).unwrap();

        assert_eq!(cpu.redfish_version(), Some("1.0.2"));
        assert_eq!(cpu.identity().unwrap(), "CPU1");
        assert_eq!(cpu.socket(), Some("CPU 1"));
        assert_eq!(cpu.processor_type(), Some("CPU"));
        assert_eq!(cpu.processor_architecture(), Some("x86"));
        assert_eq!(cpu.instruction_set(), Some("x86-64"));
        assert_eq!(cpu.max_speed_mhz(), Some(3700));
        assert_eq!(cpu.total_cores(), Some(8));

        let id = cpu.processor_id().unwrap();
        assert_eq!(id.effective_family.as_deref(), Some("0x42"));
        assert_eq!(id.vendor_id.as_deref(), Some("GenuineIntel"));

        let status = cpu.status().unwrap();
        assert_eq!(status.state.as_deref(), Some("Enabled"));
        assert_eq!(status.health_rollup.as_deref(), Some("OK"));
    }

    #[test]
    fn test_float_encoded_speed() {
        let conn = mock();
        let mut document = conn.get(CPU1).unwrap();
        document["MaxSpeedMHz"] = json!(3700.0);
        document["TotalThreads"] = json!("16");
        conn.insert(CPU1, document);

        let cpu = Processor::fetch(context(&conn), CPU1).unwrap();
        assert_eq!(cpu.max_speed_mhz(), Some(3700));
        assert_eq!(cpu.total_threads(), Some(16));
    }

    #[test]
    fn test_sub_processors() {
        let conn = mock();
        let cpu = Processor::fetch(context(&conn), CPU1).unwrap();

        let sub = cpu.sub_processors().unwrap();
        let members = sub.get_members().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].identity().unwrap(), "Core1");
        assert_eq!(members[0].redfish_version(), Some("1.0.2"));
    }

    #[test]
    fn test_sub_processors_missing() {
        let conn = mock();
        let cpu = Processor::fetch(context(&conn), CPU2).unwrap();

        let err = cpu.sub_processors().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { ref attribute, .. } if attribute == "SubProcessors/@odata.id"
        ));
    }

    #[test]
    fn test_summary() {
        let conn = mock();
        let collection: Collection<Processor> = Collection::fetch(context(&conn), COLLECTION).unwrap();
        assert_eq!(collection.name(), Some("Processors Collection"));

        let summary = ProcessorSummary::from_collection(&collection).unwrap();
        assert_eq!(summary.count, 16);
        assert_eq!(summary.architecture.as_deref(), Some("x86"));
    }
}
