//! Typed resource kinds reachable from the service root

pub mod chassis;
pub mod common;
pub mod composition_service;
pub mod ethernet_interface;
pub mod fabric;
pub mod manager;
pub mod processor;
pub mod session_service;
pub mod storage;
pub mod system;
pub mod update_service;

pub use chassis::Chassis;
pub use common::Status;
pub use composition_service::CompositionService;
pub use ethernet_interface::EthernetInterface;
pub use fabric::Fabric;
pub use manager::Manager;
pub use processor::{Processor, ProcessorId, ProcessorSummary};
pub use session_service::{Session, SessionService};
pub use storage::{Drive, Identifier, Storage, Volume};
pub use system::System;
pub use update_service::UpdateService;
