pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{ColonyError, ContractViolation, Precondition, Result};
pub use types::{AntId, BuildingId, HazardId, NodeId, ResourceKind, SimTime, TaskId, Tick, UpgradeId};
