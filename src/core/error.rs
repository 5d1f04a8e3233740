use thiserror::Error;

use crate::core::types::{AntId, BuildingId, NodeId, ResourceKind, TaskId, UpgradeId};

/// Expected, player-facing failures. Reporting one never mutates state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Precondition {
    #[error("insufficient {kind}: need {needed}, have {available}")]
    InsufficientResources {
        kind: ResourceKind,
        needed: f64,
        available: f64,
    },

    #[error("colony level {current} is below required level {required}")]
    LevelTooLow { required: u32, current: u32 },

    #[error("{0} already holds a task")]
    AntBusy(AntId),

    #[error("{0} is already assigned")]
    TaskAlreadyAssigned(TaskId),

    #[error("{ant} cannot perform {task}")]
    TaskNotPerformable { ant: AntId, task: TaskId },

    #[error("target {0} is blocked by an active hazard")]
    NodeBlocked(NodeId),

    #[error("no task available for {0}")]
    NoTaskAvailable(AntId),

    #[error("no reachable {0} node")]
    NoReachableNode(ResourceKind),

    #[error("unknown ant: {0}")]
    UnknownAnt(AntId),

    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(UpgradeId),

    #[error("unknown building plan: {0}")]
    UnknownPlan(String),
}

/// Caller misuse: the request breaks an invariant of the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("{0} has already been applied to the colony")]
    BuildingAlreadyApplied(BuildingId),

    #[error("{task} payload is inconsistent with its kind: {reason}")]
    InconsistentPayload { task: TaskId, reason: &'static str },

    #[error("{0} is already registered")]
    DuplicateNode(NodeId),
}

#[derive(Error, Debug)]
pub enum ColonyError {
    #[error("precondition not met: {0}")]
    Precondition(#[from] Precondition),

    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ColonyError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, ColonyError>;
