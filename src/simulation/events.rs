//! Events produced by a simulation step
//!
//! Returned in the step report for logs and presentation. Events carry
//! handles, never references, so they can be kept across steps.

use serde::{Deserialize, Serialize};

use crate::core::types::{AntId, BuildingId, HazardId, NodeId, ResourceKind, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// An idle ant claimed a task
    TaskAssigned {
        ant: AntId,
        task: TaskId,
        /// Node the task is bound to, if any
        node: Option<NodeId>,
    },
    /// A fatigued worker rested instead of taking work
    WorkerRested { ant: AntId },
    ResourceGathered {
        ant: AntId,
        node: NodeId,
        kind: ResourceKind,
        amount: f64,
    },
    /// Extraction put a node into cooldown
    NodeDepleted { node: NodeId },
    NodeRegenerated { node: NodeId, richness: f64 },
    ResourceDelivered {
        ant: AntId,
        kind: ResourceKind,
        stored: f64,
        overflow: f64,
    },
    /// A hazard destroyed a load on its way home
    CargoLost {
        ant: AntId,
        hazard: HazardId,
        kind: ResourceKind,
        amount: f64,
    },
    BuildingCompleted {
        ant: AntId,
        building: BuildingId,
        plan: String,
    },
    AreaExplored {
        ant: AntId,
        visibility_radius: f64,
        discovered_rich_node: bool,
    },
    TaskCompleted { ant: AntId, task: TaskId },
    MaintenancePaid { required: f64, paid: f64, ratio: f64 },
    WorkerHatched { ant: AntId },
    HazardExpired { hazard: HazardId },
}
