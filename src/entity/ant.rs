//! Ants - a shared record specialised into workers and scouts

use serde::{Deserialize, Serialize};

use crate::core::config::{AntTemplate, ScoutTemplate};
use crate::core::error::Precondition;
use crate::core::types::{AntId, ResourceKind, TaskId};
use crate::entity::scout::ScoutTraits;
use crate::entity::tasks::Task;
use crate::entity::worker::{WorkerEfficiency, WorkerTraits};

/// Lifecycle of an ant within one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AntState {
    #[default]
    Idle,
    Traveling,
    Gathering,
    Carrying,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntStats {
    pub speed: f64,
    pub capacity: f64,
    pub energy: f64,
}

impl From<AntTemplate> for AntStats {
    fn from(template: AntTemplate) -> Self {
        Self {
            speed: template.speed,
            capacity: template.capacity,
            energy: template.energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AntRole {
    Worker(WorkerTraits),
    Scout(ScoutTraits),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub kind: ResourceKind,
    pub amount: f64,
}

/// Progress through the current task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Distance from the colony along the route
    pub position: f64,
    pub cargo: Option<Cargo>,
    /// Seconds of construction effort
    pub work_done: f64,
    /// Scout has reached the edge of its sweep
    pub explored: bool,
}

impl Trip {
    pub fn cargo_amount(&self) -> f64 {
        self.cargo.map(|c| c.amount).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ant {
    pub id: AntId,
    pub state: AntState,
    pub task: Option<TaskId>,
    pub stats: AntStats,
    pub role: AntRole,
    pub trip: Trip,
}

impl Ant {
    pub fn new(id: AntId, stats: AntStats, role: AntRole) -> Self {
        Self {
            id,
            state: AntState::Idle,
            task: None,
            stats,
            role,
            trip: Trip::default(),
        }
    }

    pub fn worker(id: AntId, template: AntTemplate) -> Self {
        Self::new(
            id,
            template.into(),
            AntRole::Worker(WorkerTraits::new(WorkerEfficiency::default())),
        )
    }

    pub fn scout(id: AntId, template: &ScoutTemplate) -> Self {
        Self::new(
            id,
            template.stats.into(),
            AntRole::Scout(ScoutTraits::new(
                template.detection_radius,
                template.rich_node_chance,
            )),
        )
    }

    pub fn is_worker(&self) -> bool {
        matches!(self.role, AntRole::Worker(_))
    }

    pub fn is_scout(&self) -> bool {
        matches!(self.role, AntRole::Scout(_))
    }

    pub fn worker_traits(&self) -> Option<&WorkerTraits> {
        match &self.role {
            AntRole::Worker(traits) => Some(traits),
            AntRole::Scout(_) => None,
        }
    }

    pub fn worker_traits_mut(&mut self) -> Option<&mut WorkerTraits> {
        match &mut self.role {
            AntRole::Worker(traits) => Some(traits),
            AntRole::Scout(_) => None,
        }
    }

    /// Idle and free to take a task
    pub fn is_available(&self) -> bool {
        self.state == AntState::Idle && self.task.is_none()
    }

    pub fn can_perform_task(&self, task: &Task) -> bool {
        match &self.role {
            AntRole::Worker(traits) => traits.can_perform_task(task),
            AntRole::Scout(traits) => traits.can_perform_task(task),
        }
    }

    /// Take a task and head out. An ant holds at most one task.
    pub fn assign_task(&mut self, task: TaskId) -> Result<(), Precondition> {
        if self.task.is_some() {
            return Err(Precondition::AntBusy(self.id));
        }
        self.task = Some(task);
        self.state = AntState::Traveling;
        self.trip = Trip::default();
        Ok(())
    }

    /// Drop the current task and go idle
    pub fn clear_task(&mut self) -> Option<TaskId> {
        self.state = AntState::Idle;
        self.trip = Trip::default();
        self.task.take()
    }

    /// Workers shed fatigue and go idle; scouts never tire
    pub fn rest(&mut self) {
        if let AntRole::Worker(traits) = &mut self.role {
            traits.reset_fatigue();
            self.state = AntState::Idle;
        }
    }

    /// Carry capacity after efficiency; zero for scouts
    pub fn carry_capacity(&self) -> f64 {
        match &self.role {
            AntRole::Worker(traits) => traits.carry_capacity(self.stats.capacity),
            AntRole::Scout(_) => 0.0,
        }
    }
}
