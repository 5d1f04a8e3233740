//! Worker traits - efficiency multipliers and fatigue

use serde::{Deserialize, Serialize};

use crate::entity::tasks::{Task, TaskKind};

/// Per-worker multipliers, 1.0 = baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerEfficiency {
    pub gathering: f64,
    pub carrying: f64,
    pub energy_consumption: f64,
}

impl Default for WorkerEfficiency {
    fn default() -> Self {
        Self {
            gathering: 1.0,
            carrying: 1.0,
            energy_consumption: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerTraits {
    pub efficiency: WorkerEfficiency,
    /// Grows while the worker is busy; only `reset_fatigue` lowers it
    pub fatigue: f64,
}

impl WorkerTraits {
    pub fn new(efficiency: WorkerEfficiency) -> Self {
        Self {
            efficiency,
            fatigue: 0.0,
        }
    }

    /// Extraction per second from a node with `base_rate`
    pub fn gathering_rate(&self, base_rate: f64, modifiers: &[f64]) -> f64 {
        base_rate * modifiers.iter().product::<f64>() * self.efficiency.gathering
    }

    pub fn carry_capacity(&self, capacity: f64) -> f64 {
        capacity * self.efficiency.carrying
    }

    pub fn consume_energy(&mut self, dt: f64) {
        self.fatigue += dt.max(0.0) * self.efficiency.energy_consumption;
    }

    pub fn needs_rest(&self, max_fatigue: f64) -> bool {
        self.fatigue >= max_fatigue
    }

    pub fn reset_fatigue(&mut self) {
        self.fatigue = 0.0;
    }

    /// Workers gather and build; a task is performable when its payload
    /// carries what the kind needs
    pub fn can_perform_task(&self, task: &Task) -> bool {
        match task.kind {
            TaskKind::GatherResource => task.payload.resource_kind.is_some(),
            TaskKind::BuildStructure => task.payload.building_plan.is_some(),
            TaskKind::Scout => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ResourceKind, TaskId};
    use crate::entity::tasks::TaskPriority;

    #[test]
    fn test_gathering_rate_composes_modifiers() {
        let worker = WorkerTraits::new(WorkerEfficiency {
            gathering: 1.5,
            ..Default::default()
        });
        let rate = worker.gathering_rate(2.0, &[1.2, 0.5]);
        assert!((rate - 1.8).abs() < 1e-9);
        assert_eq!(worker.gathering_rate(2.0, &[]), 3.0);
    }

    #[test]
    fn test_fatigue_accumulates_and_resets() {
        let mut worker = WorkerTraits::new(WorkerEfficiency {
            energy_consumption: 2.0,
            ..Default::default()
        });
        worker.consume_energy(10.0);
        worker.consume_energy(-5.0);
        assert_eq!(worker.fatigue, 20.0);
        assert!(worker.needs_rest(20.0));
        assert!(!worker.needs_rest(25.0));

        worker.reset_fatigue();
        assert_eq!(worker.fatigue, 0.0);
    }

    #[test]
    fn test_can_perform_task() {
        let worker = WorkerTraits::default();
        let gather = Task::gather(TaskId(1), ResourceKind::Leaves, TaskPriority::Medium);
        let build = Task::build(TaskId(2), "leaf_depot", TaskPriority::High);
        let scout = Task::scout(TaskId(3), TaskPriority::Low);
        let mut empty_gather = gather.clone();
        empty_gather.payload.resource_kind = None;

        assert!(worker.can_perform_task(&gather));
        assert!(worker.can_perform_task(&build));
        assert!(!worker.can_perform_task(&scout));
        assert!(!worker.can_perform_task(&empty_gather));
    }
}
