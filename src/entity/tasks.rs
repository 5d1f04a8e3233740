//! Task queue - colony-wide prioritised backlog
//!
//! Tasks are matched at most once and dropped on completion; nothing is
//! kept for history.

use std::cmp::Reverse;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{ContractViolation, Precondition, Result};
use crate::core::types::{AntId, NodeId, ResourceKind, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    GatherResource,
    BuildStructure,
    Scout,
}

/// Task priority levels with explicit ordering values
///
/// Higher numeric value = higher priority.
/// This ordering is relied upon by TaskQueue when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub resource_kind: Option<ResourceKind>,
    pub target_node: Option<NodeId>,
    pub building_plan: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub priority: TaskPriority,
    pub payload: TaskPayload,
    /// Ant holding the task, if claimed
    pub assigned: Option<AntId>,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind, priority: TaskPriority) -> Self {
        Self {
            id,
            kind,
            priority,
            payload: TaskPayload::default(),
            assigned: None,
        }
    }

    pub fn gather(id: TaskId, resource: ResourceKind, priority: TaskPriority) -> Self {
        let mut task = Self::new(id, TaskKind::GatherResource, priority);
        task.payload.resource_kind = Some(resource);
        task
    }

    pub fn build(id: TaskId, plan: impl Into<String>, priority: TaskPriority) -> Self {
        let mut task = Self::new(id, TaskKind::BuildStructure, priority);
        task.payload.building_plan = Some(plan.into());
        task
    }

    pub fn scout(id: TaskId, priority: TaskPriority) -> Self {
        Self::new(id, TaskKind::Scout, priority)
    }

    pub fn with_target(mut self, node: NodeId) -> Self {
        self.payload.target_node = Some(node);
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }

    /// Reject payloads that do not fit the task kind
    pub fn validate(&self) -> std::result::Result<(), ContractViolation> {
        let reason = match self.kind {
            TaskKind::GatherResource if self.payload.resource_kind.is_none() => {
                "gather task without a resource kind"
            }
            TaskKind::BuildStructure if self.payload.building_plan.is_none() => {
                "build task without a building plan"
            }
            _ => return Ok(()),
        };
        Err(ContractViolation::InconsistentPayload {
            task: self.id,
            reason,
        })
    }
}

fn effective_priority(overrides: &AHashMap<TaskKind, TaskPriority>, task: &Task) -> TaskPriority {
    overrides.get(&task.kind).copied().unwrap_or(task.priority)
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<Task>,
    overrides: AHashMap<TaskKind, TaskPriority>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn unassigned_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_assigned()).count()
    }

    pub fn effective_priority(&self, task: &Task) -> TaskPriority {
        effective_priority(&self.overrides, task)
    }

    pub fn priority_override(&self, kind: TaskKind) -> Option<TaskPriority> {
        self.overrides.get(&kind).copied()
    }

    fn sort(&mut self) {
        let overrides = &self.overrides;
        // sort_by_key is stable: equal priorities keep insertion order
        self.tasks
            .sort_by_key(|task| Reverse(effective_priority(overrides, task) as u8));
    }

    pub fn enqueue(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        tracing::debug!("Queued {} ({:?}, {:?})", task.id, task.kind, task.priority);
        self.tasks.push(task);
        self.sort();
        Ok(())
    }

    /// Override the priority of every task of `kind`
    pub fn set_priority(&mut self, kind: TaskKind, priority: TaskPriority) {
        self.overrides.insert(kind, priority);
        self.sort();
    }

    /// Claim the first unassigned task that `accept` agrees to
    pub fn claim_next(&mut self, ant: AntId, mut accept: impl FnMut(&Task) -> bool) -> Option<TaskId> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| !task.is_assigned() && accept(task))?;
        task.assigned = Some(ant);
        Some(task.id)
    }

    /// Claim a specific task for `ant`
    pub fn claim(&mut self, id: TaskId, ant: AntId) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Precondition::UnknownTask(id))?;
        if task.is_assigned() {
            return Err(Precondition::TaskAlreadyAssigned(id).into());
        }
        task.assigned = Some(ant);
        Ok(())
    }

    pub fn bind_target(&mut self, id: TaskId, node: NodeId) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.payload.target_node = Some(node);
        }
    }

    /// Remove a finished task for good
    pub fn complete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Remove a task nobody holds yet
    pub fn cancel(&mut self, id: TaskId) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Precondition::UnknownTask(id))?;
        if self.tasks[index].is_assigned() {
            return Err(Precondition::TaskAlreadyAssigned(id).into());
        }
        Ok(self.tasks.remove(index))
    }
}
