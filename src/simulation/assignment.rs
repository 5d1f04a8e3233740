//! Task assignment system - matches idle ants to queued tasks
//!
//! Each idle ant scans the queue in dispatch order and claims the first
//! task it can perform whose target is not blocked by an active hazard.
//! Unbound gather tasks are bound to the closest reachable node of the
//! requested kind at claim time. Ants that find nothing stay idle; the
//! next step scans again.

use ordered_float::OrderedFloat;

use crate::campaign::hazard::Hazard;
use crate::campaign::map::MapGraph;
use crate::city::colony::Colony;
use crate::core::types::{NodeId, ResourceKind, SimTime};
use crate::entity::ant::Ant;
use crate::entity::tasks::{Task, TaskKind, TaskQueue};
use crate::simulation::events::SimulationEvent;
use crate::simulation::resource_node::ResourceNode;

/// Read-only view of everything assignment consults
pub struct AssignmentContext<'a> {
    pub map: &'a MapGraph,
    pub colony: &'a Colony,
    pub hazards: &'a [Hazard],
    pub now: SimTime,
}

impl AssignmentContext<'_> {
    /// Blocked by any hazard active at `now`
    pub fn is_blocked(&self, node: &ResourceNode) -> bool {
        self.hazards
            .iter()
            .any(|hazard| hazard.is_active(self.now) && hazard.blocks(node))
    }

    /// Whether a worker could be sent to `node` right now
    pub fn is_reachable(&self, node: &ResourceNode) -> bool {
        node.is_available()
            && self.map.is_visible(node)
            && self.colony.is_within_influence(node)
            && !self.is_blocked(node)
    }

    /// Closest reachable node of `kind`; ties go to registry order
    pub fn closest_node(&self, kind: ResourceKind) -> Option<NodeId> {
        self.map
            .nodes()
            .iter()
            .filter(|node| node.kind == kind && self.is_reachable(node))
            .min_by_key(|node| OrderedFloat(node.distance_to_colony))
            .map(|node| node.id)
    }

    /// `None` when `ant` may not take `task`; otherwise the node the task
    /// ends up bound to
    pub fn evaluate(&self, ant: &Ant, task: &Task) -> Option<Option<NodeId>> {
        if !ant.can_perform_task(task) {
            return None;
        }
        match task.payload.target_node {
            Some(id) => {
                let node = self.map.get(id)?;
                if self.is_blocked(node) {
                    return None;
                }
                Some(Some(id))
            }
            None if task.kind == TaskKind::GatherResource => {
                let kind = task.payload.resource_kind?;
                self.closest_node(kind).map(Some)
            }
            None => Some(None),
        }
    }
}

/// Claim tasks for every idle ant, in ant order.
///
/// Fatigued workers rest instead of taking work.
pub fn assign_tasks(
    ants: &mut [Ant],
    queue: &mut TaskQueue,
    context: &AssignmentContext<'_>,
    max_fatigue: f64,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    for ant in ants.iter_mut().filter(|ant| ant.is_available()) {
        let fatigued = ant
            .worker_traits()
            .map_or(false, |traits| traits.needs_rest(max_fatigue));
        if fatigued {
            ant.rest();
            tracing::debug!("{} rests", ant.id);
            events.push(SimulationEvent::WorkerRested { ant: ant.id });
            continue;
        }

        let mut binding = None;
        let claimed = queue.claim_next(ant.id, |task| match context.evaluate(ant, task) {
            Some(target) => {
                binding = target;
                true
            }
            None => false,
        });
        let Some(task) = claimed else {
            continue;
        };

        if let Some(node) = binding {
            queue.bind_target(task, node);
        }
        // The ant is available, so it holds no task
        if ant.assign_task(task).is_ok() {
            tracing::debug!("{} took {}", ant.id, task);
            events.push(SimulationEvent::TaskAssigned {
                ant: ant.id,
                task,
                node: binding,
            });
        }
    }

    events
}
