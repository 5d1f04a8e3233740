//! Colony world - owns every arena and exposes commands and queries
//!
//! Ants, tasks, nodes and hazards refer to each other through id handles
//! resolved against the collections held here. Presentation code reads
//! snapshots and submits intents; intents are applied at the start of the
//! next step.

use rand::Rng;

use crate::campaign::hazard::Hazard;
use crate::campaign::map::MapGraph;
use crate::campaign::route::TrailNetwork;
use crate::city::building::{Building, BuildingCatalog};
use crate::city::colony::Colony;
use crate::city::upgrade::{default_upgrades, ColonyUpgrade, UpgradeReceipt};
use crate::core::config::SimulationConfig;
use crate::core::error::{Precondition, Result};
use crate::core::types::{
    AntId, BuildingId, HazardId, NodeId, ResourceKind, SimTime, TaskId, Tick, UpgradeId,
};
use crate::entity::ant::Ant;
use crate::entity::tasks::{Task, TaskKind, TaskPayload, TaskPriority, TaskQueue};
use crate::simulation::assignment::AssignmentContext;
use crate::simulation::command::{CommandReceipt, HazardSpec, Intent};
use crate::simulation::resource_node::ResourceNode;
use crate::simulation::snapshot::ColonySnapshot;
use crate::simulation::tick::{run_simulation_step, StepReport};

#[derive(Debug)]
pub struct ColonyWorld {
    pub config: SimulationConfig,
    pub colony: Colony,
    /// Ordered by id
    pub ants: Vec<Ant>,
    pub tasks: TaskQueue,
    pub map: MapGraph,
    pub hazards: Vec<Hazard>,
    pub trails: TrailNetwork,
    pub plans: BuildingCatalog,
    pub upgrades: Vec<ColonyUpgrade>,
    time: SimTime,
    current_tick: Tick,
    pending: Vec<Intent>,
    next_ant_id: u32,
    next_task_id: u32,
    next_hazard_id: u32,
}

impl ColonyWorld {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            colony: Colony::from_config(&config),
            ants: Vec::new(),
            tasks: TaskQueue::new(),
            map: MapGraph::new(config.visibility_radius),
            hazards: Vec::new(),
            trails: TrailNetwork::new(config.trail_max_bonus, config.trail_transfers_to_max),
            plans: BuildingCatalog::with_defaults(),
            upgrades: default_upgrades(),
            time: 0.0,
            current_tick: 0,
            pending: Vec::new(),
            next_ant_id: 1,
            next_task_id: 1,
            next_hazard_id: 1,
            config,
        })
    }

    pub fn with_plans(mut self, plans: BuildingCatalog) -> Self {
        self.plans = plans;
        self
    }

    pub fn with_upgrades(mut self, upgrades: Vec<ColonyUpgrade>) -> Self {
        self.upgrades = upgrades;
        self
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Move the clock forward and return the new time
    pub(crate) fn advance_clock(&mut self, dt: f64) -> SimTime {
        self.time += dt;
        self.current_tick += 1;
        self.time
    }

    // === POPULATION ===

    fn next_ant(&mut self) -> AntId {
        let id = AntId(self.next_ant_id);
        self.next_ant_id += 1;
        id
    }

    pub fn spawn_worker(&mut self) -> AntId {
        let id = self.next_ant();
        self.ants.push(Ant::worker(id, self.config.worker_template));
        id
    }

    pub fn spawn_scout(&mut self) -> AntId {
        let id = self.next_ant();
        self.ants.push(Ant::scout(id, &self.config.scout_template));
        id
    }

    pub fn ant(&self, id: AntId) -> Option<&Ant> {
        self.ants.iter().find(|ant| ant.id == id)
    }

    fn ant_index(&self, id: AntId) -> std::result::Result<usize, Precondition> {
        self.ants
            .iter()
            .position(|ant| ant.id == id)
            .ok_or(Precondition::UnknownAnt(id))
    }

    pub fn worker_count(&self) -> usize {
        self.ants.iter().filter(|ant| ant.is_worker()).count()
    }

    pub fn add_node(&mut self, node: ResourceNode) -> Result<()> {
        self.map.add_node(node)
    }

    // === COMMANDS ===

    /// Queue an intent for the start of the next step
    pub fn submit(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    pub fn pending_intents(&self) -> &[Intent] {
        &self.pending
    }

    /// Apply every queued intent in submission order
    pub(crate) fn apply_pending(&mut self) -> Vec<Result<CommandReceipt>> {
        let intents = std::mem::take(&mut self.pending);
        intents
            .into_iter()
            .map(|intent| {
                let outcome = self.execute(intent);
                if let Err(err) = &outcome {
                    if err.is_contract_violation() {
                        tracing::warn!("Rejected intent: {}", err);
                    } else {
                        tracing::debug!("Intent not applied: {}", err);
                    }
                }
                outcome
            })
            .collect()
    }

    /// Apply one intent immediately
    pub fn execute(&mut self, intent: Intent) -> Result<CommandReceipt> {
        match intent {
            Intent::EnqueueTask {
                kind,
                priority,
                payload,
            } => self.enqueue_task(kind, priority, payload).map(CommandReceipt::TaskQueued),
            Intent::SetPriority { kind, priority } => {
                self.set_priority(kind, priority);
                Ok(CommandReceipt::PriorityChanged { kind, priority })
            }
            Intent::Build { plan, priority } => {
                let (task, paid) = self.build(&plan, priority)?;
                Ok(CommandReceipt::BuildQueued { task, paid })
            }
            Intent::RegisterBuilding(building) => {
                self.register_building(building).map(CommandReceipt::BuildingRegistered)
            }
            Intent::ApplyUpgrade(id) => self.apply_upgrade(id).map(CommandReceipt::UpgradeApplied),
            Intent::RegisterHazard(spec) => Ok(CommandReceipt::HazardRegistered(self.register_hazard(spec))),
            Intent::AssignTask { ant, task } => {
                let task = self.assign_task(ant, task)?;
                Ok(CommandReceipt::TaskAssigned { ant, task })
            }
            Intent::ClearTask(ant) => {
                let task = self.clear_task(ant)?;
                Ok(CommandReceipt::TaskCleared { ant, task })
            }
            Intent::CancelTask(id) => self.cancel_task(id).map(|task| CommandReceipt::TaskCancelled(task.id)),
            Intent::PromoteColony => Ok(CommandReceipt::ColonyPromoted(self.colony.promote())),
        }
    }

    pub fn enqueue_task(&mut self, kind: TaskKind, priority: TaskPriority, payload: TaskPayload) -> Result<TaskId> {
        if let Some(node) = payload.target_node {
            if self.map.get(node).is_none() {
                return Err(Precondition::UnknownNode(node).into());
            }
        }
        let id = TaskId(self.next_task_id);
        let mut task = Task::new(id, kind, priority);
        task.payload = payload;
        self.tasks.enqueue(task)?;
        self.next_task_id += 1;
        Ok(id)
    }

    pub fn set_priority(&mut self, kind: TaskKind, priority: TaskPriority) {
        self.tasks.set_priority(kind, priority);
    }

    /// Pay for the next building of `plan_id` and queue its construction.
    ///
    /// Buildings already standing and those still queued both raise the
    /// cost level.
    pub fn build(&mut self, plan_id: &str, priority: TaskPriority) -> Result<(TaskId, Vec<(ResourceKind, f64)>)> {
        let plan = self
            .plans
            .get(plan_id)
            .ok_or_else(|| Precondition::UnknownPlan(plan_id.to_string()))?;
        let built = self.colony.buildings().iter().filter(|b| b.plan == plan.id).count();
        let queued = self
            .tasks
            .iter()
            .filter(|t| t.payload.building_plan.as_deref() == Some(plan_id))
            .count();
        let cost = plan.cost_at((built + queued) as u32);

        self.colony.pay(&cost)?;
        let task = self.enqueue_task(
            TaskKind::BuildStructure,
            priority,
            TaskPayload {
                building_plan: Some(plan_id.to_string()),
                ..Default::default()
            },
        )?;
        tracing::info!("Started {} ({})", plan_id, task);
        Ok((task, cost))
    }

    pub fn register_building(&mut self, building: Building) -> Result<BuildingId> {
        let id = building.id;
        self.colony.register_building(building)?;
        Ok(id)
    }

    pub fn apply_upgrade(&mut self, id: UpgradeId) -> Result<UpgradeReceipt> {
        let upgrade = self
            .upgrades
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(Precondition::UnknownUpgrade(id))?;
        self.colony.apply_upgrade(upgrade)
    }

    pub fn register_hazard(&mut self, spec: HazardSpec) -> HazardId {
        let id = HazardId(self.next_hazard_id);
        self.next_hazard_id += 1;
        let hazard = spec.into_hazard(id, self.time);
        tracing::info!("{} ({:?}) active until {:.1}s", id, hazard.kind, hazard.active_until);
        self.hazards.push(hazard);
        id
    }

    /// Give an ant a specific task, or the next one it can perform
    pub fn assign_task(&mut self, ant_id: AntId, task: Option<TaskId>) -> Result<TaskId> {
        let index = self.ant_index(ant_id)?;
        if self.ants[index].task.is_some() {
            return Err(Precondition::AntBusy(ant_id).into());
        }

        let context = AssignmentContext {
            map: &self.map,
            colony: &self.colony,
            hazards: &self.hazards,
            now: self.time,
        };
        let ant = &self.ants[index];

        let (task_id, binding) = match task {
            Some(id) => {
                let task = self.tasks.get(id).ok_or(Precondition::UnknownTask(id))?;
                if task.is_assigned() {
                    return Err(Precondition::TaskAlreadyAssigned(id).into());
                }
                if !ant.can_perform_task(task) {
                    return Err(Precondition::TaskNotPerformable { ant: ant_id, task: id }.into());
                }
                let binding = match (task.kind, task.payload.target_node, task.payload.resource_kind) {
                    (_, Some(node_id), _) => {
                        let node = self.map.get(node_id).ok_or(Precondition::UnknownNode(node_id))?;
                        if context.is_blocked(node) {
                            return Err(Precondition::NodeBlocked(node_id).into());
                        }
                        None
                    }
                    (TaskKind::GatherResource, None, Some(kind)) => {
                        Some(context.closest_node(kind).ok_or(Precondition::NoReachableNode(kind))?)
                    }
                    _ => None,
                };
                self.tasks.claim(id, ant_id)?;
                (id, binding)
            }
            None => {
                let mut binding = None;
                let id = self
                    .tasks
                    .claim_next(ant_id, |task| match context.evaluate(ant, task) {
                        Some(target) => {
                            binding = target;
                            true
                        }
                        None => false,
                    })
                    .ok_or(Precondition::NoTaskAvailable(ant_id))?;
                (id, binding)
            }
        };

        if let Some(node) = binding {
            self.tasks.bind_target(task_id, node);
        }
        self.ants[index].assign_task(task_id)?;
        Ok(task_id)
    }

    /// Idle an ant. Its task, if any, counts as completed and leaves the queue.
    pub fn clear_task(&mut self, ant_id: AntId) -> Result<Option<TaskId>> {
        let index = self.ant_index(ant_id)?;
        let task = self.ants[index].clear_task();
        if let Some(id) = task {
            self.tasks.complete(id);
        }
        Ok(task)
    }

    pub fn cancel_task(&mut self, id: TaskId) -> Result<Task> {
        self.tasks.cancel(id)
    }

    // === QUERIES ===

    pub fn resource_amount(&self, kind: ResourceKind) -> f64 {
        self.colony.resource_amount(kind)
    }

    pub fn storage_limit(&self, kind: ResourceKind) -> f64 {
        self.colony.storage_limit(kind)
    }

    pub fn visible_nodes(&self) -> Vec<&ResourceNode> {
        self.map.visible_nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.map.get(id)
    }

    pub fn active_hazards(&self) -> Vec<&Hazard> {
        self.hazards.iter().filter(|h| h.is_active(self.time)).collect()
    }

    pub fn production_interval(&self) -> f64 {
        self.colony.queen.production_interval()
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot::capture(self)
    }

    // === STEP ===

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> StepReport {
        run_simulation_step(self, dt, rng)
    }
}
