//! Step system - advances the colony world by one step
//!
//! Fixed order within a step:
//! 1. advance the clock, prune expired hazards, apply queued intents
//! 2. refresh node depletion (the only place regeneration happens)
//! 3. assign tasks to idle ants
//! 4. per-ant behaviour: travel, gather, build, scout
//! 5. settlement: deliveries and task completion, maintenance, hatching

use rand::Rng;

use crate::campaign::exploration::handle_scout_exploration;
use crate::campaign::hazard::Hazard;
use crate::campaign::map::MapGraph;
use crate::campaign::route::TrailNetwork;
use crate::city::building::BuildingCatalog;
use crate::city::colony::Colony;
use crate::city::economy::{apply_maintenance, collect_modifiers, process_resource_delivery, Maintenance};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{NodeId, SimTime, TaskId, Tick};
use crate::entity::ant::{Ant, AntRole, AntState, Cargo};
use crate::entity::tasks::{Task, TaskKind};
use crate::simulation::assignment::{assign_tasks, AssignmentContext};
use crate::simulation::command::CommandReceipt;
use crate::simulation::events::SimulationEvent;
use crate::simulation::resource_node::ResourceNode;
use crate::simulation::world::ColonyWorld;

/// Everything that happened during one step
#[derive(Debug)]
pub struct StepReport {
    pub tick: Tick,
    pub time: SimTime,
    /// One outcome per intent applied at the start of the step
    pub commands: Vec<Result<CommandReceipt>>,
    pub events: Vec<SimulationEvent>,
    pub maintenance: Maintenance,
}

/// Shared read-only state for per-ant behaviour
struct StepContext<'a> {
    hazards: &'a [Hazard],
    trails: &'a TrailNetwork,
    plans: &'a BuildingCatalog,
    config: &'a SimulationConfig,
    now: SimTime,
    dt: f64,
}

impl StepContext<'_> {
    fn active_hazards_at<'n>(&'n self, node: &'n ResourceNode) -> impl Iterator<Item = &'n Hazard> + 'n {
        let now = self.now;
        self.hazards
            .iter()
            .filter(move |h| h.is_active(now) && h.affects_node(node))
    }

    fn is_blocked(&self, node: &ResourceNode) -> bool {
        self.active_hazards_at(node).any(|h| h.effect.block_node)
    }

    /// Travel speed on the route to `node`
    fn route_speed(&self, ant: &Ant, node: &ResourceNode) -> f64 {
        let hazard_factor: f64 = self.active_hazards_at(node).map(Hazard::speed_modifier).product();
        ant.stats.speed * hazard_factor * self.trails.speed_bonus(node.id)
    }
}

/// An ant that got home and whose task is done
struct Arrival {
    index: usize,
    task: TaskId,
    node: Option<NodeId>,
}

pub fn run_simulation_step<R: Rng + ?Sized>(world: &mut ColonyWorld, dt: f64, rng: &mut R) -> StepReport {
    let dt = if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        tracing::warn!("Ignoring invalid step length {}", dt);
        0.0
    };
    let now = world.advance_clock(dt);
    let mut events = Vec::new();

    prune_hazards(&mut world.hazards, now, &mut events);
    let commands = world.apply_pending();
    refresh_nodes(&mut world.map, now, rng, &mut events);

    let context = AssignmentContext {
        map: &world.map,
        colony: &world.colony,
        hazards: &world.hazards,
        now,
    };
    let assigned = assign_tasks(&mut world.ants, &mut world.tasks, &context, world.config.max_fatigue);
    events.extend(assigned);

    let arrivals = advance_ants(world, dt, now, rng, &mut events);
    let maintenance = settle(world, arrivals, dt, now, rng, &mut events);

    tracing::debug!(
        "Step {} at {:.1}s: {} events, {} ants",
        world.current_tick(),
        now,
        events.len(),
        world.ants.len()
    );

    StepReport {
        tick: world.current_tick(),
        time: now,
        commands,
        events,
        maintenance,
    }
}

fn prune_hazards(hazards: &mut Vec<Hazard>, now: SimTime, events: &mut Vec<SimulationEvent>) {
    hazards.retain(|hazard| {
        if hazard.is_active(now) {
            return true;
        }
        tracing::debug!("{} expired", hazard.id);
        events.push(SimulationEvent::HazardExpired { hazard: hazard.id });
        false
    });
}

fn refresh_nodes<R: Rng + ?Sized>(map: &mut MapGraph, now: SimTime, rng: &mut R, events: &mut Vec<SimulationEvent>) {
    for node in map.nodes_mut() {
        let cooling = node.depleted_until().is_some();
        if !node.is_depleted(now, rng) && cooling {
            events.push(SimulationEvent::NodeRegenerated {
                node: node.id,
                richness: node.richness,
            });
        }
    }
}

fn advance_ants<R: Rng + ?Sized>(
    world: &mut ColonyWorld,
    dt: f64,
    now: SimTime,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Vec<Arrival> {
    let ColonyWorld {
        ants,
        tasks,
        map,
        colony,
        hazards,
        trails,
        plans,
        config,
        ..
    } = world;
    let context = StepContext {
        hazards: hazards.as_slice(),
        trails: &*trails,
        plans: &*plans,
        config: &*config,
        now,
        dt,
    };

    let mut arrivals = Vec::new();
    for (index, ant) in ants.iter_mut().enumerate() {
        let Some(task_id) = ant.task else {
            continue;
        };
        let Some(task) = tasks.get(task_id) else {
            tracing::warn!("{} held unknown {}", ant.id, task_id);
            ant.clear_task();
            continue;
        };

        if let Some(traits) = ant.worker_traits_mut() {
            traits.consume_energy(dt);
        }

        let done = match task.kind {
            TaskKind::GatherResource => advance_gatherer(ant, task, map, colony, &context, rng, events),
            TaskKind::BuildStructure => advance_builder(ant, task, colony, &context, events),
            TaskKind::Scout => advance_scout(ant, map, &context, rng, events),
        };
        if done {
            arrivals.push(Arrival {
                index,
                task: task_id,
                node: task.payload.target_node,
            });
        }
    }
    arrivals
}

/// Returns true once the ant is back home
fn advance_gatherer<R: Rng + ?Sized>(
    ant: &mut Ant,
    task: &Task,
    map: &mut MapGraph,
    colony: &Colony,
    context: &StepContext<'_>,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> bool {
    let node = match task.payload.target_node {
        Some(id) => map.get_mut(id),
        None => None,
    };
    let Some(node) = node else {
        return true;
    };
    let speed = context.route_speed(ant, node);

    match ant.state {
        AntState::Traveling => {
            if context.is_blocked(node) || !node.is_available() {
                tracing::debug!("{} turns back from {}", ant.id, node.id);
                ant.state = AntState::Returning;
                return false;
            }
            ant.trip.position = (ant.trip.position + speed * context.dt).min(node.distance_to_colony);
            if ant.trip.position >= node.distance_to_colony {
                ant.state = AntState::Gathering;
            }
            false
        }
        AntState::Gathering => {
            gather(ant, node, colony, context, rng, events);
            false
        }
        AntState::Carrying | AntState::Returning => {
            ant.trip.position = (ant.trip.position - speed * context.dt).max(0.0);
            ant.trip.position <= 0.0
        }
        AntState::Idle => true,
    }
}

fn gather<R: Rng + ?Sized>(
    ant: &mut Ant,
    node: &mut ResourceNode,
    colony: &Colony,
    context: &StepContext<'_>,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) {
    let held = ant.trip.cargo_amount();
    let heading_home = if held > 0.0 {
        AntState::Carrying
    } else {
        AntState::Returning
    };
    if context.is_blocked(node) || !node.is_available() {
        ant.state = heading_home;
        return;
    }

    let capacity = ant.carry_capacity();
    let remaining = (capacity - held).max(0.0);
    let AntRole::Worker(worker) = &ant.role else {
        ant.state = heading_home;
        return;
    };
    if remaining <= 0.0 {
        ant.state = heading_home;
        return;
    }

    let modifiers = collect_modifiers(colony, node.kind);
    let rate = worker.gathering_rate(node.base_extraction_rate, &modifiers);
    if rate <= 0.0 {
        tracing::debug!("{} cannot extract from {}", ant.id, node.id);
        ant.state = heading_home;
        return;
    }

    // Stop the clock once the load is full
    let window = context.dt.min(remaining / rate);
    let gathered = node.extract(worker, window, &modifiers, context.now, rng);

    if gathered > 0.0 {
        ant.trip.cargo = Some(Cargo {
            kind: node.kind,
            amount: held + gathered,
        });
        events.push(SimulationEvent::ResourceGathered {
            ant: ant.id,
            node: node.id,
            kind: node.kind,
            amount: gathered,
        });
    }
    if !node.is_available() {
        tracing::debug!("{} depleted (richness {:.1})", node.id, node.richness);
        events.push(SimulationEvent::NodeDepleted { node: node.id });
    }

    let full = ant.trip.cargo_amount() >= capacity - 1e-9;
    if full || !node.is_available() {
        ant.state = if ant.trip.cargo_amount() > 0.0 {
            AntState::Carrying
        } else {
            AntState::Returning
        };
    }
}

/// Builders work on site until the plan's build time is reached
fn advance_builder(
    ant: &mut Ant,
    task: &Task,
    colony: &mut Colony,
    context: &StepContext<'_>,
    events: &mut Vec<SimulationEvent>,
) -> bool {
    let Some(plan) = task
        .payload
        .building_plan
        .as_deref()
        .and_then(|id| context.plans.get(id))
    else {
        tracing::warn!("{} has no known building plan", task.id);
        return true;
    };

    ant.trip.work_done += context.dt;
    if ant.trip.work_done < plan.build_time {
        return false;
    }

    let level = colony.buildings().iter().filter(|b| b.plan == plan.id).count() as u32;
    let building = plan.construct(level);
    let building_id = building.id;
    match colony.register_building(building) {
        Ok(()) => {
            tracing::info!("{} finished {} (level {})", ant.id, plan.name, level + 1);
            events.push(SimulationEvent::BuildingCompleted {
                ant: ant.id,
                building: building_id,
                plan: plan.id.clone(),
            });
        }
        Err(err) => tracing::warn!("Could not register {}: {}", plan.name, err),
    }
    true
}

/// Scouts walk out to their detection radius, explore, and walk back
fn advance_scout<R: Rng + ?Sized>(
    ant: &mut Ant,
    map: &mut MapGraph,
    context: &StepContext<'_>,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> bool {
    let AntRole::Scout(traits) = ant.role.clone() else {
        return true;
    };
    let step = ant.stats.speed * context.dt;

    match ant.state {
        AntState::Traveling => {
            ant.trip.position += step;
            if ant.trip.position >= traits.detection_radius {
                ant.trip.position = traits.detection_radius;
                let outcome =
                    handle_scout_exploration(map, &traits, rng, context.config.rich_node_threshold);
                if outcome.discovered_rich_node {
                    tracing::info!("{} reports a rich node", ant.id);
                }
                events.push(SimulationEvent::AreaExplored {
                    ant: ant.id,
                    visibility_radius: outcome.visibility_radius,
                    discovered_rich_node: outcome.discovered_rich_node,
                });
                ant.trip.explored = true;
                ant.state = AntState::Returning;
            }
            false
        }
        AntState::Idle => true,
        _ => {
            ant.trip.position = (ant.trip.position - step).max(0.0);
            ant.trip.position <= 0.0
        }
    }
}

fn settle<R: Rng + ?Sized>(
    world: &mut ColonyWorld,
    arrivals: Vec<Arrival>,
    dt: f64,
    now: SimTime,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Maintenance {
    for arrival in arrivals {
        let ant = &mut world.ants[arrival.index];
        let cargo = ant.trip.cargo.take();

        if let (Some(cargo), Some(node_id)) = (cargo, arrival.node) {
            let lost_to = world.map.get(node_id).and_then(|node| {
                world
                    .hazards
                    .iter()
                    .filter(|h| h.is_active(now) && h.affects_node(node))
                    .find(|h| h.roll_cargo_loss(rng))
                    .map(|h| h.id)
            });

            match lost_to {
                Some(hazard) => {
                    tracing::debug!("{} lost {:.1} {} to {}", ant.id, cargo.amount, cargo.kind, hazard);
                    events.push(SimulationEvent::CargoLost {
                        ant: ant.id,
                        hazard,
                        kind: cargo.kind,
                        amount: cargo.amount,
                    });
                }
                None => {
                    let delivery = process_resource_delivery(&mut world.colony, cargo.kind, cargo.amount);
                    if delivery.overflow > 0.0 {
                        tracing::debug!("{} overflow: {:.1} lost", cargo.kind, delivery.overflow);
                    }
                    events.push(SimulationEvent::ResourceDelivered {
                        ant: ant.id,
                        kind: cargo.kind,
                        stored: delivery.stored,
                        overflow: delivery.overflow,
                    });
                    world.trails.record_transfer(node_id);
                }
            }
        }

        let ant_id = ant.id;
        ant.clear_task();
        world.tasks.complete(arrival.task);
        events.push(SimulationEvent::TaskCompleted {
            ant: ant_id,
            task: arrival.task,
        });
    }

    let workers = world.worker_count();
    let maintenance = apply_maintenance(&mut world.colony, workers, dt / 60.0);
    if maintenance.required > 0.0 {
        events.push(SimulationEvent::MaintenancePaid {
            required: maintenance.required,
            paid: maintenance.paid,
            ratio: maintenance.ratio,
        });
    }
    if maintenance.ratio < 1.0 {
        tracing::warn!(
            "Nectar shortage: covered {:.0}% of upkeep",
            maintenance.ratio * 100.0
        );
    }

    let hatched = world.colony.queen.advance_production(dt, maintenance.ratio);
    for _ in 0..hatched {
        let ant = world.spawn_worker();
        tracing::info!("Queen hatched {}", ant);
        events.push(SimulationEvent::WorkerHatched { ant });
    }

    maintenance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AntId, ResourceKind};
    use crate::entity::tasks::{TaskPayload, TaskPriority};
    use crate::simulation::command::{HazardSpec, Intent};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_with_node(distance: f64) -> ColonyWorld {
        let mut world = ColonyWorld::new(SimulationConfig::default()).unwrap();
        world
            .add_node(ResourceNode::new(NodeId(1), ResourceKind::Leaves, 100.0, 1.0).with_distance(distance))
            .unwrap();
        world
    }

    fn gather(world: &mut ColonyWorld) -> TaskId {
        world
            .enqueue_task(
                TaskKind::GatherResource,
                TaskPriority::Medium,
                TaskPayload {
                    resource_kind: Some(ResourceKind::Leaves),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn test_gather_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        let ant = world.spawn_worker();
        let task = gather(&mut world);
        let leaves_before = world.resource_amount(ResourceKind::Leaves);

        let mut delivered = 0.0;
        for _ in 0..20 {
            let report = world.step(1.0, &mut rng);
            for event in &report.events {
                if let SimulationEvent::ResourceDelivered { stored, .. } = event {
                    delivered += stored;
                }
            }
            if world.tasks.get(task).is_none() {
                break;
            }
        }

        assert!(world.tasks.get(task).is_none());
        assert_eq!(world.ant(ant).unwrap().state, AntState::Idle);
        // Default workers carry 5 units
        assert!((delivered - 5.0).abs() < 1e-9);
        assert!((world.resource_amount(ResourceKind::Leaves) - leaves_before - 5.0).abs() < 1e-9);
        assert!((world.node(NodeId(1)).unwrap().richness - 95.0).abs() < 1e-9);
        assert_eq!(world.trails.get(NodeId(1)).unwrap().transfers, 1);
    }

    #[test]
    fn test_intents_apply_at_step_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.spawn_worker();
        world.submit(Intent::EnqueueTask {
            kind: TaskKind::GatherResource,
            priority: TaskPriority::High,
            payload: TaskPayload {
                resource_kind: Some(ResourceKind::Leaves),
                ..Default::default()
            },
        });
        world.submit(Intent::CancelTask(TaskId(77)));

        let report = world.step(1.0, &mut rng);
        assert_eq!(report.commands.len(), 2);
        assert!(matches!(report.commands[0], Ok(CommandReceipt::TaskQueued(_))));
        assert!(report.commands[1].as_ref().unwrap_err().is_precondition());
        // The new task was assignable in the same step
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, SimulationEvent::TaskAssigned { ant: AntId(1), .. })));
    }

    #[test]
    fn test_predator_keeps_workers_home() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.spawn_worker();
        world.register_hazard(HazardSpec::Predator {
            area_radius: 5.0,
            duration: 3.0,
        });
        let task = gather(&mut world);

        world.step(1.0, &mut rng);
        assert!(!world.tasks.get(task).unwrap().is_assigned());

        // Active through t = 3, pruned at the start of the step reaching t = 4
        world.step(1.0, &mut rng);
        world.step(1.0, &mut rng);
        let report = world.step(1.0, &mut rng);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, SimulationEvent::HazardExpired { .. })));
        assert!(world.tasks.get(task).unwrap().is_assigned());
    }

    #[test]
    fn test_rain_slows_travel() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(5.0);
        let ant = world.spawn_worker();
        world.register_hazard(HazardSpec::Weather {
            weather: crate::campaign::weather::WeatherKind::Rain,
            duration: 100.0,
        });
        gather(&mut world);

        world.step(2.0, &mut rng);
        // speed 1.5 * rain 0.7 * 2s
        assert!((world.ant(ant).unwrap().trip.position - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_build_completes_after_build_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.spawn_worker();
        world.colony.set_resource_amount(ResourceKind::Leaves, 100.0);
        let (task, _) = world.build("leaf_depot", TaskPriority::High).unwrap();
        let limit_before = world.storage_limit(ResourceKind::Leaves);

        for _ in 0..15 {
            world.step(1.0, &mut rng);
        }
        assert!(world.tasks.get(task).is_none());
        assert_eq!(world.colony.buildings().len(), 1);
        assert_eq!(world.storage_limit(ResourceKind::Leaves), limit_before + 60.0);
    }

    #[test]
    fn test_scout_reveals_and_returns() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        let scout = world.spawn_scout();
        let task = world
            .enqueue_task(TaskKind::Scout, TaskPriority::Low, TaskPayload::default())
            .unwrap();
        let radius_before = world.map.visibility_radius();

        // speed 3, detection radius 3: out in one step, back in the next
        let first = world.step(1.0, &mut rng);
        assert!(first
            .events
            .iter()
            .any(|e| matches!(e, SimulationEvent::AreaExplored { .. })));
        assert_eq!(world.map.visibility_radius(), radius_before + 3.0);

        world.step(1.0, &mut rng);
        assert!(world.tasks.get(task).is_none());
        assert!(world.ant(scout).unwrap().is_available());
    }

    #[test]
    fn test_queen_hatches_workers() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.colony.set_resource_amount(ResourceKind::Nectar, 100.0);

        let report = world.step(30.0, &mut rng);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, SimulationEvent::WorkerHatched { .. })));
        assert_eq!(world.worker_count(), 1);
    }

    #[test]
    fn test_starving_colony_slows_queen() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.colony.set_resource_amount(ResourceKind::Nectar, 0.0);
        for _ in 0..4 {
            world.spawn_worker();
        }

        let report = world.step(30.0, &mut rng);
        assert_eq!(report.maintenance.ratio, 0.0);
        assert_eq!(world.worker_count(), 4);
        assert_eq!(world.colony.queen.progress, 0.0);
    }

    #[test]
    fn test_scouts_cost_no_upkeep() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = world_with_node(3.0);
        world.colony.queen.worker_maintenance_cost = 0.5;
        world.colony.set_resource_amount(ResourceKind::Nectar, 100.0);
        for _ in 0..4 {
            world.spawn_worker();
        }
        world.spawn_scout();

        let report = world.step(60.0, &mut rng);
        assert!((report.maintenance.required - 2.0).abs() < 1e-9);
        assert_eq!(report.maintenance.ratio, 1.0);
    }

    #[test]
    fn test_barren_node_sends_gatherer_home() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = ColonyWorld::new(SimulationConfig::default()).unwrap();
        world
            .add_node(ResourceNode::new(NodeId(1), ResourceKind::Leaves, 100.0, 0.0).with_distance(1.0))
            .unwrap();
        let ant = world.spawn_worker();
        let task = gather(&mut world);

        for _ in 0..6 {
            world.step(1.0, &mut rng);
        }
        assert!(world.tasks.get(task).is_none());
        assert!(world.ant(ant).unwrap().is_available());
        assert_eq!(world.node(NodeId(1)).unwrap().richness, 100.0);
    }
}
