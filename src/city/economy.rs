//! Economy system - extraction, delivery, maintenance and cost formulas
//!
//! Everything here is a pure function over explicitly passed state. Modifier
//! composition is a fold over the colony's buildings at call time, so the
//! result of a step depends only on its inputs.

use serde::{Deserialize, Serialize};

use crate::city::colony::Colony;
use crate::core::types::ResourceKind;
use crate::entity::worker::WorkerTraits;
use crate::simulation::resource_node::ResourceNode;

/// Inputs for an aggregate extraction estimate
pub struct EconomyContext<'a> {
    pub colony: &'a Colony,
    pub workers: &'a [&'a WorkerTraits],
    pub node: &'a ResourceNode,
    pub dt: f64,
}

/// Split of a delivery between storage and loss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub stored: f64,
    pub overflow: f64,
}

/// Outcome of a maintenance debit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    /// Nectar the colony needed for the period
    pub required: f64,
    /// Nectar actually debited
    pub paid: f64,
    /// Coverage in [0, 1]; 1.0 when fully fed
    pub ratio: f64,
}

pub fn production_interval(colony: &Colony) -> f64 {
    colony.queen.production_interval()
}

/// Active multiplicative modifiers for extracting `kind`
pub fn collect_modifiers(colony: &Colony, kind: ResourceKind) -> Vec<f64> {
    let mut modifiers = Vec::new();
    for building in colony.buildings() {
        let speed = building.worker_speed_modifier();
        if speed != 1.0 {
            modifiers.push(speed);
        }
        if kind == ResourceKind::Leaves {
            let capacity = building.carrying_capacity_modifier();
            if capacity != 1.0 {
                modifiers.push(capacity);
            }
        }
    }
    modifiers
}

/// Total amount the given workers would pull from the node over `dt`,
/// capped by what the node has left
pub fn calculate_resource_extraction(context: &EconomyContext<'_>) -> f64 {
    if context.node.richness <= 0.0 {
        return 0.0;
    }
    let modifiers = collect_modifiers(context.colony, context.node.kind);
    let total_rate: f64 = context
        .workers
        .iter()
        .map(|worker| worker.gathering_rate(context.node.base_extraction_rate, &modifiers))
        .sum();
    (total_rate * context.dt).max(0.0).min(context.node.richness)
}

/// Store a delivery, reporting whatever exceeded the cap as overflow
pub fn process_resource_delivery(colony: &mut Colony, kind: ResourceKind, amount: f64) -> Delivery {
    if colony.can_store(kind, amount) {
        let stored = colony.deposit_resource(kind, amount);
        return Delivery {
            stored,
            overflow: amount - stored,
        };
    }
    let overflow = colony.lose_overflow(kind, amount);
    Delivery {
        stored: amount - overflow,
        overflow,
    }
}

pub fn calculate_upgrade_cost(base_cost: f64, growth_coefficient: f64, level: u32) -> f64 {
    (base_cost * growth_coefficient.powi(level as i32)).round()
}

/// Debit nectar upkeep for `worker_count` ants over `minutes`
pub fn apply_maintenance(colony: &mut Colony, worker_count: usize, minutes: f64) -> Maintenance {
    let required = colony.worker_maintenance_per_minute(worker_count) * minutes;
    let available = colony.resource_amount(ResourceKind::Nectar);

    if available >= required {
        colony.set_resource_amount(ResourceKind::Nectar, available - required);
        return Maintenance {
            required,
            paid: required,
            ratio: 1.0,
        };
    }

    colony.set_resource_amount(ResourceKind::Nectar, 0.0);
    Maintenance {
        required,
        paid: available,
        ratio: available / required,
    }
}
