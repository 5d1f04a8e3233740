//! The colony - resource pool, storage caps, buildings, upgrades and the queen

use serde::{Deserialize, Serialize};

use crate::city::building::Building;
use crate::city::stockpile::{ResourcePool, StorageLimits};
use crate::city::upgrade::{ColonyUpgrade, UpgradeReceipt};
use crate::core::config::SimulationConfig;
use crate::core::error::{ContractViolation, Precondition, Result};
use crate::core::types::{ResourceKind, UpgradeId};
use crate::entity::queen::Queen;
use crate::simulation::resource_node::ResourceNode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub queen: Queen,
    pub level: u32,
    resources: ResourcePool,
    storage_limits: StorageLimits,
    /// Insertion order is application order
    buildings: Vec<Building>,
    applied_upgrades: Vec<UpgradeId>,
    influence_radius: f64,
}

impl Colony {
    pub fn new(queen: Queen) -> Self {
        Self {
            queen,
            level: 1,
            resources: ResourcePool::new(),
            storage_limits: StorageLimits::new(),
            buildings: Vec::new(),
            applied_upgrades: Vec::new(),
            influence_radius: 10.0,
        }
    }

    /// Build the session colony from configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut colony = Self::new(Queen::new(config.queen));
        colony.level = config.colony_level.max(1);
        colony.influence_radius = config.influence_radius.max(1.0);
        for limit in &config.storage_limits {
            colony.storage_limits.set(limit.resource, limit.amount);
        }
        for entry in &config.starting_resources {
            colony.resources.add(entry.resource, entry.amount);
        }
        colony
    }

    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }

    pub fn storage_limits(&self) -> &StorageLimits {
        &self.storage_limits
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub(crate) fn buildings_mut(&mut self) -> &mut [Building] {
        &mut self.buildings
    }

    pub fn applied_upgrades(&self) -> &[UpgradeId] {
        &self.applied_upgrades
    }

    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    pub fn resource_amount(&self, resource: ResourceKind) -> f64 {
        self.resources.get(resource)
    }

    /// Overwrite a pool entry, clamped at zero
    pub fn set_resource_amount(&mut self, resource: ResourceKind, amount: f64) {
        self.resources.set(resource, amount);
    }

    pub fn storage_limit(&self, resource: ResourceKind) -> f64 {
        self.storage_limits.get(resource)
    }

    pub fn add_storage_capacity(&mut self, resource: ResourceKind, amount: f64) {
        self.storage_limits.increase(resource, amount);
    }

    /// Whether `amount` fits without breaching the cap
    pub fn can_store(&self, resource: ResourceKind, amount: f64) -> bool {
        let limit = self.storage_limit(resource);
        limit <= 0.0 || self.resource_amount(resource) + amount <= limit
    }

    /// Store as much as fits, returns the amount actually stored
    pub fn deposit_resource(&mut self, resource: ResourceKind, amount: f64) -> f64 {
        let limit = self.storage_limit(resource);
        if limit <= 0.0 {
            self.resources.add(resource, amount);
            return amount;
        }
        let space = (limit - self.resource_amount(resource)).max(0.0);
        let stored = space.min(amount);
        self.resources.add(resource, stored);
        stored
    }

    /// Store up to the cap and return the part that was lost
    pub fn lose_overflow(&mut self, resource: ResourceKind, amount: f64) -> f64 {
        let limit = self.storage_limit(resource);
        let total = self.resource_amount(resource) + amount;
        if limit > 0.0 && total > limit {
            self.resources.set(resource, limit);
            return total - limit;
        }
        self.resources.set(resource, total);
        0.0
    }

    pub fn can_afford(&self, cost: &[(ResourceKind, f64)]) -> bool {
        self.resources.has_materials(cost)
    }

    /// Debit every entry of `cost`, or fail without touching the pool
    pub fn pay(&mut self, cost: &[(ResourceKind, f64)]) -> Result<()> {
        if let Some((kind, needed)) = cost
            .iter()
            .find(|(kind, amount)| self.resource_amount(*kind) < *amount)
        {
            return Err(Precondition::InsufficientResources {
                kind: *kind,
                needed: *needed,
                available: self.resource_amount(*kind),
            }
            .into());
        }
        self.resources.consume_materials(cost);
        Ok(())
    }

    /// Register a building and apply its effects exactly once.
    ///
    /// A second registration of the same building id is a contract
    /// violation and leaves the colony untouched.
    pub fn register_building(&mut self, building: Building) -> Result<()> {
        if self.buildings.iter().any(|b| b.id == building.id) {
            return Err(ContractViolation::BuildingAlreadyApplied(building.id).into());
        }
        building.apply_to_colony(self);
        tracing::debug!("Registered {} ({})", building.name, building.id);
        self.buildings.push(building);
        Ok(())
    }

    /// Apply (or re-apply, raising its level) a colony upgrade
    pub fn apply_upgrade(&mut self, upgrade: &mut ColonyUpgrade) -> Result<UpgradeReceipt> {
        let receipt = upgrade.apply(self)?;
        if !self.applied_upgrades.contains(&upgrade.id) {
            self.applied_upgrades.push(upgrade.id);
        }
        Ok(receipt)
    }

    /// Raise the colony level by one and return the new level
    pub fn promote(&mut self) -> u32 {
        self.level += 1;
        tracing::info!("Colony promoted to level {}", self.level);
        self.level
    }

    /// Nectar per minute needed to feed `worker_count` ants
    pub fn worker_maintenance_per_minute(&self, worker_count: usize) -> f64 {
        let nectar_per_minute = worker_count as f64 * self.queen.worker_maintenance_cost;
        let modifier: f64 = self.buildings.iter().map(|b| b.maintenance_modifier()).product();
        nectar_per_minute * modifier
    }

    pub fn adjust_influence_radius(&mut self, delta: f64) {
        self.influence_radius = (self.influence_radius + delta).max(1.0);
    }

    pub fn is_within_influence(&self, node: &ResourceNode) -> bool {
        node.distance_to_colony <= self.influence_radius
    }

    pub fn accessible_nodes<'a>(
        &self,
        nodes: impl IntoIterator<Item = &'a ResourceNode>,
    ) -> Vec<&'a ResourceNode> {
        nodes
            .into_iter()
            .filter(|node| self.is_within_influence(node))
            .collect()
    }
}
