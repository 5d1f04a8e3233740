//! Stockpile - colony-level resource pool and storage caps

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::ResourceKind;

/// Quantities held by the colony, one entry per resource kind
///
/// Amounts are never negative; every write path clamps at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    amounts: AHashMap<ResourceKind, f64>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current amount of a resource
    pub fn get(&self, resource: ResourceKind) -> f64 {
        self.amounts.get(&resource).copied().unwrap_or(0.0)
    }

    /// Overwrite the amount of a resource, clamped at zero
    pub fn set(&mut self, resource: ResourceKind, amount: f64) {
        self.amounts.insert(resource, amount.max(0.0));
    }

    pub fn add(&mut self, resource: ResourceKind, amount: f64) {
        let current = self.get(resource);
        self.set(resource, current + amount);
    }

    /// Try to remove resources, returns amount actually removed
    pub fn remove(&mut self, resource: ResourceKind, amount: f64) -> f64 {
        let current = self.get(resource);
        let removed = amount.max(0.0).min(current);
        self.set(resource, current - removed);
        removed
    }

    /// Check if the pool has enough of all required materials
    pub fn has_materials(&self, requirements: &[(ResourceKind, f64)]) -> bool {
        requirements.iter().all(|(res, amount)| self.get(*res) >= *amount)
    }

    /// Remove every requirement, or nothing when one is short
    pub fn consume_materials(&mut self, requirements: &[(ResourceKind, f64)]) -> bool {
        if !self.has_materials(requirements) {
            return false;
        }
        for (res, amount) in requirements {
            self.remove(*res, *amount);
        }
        true
    }

    /// Amounts for every kind, in declaration order
    pub fn entries(&self) -> Vec<(ResourceKind, f64)> {
        ResourceKind::ALL.iter().map(|kind| (*kind, self.get(*kind))).collect()
    }
}

/// Per-kind storage caps. A cap of 0 means unlimited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageLimits {
    limits: AHashMap<ResourceKind, f64>,
}

impl StorageLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: ResourceKind) -> f64 {
        self.limits.get(&resource).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, resource: ResourceKind, capacity: f64) {
        self.limits.insert(resource, capacity.max(0.0));
    }

    pub fn increase(&mut self, resource: ResourceKind, amount: f64) {
        let current = self.get(resource);
        self.set(resource, current + amount);
    }

    pub fn is_limited(&self, resource: ResourceKind) -> bool {
        self.get(resource) > 0.0
    }

    pub fn entries(&self) -> Vec<(ResourceKind, f64)> {
        ResourceKind::ALL.iter().map(|kind| (*kind, self.get(*kind))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_add_remove() {
        let mut pool = ResourcePool::new();
        pool.add(ResourceKind::Leaves, 30.0);
        assert_eq!(pool.get(ResourceKind::Leaves), 30.0);

        // Can't remove more than held
        assert_eq!(pool.remove(ResourceKind::Leaves, 50.0), 30.0);
        assert_eq!(pool.get(ResourceKind::Leaves), 0.0);
    }

    #[test]
    fn test_pool_never_negative() {
        let mut pool = ResourcePool::new();
        pool.set(ResourceKind::Nectar, -5.0);
        assert_eq!(pool.get(ResourceKind::Nectar), 0.0);
        pool.add(ResourceKind::Nectar, -3.0);
        assert_eq!(pool.get(ResourceKind::Nectar), 0.0);
    }

    #[test]
    fn test_pool_consume_materials_all_or_nothing() {
        let mut pool = ResourcePool::new();
        pool.add(ResourceKind::Leaves, 50.0);
        pool.add(ResourceKind::Sand, 5.0);

        let requirements = vec![(ResourceKind::Leaves, 20.0), (ResourceKind::Sand, 10.0)];
        assert!(!pool.consume_materials(&requirements));
        assert_eq!(pool.get(ResourceKind::Leaves), 50.0);

        let affordable = vec![(ResourceKind::Leaves, 20.0), (ResourceKind::Sand, 5.0)];
        assert!(pool.consume_materials(&affordable));
        assert_eq!(pool.get(ResourceKind::Leaves), 30.0);
        assert_eq!(pool.get(ResourceKind::Sand), 0.0);
    }

    #[test]
    fn test_storage_limits_default_unlimited() {
        let mut limits = StorageLimits::new();
        assert!(!limits.is_limited(ResourceKind::Food));
        limits.increase(ResourceKind::Food, 40.0);
        assert!(limits.is_limited(ResourceKind::Food));
        assert_eq!(limits.get(ResourceKind::Food), 40.0);
    }
}
