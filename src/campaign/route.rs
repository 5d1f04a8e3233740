//! Pheromone trails - per-route speed bonus that grows with traffic
//!
//! A route runs from the colony to one node. Every delivered load
//! strengthens its trail until the bonus reaches the configured maximum.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailBuff {
    pub transfers: u32,
    pub max_bonus: f64,
    /// Transfers after which the bonus is capped
    pub transfers_to_max: u32,
}

impl TrailBuff {
    pub fn new(max_bonus: f64, transfers_to_max: u32) -> Self {
        Self {
            transfers: 0,
            max_bonus: max_bonus.max(1.0),
            transfers_to_max: transfers_to_max.max(1),
        }
    }

    pub fn record_transfer(&mut self) {
        self.transfers = self.transfers.saturating_add(1);
    }

    /// Travel speed multiplier, 1.0 for an unused route
    pub fn speed_bonus(&self) -> f64 {
        let step = (self.max_bonus - 1.0) / self.transfers_to_max as f64;
        (1.0 + step * self.transfers as f64).min(self.max_bonus)
    }
}

/// Trails for every route that has seen traffic
#[derive(Debug, Clone)]
pub struct TrailNetwork {
    trails: AHashMap<NodeId, TrailBuff>,
    max_bonus: f64,
    transfers_to_max: u32,
}

impl TrailNetwork {
    pub fn new(max_bonus: f64, transfers_to_max: u32) -> Self {
        Self {
            trails: AHashMap::new(),
            max_bonus,
            transfers_to_max,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&TrailBuff> {
        self.trails.get(&node)
    }

    pub fn speed_bonus(&self, node: NodeId) -> f64 {
        self.trails.get(&node).map_or(1.0, TrailBuff::speed_bonus)
    }

    pub fn record_transfer(&mut self, node: NodeId) -> f64 {
        let (max_bonus, transfers_to_max) = (self.max_bonus, self.transfers_to_max);
        let trail = self
            .trails
            .entry(node)
            .or_insert_with(|| TrailBuff::new(max_bonus, transfers_to_max));
        trail.record_transfer();
        trail.speed_bonus()
    }

    /// Trails sorted by node id
    pub fn entries(&self) -> Vec<(NodeId, TrailBuff)> {
        let mut entries: Vec<_> = self.trails.iter().map(|(id, trail)| (*id, *trail)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}
