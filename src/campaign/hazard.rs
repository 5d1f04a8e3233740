//! Hazards - time-bounded area effects around the colony
//!
//! A hazard is a pure query object. Expired hazards are pruned by the
//! world at the start of each step; nothing here runs on a timer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::campaign::weather::WeatherKind;
use crate::core::types::{HazardId, SimTime};
use crate::simulation::resource_node::ResourceNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Predator,
    Weather(WeatherKind),
    Puddle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardEffect {
    /// Workers may not be sent to affected nodes
    pub block_node: bool,
    /// Chance to lose a delivery from an affected node
    pub cargo_loss_chance: Option<f64>,
    /// Travel speed multiplier on affected routes
    pub speed_modifier: Option<f64>,
    /// Seconds the hazard stays active
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub kind: HazardKind,
    /// Nodes within this distance of the colony are affected; `None`
    /// covers the whole map
    pub area_radius: Option<f64>,
    pub effect: HazardEffect,
    pub active_until: SimTime,
}

impl Hazard {
    pub fn new(id: HazardId, kind: HazardKind, area_radius: Option<f64>, effect: HazardEffect, now: SimTime) -> Self {
        Self {
            id,
            kind,
            area_radius,
            effect,
            active_until: now + effect.duration,
        }
    }

    /// Predators close every node in their radius
    pub fn predator(id: HazardId, area_radius: f64, duration: f64, now: SimTime) -> Self {
        Self::new(
            id,
            HazardKind::Predator,
            Some(area_radius),
            HazardEffect {
                block_node: true,
                duration,
                ..Default::default()
            },
            now,
        )
    }

    /// Puddles slow travel to nearby nodes
    pub fn puddle(id: HazardId, area_radius: f64, speed_modifier: f64, duration: f64, now: SimTime) -> Self {
        Self::new(
            id,
            HazardKind::Puddle,
            Some(area_radius),
            HazardEffect {
                speed_modifier: Some(speed_modifier),
                duration,
                ..Default::default()
            },
            now,
        )
    }

    pub fn is_active(&self, now: SimTime) -> bool {
        now <= self.active_until
    }

    pub fn affects_node(&self, node: &ResourceNode) -> bool {
        self.area_radius
            .map_or(true, |radius| node.distance_to_colony <= radius)
    }

    pub fn blocks(&self, node: &ResourceNode) -> bool {
        self.effect.block_node && self.affects_node(node)
    }

    pub fn speed_modifier(&self) -> f64 {
        self.effect.speed_modifier.unwrap_or(1.0)
    }

    pub fn roll_cargo_loss<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self.effect.cargo_loss_chance {
            Some(chance) if chance > 0.0 => rng.gen::<f64>() < chance,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{NodeId, ResourceKind};

    fn node_at(distance: f64) -> ResourceNode {
        ResourceNode::new(NodeId(1), ResourceKind::Sand, 10.0, 1.0).with_distance(distance)
    }

    #[test]
    fn test_active_window_inclusive() {
        let hazard = Hazard::predator(HazardId(1), 5.0, 10.0, 100.0);
        assert_eq!(hazard.active_until, 110.0);
        assert!(hazard.is_active(110.0));
        assert!(!hazard.is_active(110.5));
    }

    #[test]
    fn test_block_radius_boundary() {
        let hazard = Hazard::predator(HazardId(1), 5.0, 10.0, 0.0);
        assert!(hazard.blocks(&node_at(5.0)));
        assert!(hazard.blocks(&node_at(0.5)));
        assert!(!hazard.blocks(&node_at(5.1)));
    }

    #[test]
    fn test_puddle_slows_without_blocking() {
        let hazard = Hazard::puddle(HazardId(2), 3.0, 0.5, 10.0, 0.0);
        assert!(hazard.affects_node(&node_at(2.0)));
        assert!(!hazard.blocks(&node_at(2.0)));
        assert_eq!(hazard.speed_modifier(), 0.5);
    }

    #[test]
    fn test_unbounded_radius_affects_everything() {
        let hazard = Hazard::new(
            HazardId(3),
            HazardKind::Predator,
            None,
            HazardEffect {
                block_node: true,
                duration: 1.0,
                ..Default::default()
            },
            0.0,
        );
        assert!(hazard.blocks(&node_at(10_000.0)));
    }
}
