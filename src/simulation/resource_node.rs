//! Resource nodes - extractable sites with depletion and regeneration
//!
//! A node is Active while it has richness and no cooldown. Extraction can
//! arm a cooldown (stochastically, or by exhausting the node). Only
//! [`ResourceNode::is_depleted`] moves a node out of cooldown: once the
//! window has elapsed it runs a Bernoulli regeneration trial, either
//! restoring the node or re-arming the window.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{NodeId, ResourceKind, SimTime};
use crate::entity::worker::WorkerTraits;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub kind: ResourceKind,
    /// Remaining extractable quantity
    pub richness: f64,
    /// Units per second for a baseline worker
    pub base_extraction_rate: f64,
    /// Chance per extraction that the node enters cooldown
    pub depletion_risk: f64,
    /// Seconds per cooldown window
    pub regeneration_delay: f64,
    /// Bounds of the per-trial regeneration probability
    pub regeneration_chance: (f64, f64),
    pub distance_to_colony: f64,
    depleted_until: Option<SimTime>,
}

impl ResourceNode {
    pub fn new(id: NodeId, kind: ResourceKind, richness: f64, base_extraction_rate: f64) -> Self {
        Self {
            id,
            kind,
            richness: richness.max(0.0),
            base_extraction_rate,
            depletion_risk: 0.0,
            regeneration_delay: 30.0,
            regeneration_chance: (0.3, 0.6),
            distance_to_colony: 1.0,
            depleted_until: None,
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance_to_colony = distance.max(0.0);
        self
    }

    pub fn with_depletion_risk(mut self, risk: f64) -> Self {
        self.depletion_risk = risk.clamp(0.0, 1.0);
        self
    }

    pub fn with_regeneration(mut self, delay: f64, chance: (f64, f64)) -> Self {
        let low = chance.0.clamp(0.0, 1.0);
        let high = chance.1.clamp(0.0, 1.0);
        self.regeneration_delay = delay.max(0.0);
        self.regeneration_chance = (low.min(high), low.max(high));
        self
    }

    pub fn depleted_until(&self) -> Option<SimTime> {
        self.depleted_until
    }

    /// Has richness and no cooldown armed. Never changes state.
    pub fn is_available(&self) -> bool {
        self.richness > 0.0 && self.depleted_until.is_none()
    }

    fn arm_cooldown(&mut self, now: SimTime) {
        self.depleted_until = Some(now + self.regeneration_delay);
    }

    /// Authoritative depletion check, attempting regeneration when due.
    ///
    /// Returns true while the node is exhausted or cooling down.
    pub fn is_depleted<R: Rng + ?Sized>(&mut self, now: SimTime, rng: &mut R) -> bool {
        match self.depleted_until {
            Some(until) if now < until => true,
            Some(_) => {
                if self.try_regenerate(rng) {
                    self.depleted_until = None;
                    tracing::debug!("{} regenerated (richness {:.1})", self.id, self.richness);
                    false
                } else {
                    self.arm_cooldown(now);
                    true
                }
            }
            None if self.richness <= 0.0 => {
                // Exhausted nodes get a cooldown so they can come back
                self.arm_cooldown(now);
                true
            }
            None => false,
        }
    }

    fn try_regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let (min_chance, max_chance) = self.regeneration_chance;
        let chance = min_chance + rng.gen::<f64>() * (max_chance - min_chance);
        if rng.gen::<f64>() < chance {
            self.richness = self.richness.max(1.0);
            return true;
        }
        false
    }

    /// Remove what `worker` gathers over `dt` and return it
    pub fn extract<R: Rng + ?Sized>(
        &mut self,
        worker: &WorkerTraits,
        dt: f64,
        modifiers: &[f64],
        now: SimTime,
        rng: &mut R,
    ) -> f64 {
        if self.richness <= 0.0 {
            return 0.0;
        }
        let rate = worker.gathering_rate(self.base_extraction_rate, modifiers);
        let gathered = (rate * dt).max(0.0).min(self.richness);
        self.richness -= gathered;

        if rng.gen::<f64>() < self.depletion_risk {
            self.arm_cooldown(now);
        }
        if self.richness <= 0.0 {
            self.richness = 0.0;
            if self.depleted_until.is_none() {
                self.arm_cooldown(now);
            }
        }
        gathered
    }
}
