//! The colony queen - hatches workers on a modifier-scaled interval

use serde::{Deserialize, Serialize};

use crate::city::building::Building;
use crate::core::config::QueenConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queen {
    /// Seconds per hatched worker before building modifiers
    pub base_production_interval: f64,
    /// Nectar per worker per minute
    pub worker_maintenance_cost: f64,
    /// Non-neutral production modifiers, one per registered building
    production_modifiers: Vec<f64>,
    /// Seconds of production accumulated towards the next worker
    pub progress: f64,
}

impl Queen {
    pub fn new(config: QueenConfig) -> Self {
        Self {
            base_production_interval: config.base_production_interval,
            worker_maintenance_cost: config.worker_maintenance_cost,
            production_modifiers: Vec::new(),
            progress: 0.0,
        }
    }

    pub fn register_building_modifier(&mut self, building: &Building) {
        let modifier = building.queen_production_modifier();
        if modifier != 1.0 {
            self.production_modifiers.push(modifier);
        }
    }

    pub fn production_modifiers(&self) -> &[f64] {
        &self.production_modifiers
    }

    /// Effective seconds between two hatched workers
    pub fn production_interval(&self) -> f64 {
        self.base_production_interval * self.production_modifiers.iter().product::<f64>()
    }

    /// Accumulate production and return the number of workers hatched.
    ///
    /// `ratio` is the maintenance coverage for the step; a starving colony
    /// makes proportionally less progress.
    pub fn advance_production(&mut self, dt: f64, ratio: f64) -> u32 {
        let interval = self.production_interval();
        if interval <= 0.0 {
            return 0;
        }
        self.progress += dt * ratio.clamp(0.0, 1.0);
        let mut hatched = 0;
        while self.progress >= interval {
            self.progress -= interval;
            hatched += 1;
        }
        hatched
    }
}
