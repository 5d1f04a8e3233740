//! Weather - map-wide hazards with a fixed effect per weather kind

use serde::{Deserialize, Serialize};

use crate::campaign::hazard::{Hazard, HazardEffect, HazardKind};
use crate::core::types::{HazardId, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Rain,
    Heat,
    /// Any weather name this build does not know. Carries only a duration.
    #[serde(other)]
    Unrecognized,
}

impl WeatherKind {
    /// Effect table
    pub fn effect(&self, duration: f64) -> HazardEffect {
        match self {
            Self::Rain => HazardEffect {
                speed_modifier: Some(0.7),
                duration,
                ..Default::default()
            },
            Self::Heat => HazardEffect {
                speed_modifier: Some(1.1),
                cargo_loss_chance: Some(0.1),
                duration,
                ..Default::default()
            },
            Self::Unrecognized => HazardEffect {
                duration,
                ..Default::default()
            },
        }
    }
}

impl Hazard {
    pub fn weather(id: HazardId, weather: WeatherKind, duration: f64, now: SimTime) -> Self {
        Self::new(id, HazardKind::Weather(weather), None, weather.effect(duration), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{NodeId, ResourceKind};
    use crate::simulation::resource_node::ResourceNode;

    #[test]
    fn test_rain_slows_everywhere() {
        let rain = Hazard::weather(HazardId(1), WeatherKind::Rain, 60.0, 0.0);
        let far = ResourceNode::new(NodeId(1), ResourceKind::Leaves, 5.0, 1.0).with_distance(500.0);
        assert!(rain.affects_node(&far));
        assert!(!rain.blocks(&far));
        assert_eq!(rain.speed_modifier(), 0.7);
        assert_eq!(rain.effect.cargo_loss_chance, None);
    }

    #[test]
    fn test_heat_speeds_up_with_cargo_loss() {
        let heat = Hazard::weather(HazardId(2), WeatherKind::Heat, 30.0, 10.0);
        assert_eq!(heat.speed_modifier(), 1.1);
        assert_eq!(heat.effect.cargo_loss_chance, Some(0.1));
        assert_eq!(heat.active_until, 40.0);
    }

    #[test]
    fn test_unknown_weather_only_has_duration() {
        let kind: WeatherKind = serde_json::from_str("\"hail\"").unwrap();
        assert_eq!(kind, WeatherKind::Unrecognized);
        let effect = kind.effect(12.0);
        assert_eq!(
            effect,
            HazardEffect {
                duration: 12.0,
                ..Default::default()
            }
        );
    }
}
