//! Campaign layer - the terrain around the colony

pub mod exploration;
pub mod hazard;
pub mod map;
pub mod route;
pub mod weather;

pub use exploration::{handle_scout_exploration, ExplorationOutcome};
pub use hazard::{Hazard, HazardEffect, HazardKind};
pub use map::{MapEdge, MapGraph};
pub use route::{TrailBuff, TrailNetwork};
pub use weather::WeatherKind;
