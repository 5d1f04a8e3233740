//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation time in seconds
///
/// Always passed in explicitly; nothing in the core reads a clock.
pub type SimTime = f64;

/// Simulation step counter
pub type Tick = u64;

/// Kind of resource handled by the colony economy
///
/// Closed set. Declaration order doubles as the deterministic iteration
/// order for cost tables and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Nectar,
    Leaves,
    Sand,
    Food,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Nectar,
        ResourceKind::Leaves,
        ResourceKind::Sand,
        ResourceKind::Food,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nectar => "nectar",
            Self::Leaves => "leaves",
            Self::Sand => "sand",
            Self::Food => "food",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle of a resource node in the map registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle of an ant owned by the colony world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AntId(pub u32);

/// Handle of a task in the task queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u32);

/// Handle of a registered hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HazardId(pub u32);

/// Handle of a colony upgrade in the upgrade catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub u32);

/// Unique building identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u64);

impl BuildingId {
    /// Create a new unique BuildingId using UUID
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128() as u64)
    }
}

impl Default for BuildingId {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! display_handle {
    ($($name:ident => $prefix:literal),* $(,)?) => {
        $(
            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )*
    };
}

display_handle!(
    NodeId => "node",
    AntId => "ant",
    TaskId => "task",
    HazardId => "hazard",
    UpgradeId => "upgrade",
    BuildingId => "building",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_order() {
        assert!(ResourceKind::Nectar < ResourceKind::Leaves);
        assert!(ResourceKind::Sand < ResourceKind::Food);
        assert_eq!(ResourceKind::ALL.len(), 4);
    }

    #[test]
    fn test_resource_kind_serde_names() {
        let json = serde_json::to_string(&ResourceKind::Leaves).unwrap();
        assert_eq!(json, "\"leaves\"");
        let back: ResourceKind = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(back, ResourceKind::Food);
    }

    #[test]
    fn test_building_id_unique() {
        let id1 = BuildingId::new();
        let id2 = BuildingId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(NodeId(3).to_string(), "node#3");
        assert_eq!(TaskId(12).to_string(), "task#12");
    }
}
