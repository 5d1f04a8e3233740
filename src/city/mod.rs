//! City layer - colony, stockpile, buildings, upgrades and the economy

pub mod building;
pub mod colony;
pub mod economy;
pub mod stockpile;
pub mod upgrade;

pub use building::{Building, BuildingCatalog, BuildingEffect, BuildingPlan, UpgradeBoosts};
pub use colony::Colony;
pub use economy::{Delivery, EconomyContext, Maintenance};
pub use stockpile::{ResourcePool, StorageLimits};
pub use upgrade::{ColonyUpgrade, UpgradeEffect, UpgradeReceipt, UpgradeRequirements};
