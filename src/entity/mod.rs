pub mod ant;
pub mod queen;
pub mod scout;
pub mod tasks;
pub mod worker;

pub use ant::{Ant, AntRole, AntState, AntStats, Cargo, Trip};
pub use queen::Queen;
pub use scout::{Discovery, ScoutTraits};
pub use tasks::{Task, TaskKind, TaskPayload, TaskPriority, TaskQueue};
pub use worker::{WorkerEfficiency, WorkerTraits};
