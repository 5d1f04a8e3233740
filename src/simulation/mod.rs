//! Simulation - the colony world, its command surface and the step loop

pub mod assignment;
pub mod command;
pub mod events;
pub mod resource_node;
pub mod scenario;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use assignment::{assign_tasks, AssignmentContext};
pub use command::{CommandReceipt, HazardSpec, Intent};
pub use events::SimulationEvent;
pub use resource_node::ResourceNode;
pub use scenario::{NodeSpec, Scenario, TaskSpec};
pub use snapshot::{ColonySnapshot, NodeView, ResourceView, TaskView, TrailView};
pub use tick::{run_simulation_step, StepReport};
pub use world::ColonyWorld;
