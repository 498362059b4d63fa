// Use cases layer: application workflows for the simulation.

pub mod frame_loop;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod types;

pub use render::DrawList;
pub use scheduler::Scheduler;
pub use simulation::{Simulation, SimulationConfig};
pub use types::{ClockReadout, DrawCommand, FrameUpdate, InputEvent, SchedulerStatus};
