// Domain layer: core simulation types and rules.

pub mod clock;
pub mod input;
pub mod ports;
pub mod space;
pub mod state;
pub mod systems;
pub mod tuning;

pub use clock::{ClockError, SimulationClock};
pub use input::{ActionInput, ControlState, CraftControls, KeyBindings, KeyCode, Keyboard};
pub use ports::{Fill, Renderer};
pub use space::ToroidalSpace;
pub use state::{Craft, CraftDescriptor, CraftSnapshot};
