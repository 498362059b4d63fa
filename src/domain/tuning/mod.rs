// Gameplay tuning, kept separate from runtime configuration.

pub mod clock;
pub mod craft;
