// Domain-level simulation entities and snapshot types.

use crate::domain::input::{ControlState, CraftControls};
use crate::domain::systems::craft_movement::{self, MovementConfig};

/// Boot-time description of a craft; unset fields take the craft defaults.
#[derive(Debug, Clone, Default)]
pub struct CraftDescriptor {
    pub x: f32,
    pub y: f32,
    pub rotation: Option<f32>,
    pub vel_x: Option<f32>,
    pub vel_y: Option<f32>,
    pub controls: Option<CraftControls>,
}

impl CraftDescriptor {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftSnapshot {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone)]
pub struct Craft {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    // Radians; 0 points up (-Y).
    pub rotation: f32,

    pub controls: CraftControls,

    // Baseline captured at construction, restored by reset().
    reset_x: f32,
    reset_y: f32,
    reset_rotation: f32,
}

impl Craft {
    pub fn new(descr: CraftDescriptor) -> Self {
        let rotation = descr.rotation.unwrap_or(0.0);
        Self {
            x: descr.x,
            y: descr.y,
            vel_x: descr.vel_x.unwrap_or(0.0),
            vel_y: descr.vel_y.unwrap_or(0.0),
            rotation,
            controls: descr.controls.unwrap_or_default(),
            reset_x: descr.x,
            reset_y: descr.y,
            reset_rotation: rotation,
        }
    }

    /// Advances the craft by `du` nominal intervals. `du` must be finite and non-negative.
    pub fn update(&mut self, du: f32, controls: ControlState, cfg: &MovementConfig) {
        craft_movement::tick_craft(self, du, controls, cfg);
    }

    pub fn halt(&mut self) {
        self.vel_x = 0.0;
        self.vel_y = 0.0;
    }

    pub fn reset(&mut self) {
        self.x = self.reset_x;
        self.y = self.reset_y;
        self.rotation = self.reset_rotation;

        self.halt();
    }

    pub fn warp_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

impl From<&Craft> for CraftSnapshot {
    fn from(c: &Craft) -> Self {
        Self {
            x: c.x,
            y: c.y,
            vel_x: c.vel_x,
            vel_y: c.vel_y,
            rotation: c.rotation,
        }
    }
}
