// Use-case level inputs/outputs for the frame loop.

use crate::domain::{CraftSnapshot, Fill, KeyCode};

#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    // Pointer position with a button held.
    Pointer { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Entity { x: f32, y: f32, rotation: f32 },
    FillBox { x: f32, y: f32, w: f32, h: f32, fill: Fill },
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    Text { text: String, x: f32, y: f32 },
}

/// Clock diagnostics captured at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReadout {
    pub frame_time_ms: Option<f64>,
    pub frame_delta_ms: f64,
    pub update_du: Option<f64>,
    pub paused: bool,
}

#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub frame: u64,
    pub commands: Vec<DrawCommand>,
    pub crafts: Vec<CraftSnapshot>,
    pub clock: ClockReadout,
}
