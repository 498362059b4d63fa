// Wire protocol DTOs and conversions for the frame stream.

use crate::domain::{CraftSnapshot, Fill, KeyCode};
use crate::use_cases::{ClockReadout, DrawCommand, FrameUpdate, InputEvent, SchedulerStatus};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected viewers over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Draw list and craft state for one rendered frame.
    Frame(FrameDto),
    // Scheduler lifecycle; `Stopped` is terminal.
    Status(StatusDto),
}

/// Messages a viewer sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    // Pointer position while a button is held.
    Pointer { x: f32, y: f32 },
}

impl From<ClientMessage> for InputEvent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::KeyDown { key } => InputEvent::KeyDown(key),
            ClientMessage::KeyUp { key } => InputEvent::KeyUp(key),
            ClientMessage::Pointer { x, y } => InputEvent::Pointer { x, y },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameDto {
    pub frame: u64,
    pub commands: Vec<DrawCommandDto>,
    pub crafts: Vec<CraftStateDto>,
    pub clock: ClockDto,
}

impl From<FrameUpdate> for FrameDto {
    fn from(update: FrameUpdate) -> Self {
        Self {
            frame: update.frame,
            commands: update
                .commands
                .into_iter()
                .map(DrawCommandDto::from)
                .collect(),
            crafts: update.crafts.iter().map(CraftStateDto::from).collect(),
            clock: update.clock.into(),
        }
    }
}

/// One canvas operation; viewers replay these in order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommandDto {
    Clear,
    Sprite { x: f32, y: f32, rot: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32, fill: FillDto },
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    Text { text: String, x: f32, y: f32 },
}

impl From<DrawCommand> for DrawCommandDto {
    fn from(cmd: DrawCommand) -> Self {
        match cmd {
            DrawCommand::Clear => DrawCommandDto::Clear,
            DrawCommand::Entity { x, y, rotation } => DrawCommandDto::Sprite { x, y, rot: rotation },
            DrawCommand::FillBox { x, y, w, h, fill } => DrawCommandDto::FillRect {
                x,
                y,
                w,
                h,
                fill: fill.into(),
            },
            DrawCommand::ClearRect { x, y, w, h } => DrawCommandDto::ClearRect { x, y, w, h },
            DrawCommand::Text { text, x, y } => DrawCommandDto::Text { text, x, y },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillDto {
    Black,
    Red,
    Green,
    White,
}

impl From<Fill> for FillDto {
    fn from(fill: Fill) -> Self {
        match fill {
            Fill::Black => FillDto::Black,
            Fill::Red => FillDto::Red,
            Fill::Green => FillDto::Green,
            Fill::White => FillDto::White,
        }
    }
}

/// Flattened craft state for wire transmission.
#[derive(Debug, Clone, Serialize)]
pub struct CraftStateDto {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub rot: f32,
}

impl From<&CraftSnapshot> for CraftStateDto {
    fn from(craft: &CraftSnapshot) -> Self {
        Self {
            x: craft.x,
            y: craft.y,
            vx: craft.vel_x,
            vy: craft.vel_y,
            rot: craft.rotation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClockDto {
    // Absent until the first frame has been tracked.
    pub frame_time_ms: Option<f64>,
    pub frame_delta_ms: f64,
    // Absent until the first update has run.
    pub update_du: Option<f64>,
    pub paused: bool,
}

impl From<ClockReadout> for ClockDto {
    fn from(clock: ClockReadout) -> Self {
        Self {
            frame_time_ms: clock.frame_time_ms,
            frame_delta_ms: clock.frame_delta_ms,
            update_du: clock.update_du,
            paused: clock.paused,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum StatusDto {
    Running,
    Stopped,
}

impl From<SchedulerStatus> for StatusDto {
    fn from(status: SchedulerStatus) -> Self {
        match status {
            SchedulerStatus::Running => StatusDto::Running,
            SchedulerStatus::Stopped => StatusDto::Stopped,
        }
    }
}
