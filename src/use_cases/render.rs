// Renderer that records draw calls so a frame can be shipped to a remote canvas.

use super::types::DrawCommand;
use crate::domain::{Fill, Renderer};

#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for DrawList {
    fn draw_entity_at(&mut self, x: f32, y: f32, rotation: f32) {
        self.commands.push(DrawCommand::Entity { x, y, rotation });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_box(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill) {
        self.commands.push(DrawCommand::FillBox { x, y, w, h, fill });
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, w, h });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}
