// Port for the pixel renderer the simulation draws through.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Black,
    Red,
    Green,
    White,
}

pub trait Renderer {
    /// Draws the craft sprite centred at `(x, y)`, rotated by `rotation` radians.
    fn draw_entity_at(&mut self, x: f32, y: f32, rotation: f32);

    /// Fills the whole surface with the background colour.
    fn clear(&mut self);

    fn fill_box(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill);

    /// Makes the rectangle transparent again.
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}
