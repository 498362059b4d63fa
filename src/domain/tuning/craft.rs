/// Physics tuning for crafts.
///
/// All rates are calibrated to one nominal interval, so a velocity is "plane units per nominal
/// interval" and an acceleration is "plane units per nominal interval squared".

#[derive(Debug, Clone, Copy)]
pub struct CraftTuning {
    /// Forward thrust acceleration.
    pub thrust: f32,

    /// Reverse thrust acceleration (negative).
    pub retro: f32,

    /// Downward acceleration while gravity mode is on.
    pub gravity: f32,

    /// Rotation speed in radians per nominal interval.
    pub turn_rate: f32,

    /// Vertical velocity multiplier applied on a top/bottom bounce.
    pub restitution: f32,

    /// Half the sprite height; the vertical extent used for top/bottom bounces.
    pub radius: f32,
}

impl Default for CraftTuning {
    fn default() -> Self {
        Self {
            thrust: 0.2,
            retro: -0.1,
            gravity: 0.12,
            turn_rate: 0.1,
            restitution: -0.9,
            radius: 16.0,
        }
    }
}
