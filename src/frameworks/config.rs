use std::{env, time::Duration};

// Runtime/server settings (not physics tuning).

pub fn http_port() -> u16 {
    env::var("CRAFT_SIM_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3004)
}

pub fn frame_interval() -> Duration {
    let millis = env::var("FRAME_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(16);
    Duration::from_millis(millis)
}

/// Plane width and height in pixels.
pub fn plane_size() -> (f32, f32) {
    (
        positive_f32("PLANE_WIDTH").unwrap_or(400.0),
        positive_f32("PLANE_HEIGHT").unwrap_or(400.0),
    )
}

pub fn craft_radius() -> f32 {
    positive_f32("CRAFT_RADIUS").unwrap_or(16.0)
}

fn positive_f32(key: &str) -> Option<f32> {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const FRAME_BROADCAST_CAPACITY: usize = 128;
