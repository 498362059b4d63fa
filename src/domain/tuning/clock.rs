/// Timing tuning for frame-delta normalization.

#[derive(Debug, Clone, Copy)]
pub struct ClockTuning {
    /// Reference frame period in milliseconds; one `du` equals one nominal interval.
    pub nominal_interval_ms: f64,

    /// Frame deltas above this are treated as clock jumps and clamped to the nominal interval.
    pub max_frame_delta_ms: f64,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            nominal_interval_ms: 16.666,
            max_frame_delta_ms: 200.0,
        }
    }
}
