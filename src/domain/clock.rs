// Frame clock: turns wall-clock frame timestamps into normalized simulation deltas.

use crate::domain::input::{ActionInput, KeyCode};
use crate::domain::tuning::clock::ClockTuning;
use tracing::warn;

/// Frame deltas the clock refuses to normalize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    NonFinite(f64),
    Negative(f64),
}

#[derive(Debug, Clone)]
pub struct SimulationClock {
    tuning: ClockTuning,

    // Frame-level tracking, advanced on every scheduled frame.
    last_frame_time_ms: Option<f64>,
    last_frame_delta_ms: f64,

    // Update-level tracking, advanced only when an update actually runs.
    last_update_dt_ms: Option<f64>,
    last_update_du: Option<f64>,
    update_odd: bool,

    paused: bool,
}

impl SimulationClock {
    pub fn new(tuning: ClockTuning) -> Self {
        Self {
            tuning,
            last_frame_time_ms: None,
            last_frame_delta_ms: 0.0,
            last_update_dt_ms: None,
            last_update_du: None,
            update_odd: false,
            paused: false,
        }
    }

    /// Records a frame timestamp and returns the delta from the previous frame.
    ///
    /// The first frame becomes the baseline and yields a zero delta.
    pub fn track_frame(&mut self, frame_time_ms: f64) -> f64 {
        let previous = *self.last_frame_time_ms.get_or_insert(frame_time_ms);
        self.last_frame_delta_ms = frame_time_ms - previous;
        self.last_frame_time_ms = Some(frame_time_ms);
        self.last_frame_delta_ms
    }

    /// Converts a frame delta (ms) into `du`, clamping clock jumps to one nominal interval.
    pub fn normalize(&mut self, dt_ms: f64) -> Result<f64, ClockError> {
        if !dt_ms.is_finite() {
            return Err(ClockError::NonFinite(dt_ms));
        }
        if dt_ms < 0.0 {
            return Err(ClockError::Negative(dt_ms));
        }

        let raw_dt = dt_ms;
        let mut dt = dt_ms;
        if dt > self.tuning.max_frame_delta_ms {
            warn!(dt_ms = dt, "big frame delta; clamping to nominal");
            dt = self.tuning.nominal_interval_ms;
        }

        let du = dt / self.tuning.nominal_interval_ms;

        self.last_update_dt_ms = Some(raw_dt);
        self.last_update_du = Some(du);
        self.update_odd = !self.update_odd;

        Ok(du)
    }

    /// Applies the pause toggle and reports whether this frame's update must be skipped.
    ///
    /// The step key is only consumed while paused; each press lets one update through.
    pub fn should_skip_update<I: ActionInput + ?Sized>(
        &mut self,
        input: &mut I,
        pause: KeyCode,
        step: KeyCode,
    ) -> bool {
        if input.consume_and_clear(pause) {
            self.paused = !self.paused;
        }
        self.paused && !input.consume_and_clear(step)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame_time_ms(&self) -> Option<f64> {
        self.last_frame_time_ms
    }

    pub fn frame_delta_ms(&self) -> f64 {
        self.last_frame_delta_ms
    }

    pub fn last_update_dt_ms(&self) -> Option<f64> {
        self.last_update_dt_ms
    }

    pub fn last_update_du(&self) -> Option<f64> {
        self.last_update_du
    }

    /// Parity of applied updates, flipped once per normalized update.
    pub fn is_update_odd(&self) -> bool {
        self.update_odd
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(ClockTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::Keyboard;

    const NOMINAL: f64 = 16.666;

    #[test]
    fn when_first_frame_arrives_then_delta_is_zero() {
        let mut clock = SimulationClock::default();

        assert_eq!(clock.track_frame(1234.5), 0.0);
        assert_eq!(clock.frame_time_ms(), Some(1234.5));
        assert_eq!(clock.track_frame(1251.0), 1251.0 - 1234.5);
    }

    #[test]
    fn when_delta_is_nominal_then_du_is_one() {
        let mut clock = SimulationClock::default();

        assert_eq!(clock.normalize(NOMINAL), Ok(1.0));
        assert_eq!(clock.normalize(NOMINAL * 2.0), Ok(2.0));
    }

    #[test]
    fn when_delta_is_a_clock_jump_then_it_is_clamped_to_nominal() {
        let mut clock = SimulationClock::default();

        let du = clock.normalize(5000.0).expect("finite delta");

        assert_eq!(du, NOMINAL / NOMINAL);
        assert_eq!(clock.last_update_dt_ms(), Some(5000.0));
        assert_eq!(clock.last_update_du(), Some(1.0));
    }

    #[test]
    fn when_delta_is_exactly_the_threshold_then_it_is_not_clamped() {
        let mut clock = SimulationClock::default();

        let du = clock.normalize(200.0).expect("finite delta");

        assert_eq!(du, 200.0 / NOMINAL);
    }

    #[test]
    fn when_delta_is_pathological_then_it_is_rejected_without_touching_state() {
        let mut clock = SimulationClock::default();

        assert_eq!(
            clock.normalize(-1.0),
            Err(ClockError::Negative(-1.0))
        );
        assert!(matches!(
            clock.normalize(f64::NAN),
            Err(ClockError::NonFinite(_))
        ));
        assert!(matches!(
            clock.normalize(f64::INFINITY),
            Err(ClockError::NonFinite(_))
        ));
        assert_eq!(clock.last_update_du(), None);
        assert!(!clock.is_update_odd());
    }

    #[test]
    fn when_updates_run_then_parity_flips_each_time() {
        let mut clock = SimulationClock::default();

        let _ = clock.normalize(NOMINAL);
        assert!(clock.is_update_odd());
        let _ = clock.normalize(NOMINAL);
        assert!(!clock.is_update_odd());
    }

    #[test]
    fn when_paused_then_each_step_press_releases_exactly_one_update() {
        let mut clock = SimulationClock::default();
        let mut keys = Keyboard::new();
        let (pause, step) = (KeyCode::of('P'), KeyCode::of('O'));

        keys.key_down(pause);
        assert!(clock.should_skip_update(&mut keys, pause, step));
        assert!(clock.is_paused());
        assert!(clock.should_skip_update(&mut keys, pause, step));

        keys.key_down(step);
        assert!(!clock.should_skip_update(&mut keys, pause, step));
        assert!(clock.should_skip_update(&mut keys, pause, step));
        assert!(clock.is_paused());
    }

    #[test]
    fn when_not_paused_then_step_key_is_left_alone() {
        let mut clock = SimulationClock::default();
        let mut keys = Keyboard::new();
        let (pause, step) = (KeyCode::of('P'), KeyCode::of('O'));

        keys.key_down(step);

        assert!(!clock.should_skip_update(&mut keys, pause, step));
        assert!(keys.is_asserted(step));
    }

    #[test]
    fn when_pause_is_pressed_twice_then_updates_resume() {
        let mut clock = SimulationClock::default();
        let mut keys = Keyboard::new();
        let (pause, step) = (KeyCode::of('P'), KeyCode::of('O'));

        keys.key_down(pause);
        assert!(clock.should_skip_update(&mut keys, pause, step));
        keys.key_down(pause);
        assert!(!clock.should_skip_update(&mut keys, pause, step));
        assert!(!clock.is_paused());
    }
}
