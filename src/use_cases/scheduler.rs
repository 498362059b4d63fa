// Main-loop iteration: clocks, quit check, input gather, update, render and debug overlays.

use super::simulation::Simulation;
use super::types::{ClockReadout, InputEvent, SchedulerStatus};
use crate::domain::{ActionInput, Fill, KeyBindings, Keyboard, Renderer, SimulationClock};
use tracing::{info, warn};

/// Presentation-only toggles; none of these affect physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlays {
    pub clear: bool,
    pub show_box: bool,
    pub undo_box: bool,
    pub flip_flop: bool,
    pub render: bool,
    pub timer: bool,
}

impl Default for Overlays {
    fn default() -> Self {
        Self {
            clear: true,
            show_box: false,
            undo_box: false,
            flip_flop: false,
            render: true,
            timer: false,
        }
    }
}

pub struct Scheduler {
    clock: SimulationClock,
    simulation: Simulation,
    keyboard: Keyboard,
    bindings: KeyBindings,
    overlays: Overlays,
    frame_counter: u64,
    status: SchedulerStatus,
}

impl Scheduler {
    pub fn new(simulation: Simulation, clock: SimulationClock, bindings: KeyBindings) -> Self {
        Self {
            clock,
            simulation,
            keyboard: Keyboard::new(),
            bindings,
            overlays: Overlays::default(),
            frame_counter: 1,
            status: SchedulerStatus::Running,
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn clock_readout(&self) -> ClockReadout {
        ClockReadout {
            frame_time_ms: self.clock.frame_time_ms(),
            frame_delta_ms: self.clock.frame_delta_ms(),
            update_du: self.clock.last_update_du(),
            paused: self.clock.is_paused(),
        }
    }

    /// Applies a device event as soon as it arrives, between frames.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.keyboard.key_down(key),
            InputEvent::KeyUp(key) => self.keyboard.key_up(key),
            InputEvent::Pointer { x, y } => self.simulation.warp_primary(x, y),
        }
    }

    /// Runs one frame. After a quit this is a no-op that keeps reporting `Stopped`.
    pub fn iter<R: Renderer + ?Sized>(
        &mut self,
        frame_time_ms: f64,
        renderer: &mut R,
    ) -> SchedulerStatus {
        if self.status == SchedulerStatus::Stopped {
            return self.status;
        }

        let dt = self.clock.track_frame(frame_time_ms);
        self.iter_core(dt, renderer);
        self.debug_render(renderer);

        self.status
    }

    fn iter_core<R: Renderer + ?Sized>(&mut self, dt: f64, renderer: &mut R) {
        if self.keyboard.is_asserted(self.bindings.quit) {
            self.game_over();
            return;
        }

        self.gather_inputs();
        self.update(dt);
        self.render(renderer);
    }

    fn game_over(&mut self) {
        self.status = SchedulerStatus::Stopped;
        info!("game over: quitting");
    }

    fn gather_inputs(&mut self) {
        let b = self.bindings;

        if self.keyboard.consume_and_clear(b.extras) {
            self.simulation.toggle_extras();
        }
        if self.keyboard.consume_and_clear(b.gravity) {
            self.simulation.toggle_gravity();
        }
        if self.keyboard.consume_and_clear(b.mixed_actions) {
            self.simulation.toggle_mixed_actions();
        }
    }

    fn update(&mut self, dt: f64) {
        if self
            .clock
            .should_skip_update(&mut self.keyboard, self.bindings.pause, self.bindings.step)
        {
            return;
        }

        match self.clock.normalize(dt) {
            Ok(du) => self
                .simulation
                .update(du as f32, &mut self.keyboard, &self.bindings),
            Err(e) => warn!(error = ?e, "rejected frame delta; skipping update"),
        }
    }

    fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let b = self.bindings;
        let o = &mut self.overlays;
        if self.keyboard.consume_and_clear(b.clear) {
            o.clear = !o.clear;
        }
        if self.keyboard.consume_and_clear(b.show_box) {
            o.show_box = !o.show_box;
        }
        if self.keyboard.consume_and_clear(b.undo_box) {
            o.undo_box = !o.undo_box;
        }
        if self.keyboard.consume_and_clear(b.flip_flop) {
            o.flip_flop = !o.flip_flop;
        }
        if self.keyboard.consume_and_clear(b.render) {
            o.render = !o.render;
        }

        if o.clear {
            renderer.clear();
        }

        if o.show_box {
            renderer.fill_box(200.0, 200.0, 50.0, 50.0, Fill::Red);
        }

        if o.render {
            self.simulation.render(renderer);
        }

        if o.flip_flop {
            let box_x = 250.0;
            let box_y = if self.clock.is_update_odd() { 100.0 } else { 200.0 };
            renderer.fill_box(box_x, box_y, 50.0, 50.0, Fill::Green);

            renderer.fill_text(
                &(self.frame_counter % 1000).to_string(),
                box_x + 10.0,
                box_y + 20.0,
            );
            let parity = if self.frame_counter % 2 == 1 { "odd" } else { "even" };
            renderer.fill_text(parity, box_x + 10.0, box_y + 40.0);
        }

        if o.undo_box {
            renderer.clear_rect(200.0, 200.0, 50.0, 50.0);
        }

        self.frame_counter += 1;
    }

    fn debug_render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if self.keyboard.consume_and_clear(self.bindings.timer) {
            self.overlays.timer = !self.overlays.timer;
        }

        if !self.overlays.timer {
            return;
        }

        let y = 350.0;
        let frame_time = fmt_opt(self.clock.frame_time_ms());
        let update_du = fmt_opt(self.clock.last_update_du());
        renderer.fill_text(&format!("FT {frame_time}"), 50.0, y + 10.0);
        renderer.fill_text(
            &format!("FD {}", self.clock.frame_delta_ms()),
            50.0,
            y + 20.0,
        );
        renderer.fill_text(&format!("UU {update_du}"), 50.0, y + 30.0);
        renderer.fill_text("FrameSync ON", 50.0, y + 40.0);
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}
