// Simulation workflow: per-frame craft updates with fixed sub-step rates, wrap and rendering.

use crate::domain::systems::craft_movement::MovementConfig;
use crate::domain::tuning::craft::CraftTuning;
use crate::domain::{
    ActionInput, Craft, CraftDescriptor, CraftSnapshot, KeyBindings, Renderer, ToroidalSpace,
};
use tracing::info;

/// Runtime feature flags, flipped only through the toggle methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub use_gravity: bool,
    pub allow_mixed_actions: bool,
    pub use_extras: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            use_gravity: false,
            allow_mixed_actions: true,
            use_extras: true,
        }
    }
}

impl SimulationConfig {
    fn toggle_gravity(&mut self) {
        self.use_gravity = !self.use_gravity;
        info!(enabled = self.use_gravity, "gravity toggled");
    }

    fn toggle_mixed_actions(&mut self) {
        self.allow_mixed_actions = !self.allow_mixed_actions;
        info!(enabled = self.allow_mixed_actions, "mixed actions toggled");
    }

    fn toggle_extras(&mut self) {
        self.use_extras = !self.use_extras;
        info!(enabled = self.use_extras, "extra crafts toggled");
    }
}

#[derive(Debug, Clone)]
pub struct CraftSlot {
    pub craft: Craft,
    // Updates per frame, each with `du / substeps`.
    pub substeps: u32,
    // Extras only run while `use_extras` is on.
    pub extra: bool,
}

pub struct Simulation {
    slots: Vec<CraftSlot>,
    space: ToroidalSpace,
    tuning: CraftTuning,
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(space: ToroidalSpace, tuning: CraftTuning) -> Self {
        Self {
            slots: Vec::new(),
            space,
            tuning,
            config: SimulationConfig::default(),
        }
    }

    /// Primary craft at full rate plus two extras at half and quarter step sizes.
    pub fn with_default_fleet(space: ToroidalSpace, tuning: CraftTuning) -> Self {
        let mut sim = Self::new(space, tuning);
        sim.add_craft(CraftDescriptor::at(140.0, 200.0), 1, false);
        sim.add_craft(CraftDescriptor::at(200.0, 200.0), 2, true);
        sim.add_craft(CraftDescriptor::at(260.0, 200.0), 4, true);
        sim
    }

    pub fn add_craft(&mut self, descr: CraftDescriptor, substeps: u32, extra: bool) {
        self.slots.push(CraftSlot {
            craft: Craft::new(descr),
            substeps: substeps.max(1),
            extra,
        });
    }

    pub fn space(&self) -> ToroidalSpace {
        self.space
    }

    pub fn slots(&self) -> &[CraftSlot] {
        &self.slots
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn toggle_gravity(&mut self) {
        self.config.toggle_gravity();
    }

    pub fn toggle_mixed_actions(&mut self) {
        self.config.toggle_mixed_actions();
    }

    pub fn toggle_extras(&mut self) {
        self.config.toggle_extras();
    }

    fn movement_config(&self) -> MovementConfig {
        let mut cfg = MovementConfig::new(self.tuning, self.space.height);
        cfg.use_gravity = self.config.use_gravity;
        cfg.allow_mixed_actions = self.config.allow_mixed_actions;
        cfg
    }

    pub fn update<I: ActionInput + ?Sized>(
        &mut self,
        du: f32,
        input: &mut I,
        bindings: &KeyBindings,
    ) {
        self.process_diagnostics(input, bindings);

        let cfg = self.movement_config();
        let space = self.space;
        let use_extras = self.config.use_extras;

        for slot in self.slots.iter_mut().filter(|s| is_active(s, use_extras)) {
            let controls = slot.craft.controls.sample(&*input);
            let sub_du = du / slot.substeps as f32;
            for _ in 0..slot.substeps {
                slot.craft.update(sub_du, controls, &cfg);
            }

            wrap_craft(&mut slot.craft, space);
        }
    }

    // Reset and halt apply to every craft, active or not.
    fn process_diagnostics<I: ActionInput + ?Sized>(
        &mut self,
        input: &mut I,
        bindings: &KeyBindings,
    ) {
        if input.consume_and_clear(bindings.reset) {
            info!("resetting crafts");
            self.slots.iter_mut().for_each(|s| s.craft.reset());
        }

        if input.consume_and_clear(bindings.halt) {
            info!("halting crafts");
            self.slots.iter_mut().for_each(|s| s.craft.halt());
        }
    }

    /// Draws every active craft at its canonical position and at the 8 phantom offsets.
    pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let space = self.space;
        let offsets = space.phantom_offsets();
        let use_extras = self.config.use_extras;

        for slot in self.slots.iter_mut().filter(|s| is_active(s, use_extras)) {
            // Position may have been set from outside the update pass (pointer warp).
            wrap_craft(&mut slot.craft, space);

            let c = &slot.craft;
            renderer.draw_entity_at(c.x, c.y, c.rotation);
            for (dx, dy) in offsets {
                renderer.draw_entity_at(c.x + dx, c.y + dy, c.rotation);
            }
        }
    }

    /// Moves the primary craft to a pointer position.
    pub fn warp_primary(&mut self, x: f32, y: f32) {
        if let Some(slot) = self.slots.first_mut() {
            slot.craft.warp_to(x, y);
        }
    }

    pub fn snapshots(&self) -> Vec<CraftSnapshot> {
        self.slots
            .iter()
            .filter(|s| is_active(s, self.config.use_extras))
            .map(|s| CraftSnapshot::from(&s.craft))
            .collect()
    }
}

// Extras only update and render while extras mode is on.
fn is_active(slot: &CraftSlot, use_extras: bool) -> bool {
    !slot.extra || use_extras
}

fn wrap_craft(craft: &mut Craft, space: ToroidalSpace) {
    let (x, y) = space.wrap(craft.x, craft.y);
    craft.x = x;
    craft.y = y;
}
