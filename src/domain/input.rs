// Keyboard-style input: held keys plus edge-triggered consumption.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Logical key identifier. Letters are normalized to uppercase so `'w'` and `'W'` are one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub struct KeyCode(char);

impl KeyCode {
    pub fn of(key: char) -> Self {
        Self(key.to_ascii_uppercase())
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for KeyCode {
    fn from(key: char) -> Self {
        Self::of(key)
    }
}

impl From<KeyCode> for char {
    fn from(key: KeyCode) -> Self {
        key.0
    }
}

/// Port the simulation core reads input through.
pub trait ActionInput {
    /// Whether the key is currently held.
    fn is_asserted(&self, key: KeyCode) -> bool;

    /// Returns the current state of the key, then clears it until the next press.
    fn consume_and_clear(&mut self, key: KeyCode) -> bool;
}

/// Held-key set fed by key down/up events.
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    down: HashSet<KeyCode>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.down.insert(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.down.remove(&key);
    }
}

impl ActionInput for Keyboard {
    fn is_asserted(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    fn consume_and_clear(&mut self, key: KeyCode) -> bool {
        self.down.remove(&key)
    }
}

/// Movement controls sampled for one craft on one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub thrust: bool,
    pub retro: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Keys a craft listens to. Several crafts may share the same keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftControls {
    pub thrust: KeyCode,
    pub retro: KeyCode,
    pub turn_left: KeyCode,
    pub turn_right: KeyCode,
}

impl Default for CraftControls {
    fn default() -> Self {
        Self {
            thrust: KeyCode::of('W'),
            retro: KeyCode::of('S'),
            turn_left: KeyCode::of('A'),
            turn_right: KeyCode::of('D'),
        }
    }
}

impl CraftControls {
    pub fn sample<I: ActionInput + ?Sized>(&self, input: &I) -> ControlState {
        ControlState {
            thrust: input.is_asserted(self.thrust),
            retro: input.is_asserted(self.retro),
            turn_left: input.is_asserted(self.turn_left),
            turn_right: input.is_asserted(self.turn_right),
        }
    }
}

/// Process-wide key assignments for the non-movement actions.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub halt: KeyCode,
    pub reset: KeyCode,
    pub pause: KeyCode,
    pub step: KeyCode,
    pub quit: KeyCode,

    // Simulation feature toggles.
    pub extras: KeyCode,
    pub gravity: KeyCode,
    pub mixed_actions: KeyCode,

    // Presentation-only toggles.
    pub clear: KeyCode,
    pub show_box: KeyCode,
    pub undo_box: KeyCode,
    pub flip_flop: KeyCode,
    pub render: KeyCode,
    pub timer: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            halt: KeyCode::of('H'),
            reset: KeyCode::of('R'),
            pause: KeyCode::of('P'),
            step: KeyCode::of('O'),
            quit: KeyCode::of('Q'),
            extras: KeyCode::of('E'),
            gravity: KeyCode::of('G'),
            mixed_actions: KeyCode::of('M'),
            clear: KeyCode::of('C'),
            show_box: KeyCode::of('B'),
            undo_box: KeyCode::of('U'),
            flip_flop: KeyCode::of('F'),
            render: KeyCode::of('V'),
            timer: KeyCode::of('T'),
        }
    }
}
