//! Keyboard state tracking.
//!
//! Movement and the legacy camera pan only look at **held** keys: a key counts
//! every tick it is physically down. The two engine hotkeys (Escape, F3) are
//! **edge-triggered** via `is_just_pressed`, which stays true until
//! `end_frame()`. The main loop reads hotkeys once per presented frame, before
//! any ticks run, and calls `end_frame()` after presenting.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Escape,
    F3,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Drops every held key, e.g. when the window loses focus and release
    /// events would never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the direction keys the controller reads on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub pan_left: bool,
    pub pan_right: bool,
    pub pan_up: bool,
    pub pan_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
}

impl FrameInput {
    pub fn from_state(input: &InputState) -> Self {
        Self::from_held(|key| input.is_held(key))
    }

    /// Builds a snapshot from a plain list of held keys. Used by replays.
    pub fn from_keys(keys: &[Key]) -> Self {
        Self::from_held(|key| keys.contains(&key))
    }

    fn from_held(is_held: impl Fn(Key) -> bool) -> Self {
        Self {
            pan_left: is_held(Key::Left),
            pan_right: is_held(Key::Right),
            pan_up: is_held(Key::Up),
            pan_down: is_held(Key::Down),
            move_left: is_held(Key::A),
            move_right: is_held(Key::D),
            move_up: is_held(Key::W),
            move_down: is_held(Key::S),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Edge-triggered engine hotkeys, read once per presented frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hotkeys {
    pub exit: bool,
    pub toggle_overlay: bool,
}

impl Hotkeys {
    pub fn read(input: &InputState) -> Self {
        Self {
            exit: input.is_just_pressed(Key::Escape),
            toggle_overlay: input.is_just_pressed(Key::F3),
        }
    }
}
