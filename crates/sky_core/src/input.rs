//! Keyboard state tracking with a current and a previous-frame snapshot.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like free-fly movement.
//!
//! - **Edge-triggered (just_pressed / just_released):** derived by comparing the
//!   current set against the snapshot taken at the end of the previous frame.
//!   The snapshot is refreshed by `end_frame()`, which the main loop calls once
//!   per frame *after* every edge-triggered consumer has run. Calling it earlier
//!   would make every press invisible to the toggles.

use std::collections::HashSet;

/// Number of slots in the legacy dense key table (codes 0..319).
pub const KEY_CODE_COUNT: u16 = 320;

const SPECIAL_BASE: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    LShift,
    Digit1,
    Digit2,
    E,
    W,
    A,
    S,
    D,
    F3,
    F6,
    F7,
    F8,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Escape,
        Key::Space,
        Key::LShift,
        Key::Digit1,
        Key::Digit2,
        Key::E,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::F3,
        Key::F6,
        Key::F7,
        Key::F8,
    ];

    /// Legacy numeric code: printable keys use their upper-case ASCII value,
    /// special keys live above 256.
    pub const fn code(self) -> u16 {
        match self {
            Key::Space => 32,
            Key::Digit1 => b'1' as u16,
            Key::Digit2 => b'2' as u16,
            Key::E => b'E' as u16,
            Key::W => b'W' as u16,
            Key::A => b'A' as u16,
            Key::S => b'S' as u16,
            Key::D => b'D' as u16,
            Key::Escape => SPECIAL_BASE + 1,
            Key::F3 => SPECIAL_BASE + 4,
            Key::F6 => SPECIAL_BASE + 7,
            Key::F7 => SPECIAL_BASE + 8,
            Key::F8 => SPECIAL_BASE + 9,
            Key::LShift => SPECIAL_BASE + 31,
        }
    }

    pub fn from_code(code: u16) -> Option<Key> {
        if code >= KEY_CODE_COUNT {
            return None;
        }
        Key::ALL.iter().copied().find(|key| key.code() == code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: HashSet<Key>,
    previous: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.current.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.current.remove(&key);
    }

    /// Applies a raw legacy key code. Codes with no `Key` mapping are dropped.
    pub fn set_key_code(&mut self, code: u16, pressed: bool) {
        let Some(key) = Key::from_code(code) else {
            log::trace!("Ignoring unmapped key code {code}");
            return;
        };
        if pressed {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.current.contains(&key)
    }

    pub fn was_held(&self, key: Key) -> bool {
        self.previous.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.is_held(key) && !self.was_held(key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        !self.is_held(key) && self.was_held(key)
    }

    /// Releases every key, e.g. when the window loses focus. The previous
    /// snapshot is kept so the release still reads as an edge this frame.
    pub fn release_all(&mut self) {
        self.current.clear();
    }

    /// `previous := current`. Must run after all edge-triggered logic.
    pub fn end_frame(&mut self) {
        self.previous.clone_from(&self.current);
    }
}
