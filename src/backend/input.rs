use macroquad::input::{KeyCode, is_key_down, is_key_pressed, is_quit_requested, prevent_quit};
use macroquad::time::get_time;

use crate::platform::{Clock, InputState, Key};

/// Keyboard state read straight from macroquad for the current frame
pub struct MacroquadInput;

impl MacroquadInput {
    /// Takes over the window close button so it can be reported as a quit
    /// request instead of terminating the process.
    pub fn new() -> Self {
        prevent_quit();
        Self
    }

    /// Start another game from the game-over screen
    pub fn restart_pressed(&self) -> bool {
        is_key_pressed(KeyCode::R) || is_key_pressed(KeyCode::Enter)
    }

    /// Leave from the game-over screen
    pub fn exit_pressed(&self) -> bool {
        self.has_quit_requested() || self.is_key_just_pressed(Key::Escape)
    }
}

impl Default for MacroquadInput {
    fn default() -> Self {
        Self::new()
    }
}

fn key_codes(key: Key) -> [KeyCode; 2] {
    match key {
        Key::Up => [KeyCode::Up, KeyCode::W],
        Key::Down => [KeyCode::Down, KeyCode::S],
        Key::Left => [KeyCode::Left, KeyCode::A],
        Key::Right => [KeyCode::Right, KeyCode::D],
        Key::Escape => [KeyCode::Escape, KeyCode::Q],
    }
}

impl InputState for MacroquadInput {
    fn is_key_just_pressed(&self, key: Key) -> bool {
        key_codes(key).into_iter().any(is_key_pressed)
    }

    fn is_key_held(&self, key: Key) -> bool {
        key_codes(key).into_iter().any(is_key_down)
    }

    fn has_quit_requested(&self) -> bool {
        is_quit_requested()
    }
}

/// Monotonic frame timer over macroquad's `get_time`
pub struct MacroquadClock {
    last: f64,
}

impl MacroquadClock {
    pub fn new() -> Self {
        Self { last: get_time() }
    }
}

impl Default for MacroquadClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MacroquadClock {
    fn delta_time(&mut self) -> f32 {
        let now = get_time();
        let dt = (now - self.last).max(0.0);
        self.last = now;
        dt as f32
    }
}
