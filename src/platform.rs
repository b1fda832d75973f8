//! Interfaces between the session and whatever window, input and audio
//! library is driving it.
//!
//! The session never reaches for a global: every collaborator is passed in
//! explicitly, so tests can substitute recording fakes.

use crate::game::Position;

/// Keys the session reacts to. Backends decide which physical keys map here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
}

/// Opaque handle to a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    Background,
    SnakeHead,
    SnakeBody,
    Food,
}

/// Opaque handle to a playable sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Music,
    Eat,
    Crash,
}

pub trait InputState {
    /// Pressed during the current frame
    fn is_key_just_pressed(&self, key: Key) -> bool;
    /// Down during the current frame, whether or not it was pressed this frame
    fn is_key_held(&self, key: Key) -> bool;
    /// The user asked to close the window
    fn has_quit_requested(&self) -> bool;
}

pub trait Renderer {
    fn draw_image(&mut self, image: ImageId, position: Position);
    /// Outline of a rectangle
    fn draw_rect(&mut self, position: Position, size: (f32, f32));
    fn draw_text(&mut self, text: &str, position: Position);
    /// Make everything drawn since the last call visible
    fn present_frame(&mut self);
}

pub trait Clock {
    /// Seconds elapsed since the previous call (or since construction).
    fn delta_time(&mut self) -> f32;
}

pub trait Audio {
    fn play(&mut self, sound: SoundId);
    fn play_looped(&mut self, sound: SoundId);
    fn stop(&mut self, sound: SoundId);
}
