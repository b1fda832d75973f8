//! Grid Snake - classic Snake on a fixed board
//!
//! - `game`: board, snake, spawner and the session state machine
//! - `platform`: the narrow input/render/audio/clock interfaces the session consumes
//! - `backend`: macroquad implementations of those interfaces plus asset loading
//! - `save`: best score persistence

pub mod backend;
pub mod game;
pub mod platform;
pub mod save;
