//! Core game logic.
//!
//! Nothing in here talks to macroquad directly. The session consumes input,
//! draw calls and sounds through the traits in [`crate::platform`].

pub mod config;
pub mod direction;
pub mod entity;
pub mod grid;
pub mod session;
pub mod snake;
pub mod spawner;

pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use entity::{BoundingBox, Entity, Sprite, SpriteSet, overlaps};
pub use grid::{Cell, Grid, Position};
pub use session::{CollisionType, Session, SessionState, StepInfo, StopReason};
pub use snake::Snake;
pub use spawner::{FoodSpawner, SpawnPolicy, SpawnRange};
