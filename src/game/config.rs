use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::direction::Direction;
use super::grid::{Cell, Grid};
use super::spawner::SpawnPolicy;

/// Largest accepted number of columns or rows
pub const MAX_BOARD_CELLS: u32 = 4096;

/// Board dimensions and tuning, fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of columns on the board
    pub columns: u32,
    /// Number of rows on the board
    pub rows: u32,
    /// Edge length of one cell in pixels
    pub cell_size: f32,

    /// Starting snake, head first; consecutive cells must be adjacent
    pub start_cells: Vec<Cell>,
    /// Heading of the head when the session starts
    pub start_direction: Direction,

    /// Movement speed in cells per second
    pub velocity: f32,
    /// Added to `velocity` every time food is eaten
    pub acceleration: f32,

    /// Frame presentations per second, independent of movement
    pub render_fps: f32,
    /// Upper bound on a single frame's elapsed time, in seconds
    pub max_frame_delta: f32,

    pub self_collision: bool,
    /// Number of segments right behind the head that self-collision ignores
    pub self_collision_buffer: usize,
    pub food_collision: bool,

    pub spawn: SpawnPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 20,
            cell_size: 32.0,
            start_cells: vec![Cell::new(3, 2), Cell::new(3, 1), Cell::new(3, 0)],
            start_direction: Direction::Down,
            velocity: 4.0,
            acceleration: 0.5,
            render_fps: 60.0,
            max_frame_delta: 0.25,
            self_collision: true,
            self_collision_buffer: 2,
            food_collision: true,
            spawn: SpawnPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    /// Read a JSON config; fields missing from the file keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.columns, self.rows, self.cell_size)
    }

    /// Seconds between two presented frames
    pub fn render_interval(&self) -> f32 {
        1.0 / self.render_fps
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 || self.rows < 2 {
            return Err(ConfigError::BoardTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.columns > MAX_BOARD_CELLS || self.rows > MAX_BOARD_CELLS {
            return Err(ConfigError::BoardTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(self.velocity.is_finite() && self.velocity > 0.0) {
            return Err(ConfigError::InvalidVelocity(self.velocity));
        }
        if !(self.acceleration.is_finite() && self.acceleration >= 0.0) {
            return Err(ConfigError::InvalidAcceleration(self.acceleration));
        }
        if !(self.render_fps.is_finite() && self.render_fps > 0.0) {
            return Err(ConfigError::InvalidRenderRate(self.render_fps));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(ConfigError::InvalidFrameDelta(self.max_frame_delta));
        }

        let grid = self.grid();
        if self.start_cells.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        for &cell in &self.start_cells {
            if grid.is_out_of_bounds(grid.cell_to_pixel(cell)) {
                return Err(ConfigError::StartOutOfBounds(cell));
            }
        }
        for (index, pair) in self.start_cells.windows(2).enumerate() {
            if !pair[0].is_adjacent(pair[1]) {
                return Err(ConfigError::StartNotContiguous { index: index + 1 });
            }
        }
        for (index, cell) in self.start_cells.iter().enumerate().skip(1) {
            if self.start_cells[..index].contains(cell) {
                return Err(ConfigError::StartOverlaps { index });
            }
        }

        Ok(())
    }
}

/// Problems that prevent a session from starting
#[derive(Debug)]
pub enum ConfigError {
    BoardTooSmall { columns: u32, rows: u32 },
    BoardTooLarge { columns: u32, rows: u32 },
    InvalidCellSize(f32),
    InvalidVelocity(f32),
    InvalidAcceleration(f32),
    InvalidRenderRate(f32),
    InvalidFrameDelta(f32),
    EmptySnake,
    StartOutOfBounds(Cell),
    /// Segment `index` is not adjacent to the segment before it
    StartNotContiguous { index: usize },
    /// Segment `index` sits on a cell already taken by an earlier segment
    StartOverlaps { index: usize },
    /// The starting snake leaves no cell for food
    NoRoomForFood,
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BoardTooSmall { columns, rows } => {
                write!(f, "board of {columns}x{rows} cells is too small (minimum 2x2)")
            }
            ConfigError::BoardTooLarge { columns, rows } => write!(
                f,
                "board of {columns}x{rows} cells is too large (maximum {MAX_BOARD_CELLS}x{MAX_BOARD_CELLS})"
            ),
            ConfigError::InvalidCellSize(size) => write!(f, "invalid cell size {size}"),
            ConfigError::InvalidVelocity(v) => write!(f, "velocity must be positive, got {v}"),
            ConfigError::InvalidAcceleration(a) => {
                write!(f, "acceleration must not be negative, got {a}")
            }
            ConfigError::InvalidRenderRate(fps) => {
                write!(f, "render rate must be positive, got {fps}")
            }
            ConfigError::InvalidFrameDelta(d) => {
                write!(f, "maximum frame delta must be positive, got {d}")
            }
            ConfigError::EmptySnake => write!(f, "the starting snake has no segments"),
            ConfigError::StartOutOfBounds(cell) => write!(
                f,
                "starting segment at ({}, {}) is outside the playable board",
                cell.col, cell.row
            ),
            ConfigError::StartNotContiguous { index } => {
                write!(f, "starting segment {index} is not adjacent to the one before it")
            }
            ConfigError::StartOverlaps { index } => {
                write!(f, "starting segment {index} overlaps an earlier segment")
            }
            ConfigError::NoRoomForFood => write!(f, "no free cell left to place food"),
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "cannot parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spawner::SpawnRange;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.columns, 20);
        assert_eq!(config.rows, 20);
        assert_eq!(config.start_cells.len(), 3);
        assert!(config.validate().is_ok());
        assert!((config.render_interval() - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.columns, 15);
        assert_eq!(config.rows, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_board_too_small() {
        let config = GameConfig::new(1, 20);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { columns: 1, rows: 20 })
        ));
    }

    #[test]
    fn test_board_too_large() {
        let config = GameConfig::new(MAX_BOARD_CELLS + 1, 20);
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooLarge { .. })));

        let config = GameConfig::new(20, u32::MAX);
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooLarge { .. })));

        assert!(GameConfig::new(MAX_BOARD_CELLS, MAX_BOARD_CELLS).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let mut config = GameConfig::default();
        config.velocity = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidVelocity(_))));

        let mut config = GameConfig::default();
        config.cell_size = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCellSize(_))));

        let mut config = GameConfig::default();
        config.render_fps = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRenderRate(_))));
    }

    #[test]
    fn test_start_snake_must_fit_playable_area() {
        let mut config = GameConfig::new(10, 10);
        // Last column is lethal under the wall rule
        config.start_cells = vec![Cell::new(9, 2), Cell::new(8, 2)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds(Cell { col: 9, row: 2 }))
        ));

        config.start_cells = vec![];
        assert!(matches!(config.validate(), Err(ConfigError::EmptySnake)));
    }

    #[test]
    fn test_start_snake_must_be_contiguous() {
        let mut config = GameConfig::default();
        config.start_cells = vec![Cell::new(3, 2), Cell::new(3, 1), Cell::new(4, 0)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartNotContiguous { index: 2 })
        ));
    }

    #[test]
    fn test_start_snake_must_not_fold_onto_itself() {
        let mut config = GameConfig::default();
        config.start_cells = vec![Cell::new(3, 2), Cell::new(3, 1), Cell::new(3, 2)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOverlaps { index: 2 })
        ));

        config.start_cells = vec![
            Cell::new(4, 4),
            Cell::new(4, 5),
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 4),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOverlaps { index: 4 })
        ));
    }

    #[test]
    fn test_fractional_cell_size_is_accepted() {
        let mut config = GameConfig::default();
        config.cell_size = 10.3;
        assert!(config.validate().is_ok());
        // Column 18 is the last playable one at any cell size
        config.start_cells = vec![Cell::new(18, 2), Cell::new(17, 2)];
        assert!(config.validate().is_ok());
        config.start_cells = vec![Cell::new(19, 2), Cell::new(18, 2)];
        assert!(matches!(config.validate(), Err(ConfigError::StartOutOfBounds(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "columns": 30, "self_collision": false, "spawn": { "range": "FullBoard" } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.columns, 30);
        assert_eq!(config.rows, 20);
        assert!(!config.self_collision);
        assert_eq!(config.spawn.range, SpawnRange::FullBoard);
        assert!(config.spawn.avoid_snake);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConfig::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let path = std::env::temp_dir().join(format!("gridsnake-bad-{}.json", std::process::id()));
        fs::write(&path, "{ columns: nope").unwrap();
        let result = GameConfig::from_json_file(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
