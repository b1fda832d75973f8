use serde::{Deserialize, Serialize};

/// Heading of the snake head or of a single body segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Cell delta (dx, dy) for one move; rows grow downwards
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction of a single-cell move from `from` to `to`, if they are adjacent.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
        let delta = (to.0 - from.0, to.1 - from.1);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}
