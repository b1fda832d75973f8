use super::config::ConfigError;
use super::direction::Direction;
use super::entity::{Entity, Sprite, SpriteSet};
use super::grid::{Cell, Grid, Position};

/// The snake: segment entities, head at index 0.
///
/// Segments never move independently. On every step each one takes the
/// cell and heading of the segment in front of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Entity>,
    body_sprite: Sprite,
    grid: Grid,
}

impl Snake {
    /// Build a snake from head-first cells.
    ///
    /// Body segments face the segment ahead of them; the head faces `heading`.
    pub fn new(
        grid: &Grid,
        cells: &[Cell],
        heading: Direction,
        sprites: &SpriteSet,
    ) -> Result<Self, ConfigError> {
        if cells.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        let mut segments = Vec::with_capacity(cells.len());
        segments.push(Entity::new(cells[0], heading, sprites.head));
        for (i, pair) in cells.windows(2).enumerate() {
            let (ahead, cell) = (pair[0], pair[1]);
            let direction = Direction::between((cell.col, cell.row), (ahead.col, ahead.row))
                .ok_or(ConfigError::StartNotContiguous { index: i + 1 })?;
            if cells[..=i].contains(&cell) {
                return Err(ConfigError::StartOverlaps { index: i + 1 });
            }
            segments.push(Entity::new(cell, direction, sprites.body));
        }

        Ok(Self {
            segments,
            body_sprite: sprites.body,
            grid: *grid,
        })
    }

    pub fn head(&self) -> &Entity {
        &self.segments[0]
    }

    pub fn head_cell(&self) -> Cell {
        self.head().cell
    }

    pub fn head_position(&self) -> Position {
        self.head().position(&self.grid)
    }

    /// Direction the head moved on the last step
    pub fn heading(&self) -> Direction {
        self.head().direction
    }

    pub fn segments(&self) -> &[Entity] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Board cells under each segment, head first
    pub fn cells(&self) -> Vec<Cell> {
        self.segments.iter().map(|segment| segment.cell).collect()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.iter().any(|segment| segment.cell == cell)
    }

    /// Move one cell. Ignored, returning false, when `direction` reverses the heading.
    pub fn step(&mut self, direction: Direction) -> bool {
        if self.heading().is_opposite(direction) {
            return false;
        }

        for i in (1..self.segments.len()).rev() {
            let ahead = self.segments[i - 1];
            let segment = &mut self.segments[i];
            segment.cell = ahead.cell;
            segment.direction = ahead.direction;
        }

        let head = &mut self.segments[0];
        head.cell = head.cell.moved_in_direction(direction);
        head.direction = direction;
        true
    }

    /// Append a segment one cell behind the tail, facing the way the tail does.
    pub fn grow(&mut self) {
        let tail = self.segments[self.segments.len() - 1];
        let cell = tail.cell.moved_in_direction(tail.direction.opposite());
        self.segments
            .push(Entity::new(cell, tail.direction, self.body_sprite));
    }

    /// Head against every segment past the first `buffer` body segments.
    pub fn check_self_collision(&self, buffer: usize) -> bool {
        let head = self.head();
        self.segments
            .iter()
            .skip(1 + buffer)
            .any(|segment| head.overlaps(segment, &self.grid))
    }
}
