use super::direction::Direction;
use super::grid::{Cell, Grid, Position};
use crate::platform::ImageId;

/// Visual handle plus the pixel extents used for collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub image: ImageId,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    pub fn new(image: ImageId, width: f32, height: f32) -> Self {
        Self {
            image,
            width,
            height,
        }
    }

    /// Square sprite covering exactly one cell
    pub fn cell_sized(image: ImageId, cell_size: f32) -> Self {
        Self::new(image, cell_size, cell_size)
    }
}

/// The sprites a session needs, with sizes taken from the loaded images
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSet {
    pub head: Sprite,
    pub body: Sprite,
    pub food: Sprite,
}

impl SpriteSet {
    pub fn cell_sized(cell_size: f32) -> Self {
        Self {
            head: Sprite::cell_sized(ImageId::SnakeHead, cell_size),
            body: Sprite::cell_sized(ImageId::SnakeBody, cell_size),
            food: Sprite::cell_sized(ImageId::Food, cell_size),
        }
    }
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        overlaps(self, other)
    }
}

/// Strict AABB intersection. Boxes that only share an edge do not overlap.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Anything that sits on the board: snake segments and food.
///
/// The cell is authoritative; pixel positions are derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub cell: Cell,
    pub direction: Direction,
    pub sprite: Sprite,
}

impl Entity {
    pub fn new(cell: Cell, direction: Direction, sprite: Sprite) -> Self {
        Self {
            cell,
            direction,
            sprite,
        }
    }

    /// Top-left corner on screen
    pub fn position(&self, grid: &Grid) -> Position {
        grid.cell_to_pixel(self.cell)
    }

    /// Collision box in board units: the cell is the top-left corner and the
    /// sprite size is divided by the cell size. Neighbouring cells share an
    /// edge exactly whatever the pixel size of a cell.
    pub fn bounds(&self, grid: &Grid) -> BoundingBox {
        let size = grid.cell_size();
        BoundingBox::new(
            self.cell.col as f32,
            self.cell.row as f32,
            self.sprite.width / size,
            self.sprite.height / size,
        )
    }

    pub fn overlaps(&self, other: &Entity, grid: &Grid) -> bool {
        overlaps(&self.bounds(grid), &other.bounds(grid))
    }
}
