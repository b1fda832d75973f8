use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};

/// Rejected samples tolerated before falling back to scanning free cells
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Which cells the spawner samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnRange {
    /// [0, columns - 1) x [0, rows - 1). The last column and row are lethal
    /// under the wall rule, so food never lands there.
    #[default]
    ExcludeLastRowColumn,
    /// [0, columns) x [0, rows)
    FullBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPolicy {
    pub range: SpawnRange,
    /// Resample when the drawn cell is under the snake
    pub avoid_snake: bool,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            range: SpawnRange::ExcludeLastRowColumn,
            avoid_snake: true,
        }
    }
}

/// Picks the cell for the next food item
pub struct FoodSpawner<R> {
    policy: SpawnPolicy,
    columns: i32,
    rows: i32,
    rng: R,
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(grid: &Grid, policy: SpawnPolicy, rng: R) -> Self {
        let (columns, rows) = match policy.range {
            SpawnRange::ExcludeLastRowColumn => {
                (grid.columns().saturating_sub(1), grid.rows().saturating_sub(1))
            }
            SpawnRange::FullBoard => (grid.columns(), grid.rows()),
        };
        Self {
            policy,
            columns: i32::try_from(columns).unwrap_or(i32::MAX),
            rows: i32::try_from(rows).unwrap_or(i32::MAX),
            rng,
        }
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Uniformly sample a cell in the configured range.
    ///
    /// With `avoid_snake` set, cells in `occupied` are never returned and
    /// `None` means every cell in range is taken.
    pub fn spawn(&mut self, occupied: &[Cell]) -> Option<Cell> {
        if self.columns <= 0 || self.rows <= 0 {
            return None;
        }
        if !self.policy.avoid_snake {
            return Some(self.sample());
        }

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let cell = self.sample();
            if !occupied.contains(&cell) {
                return Some(cell);
            }
        }

        // Crowded board: pick uniformly among what is left
        let free: Vec<Cell> = (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |col| Cell::new(col, row)))
            .filter(|cell| !occupied.contains(cell))
            .collect();
        log::debug!(
            "food sampling fell back to scanning, {} free cells",
            free.len()
        );
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }

    fn sample(&mut self) -> Cell {
        Cell::new(
            self.rng.gen_range(0..self.columns),
            self.rng.gen_range(0..self.rows),
        )
    }
}
