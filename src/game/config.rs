use serde::{Deserialize, Serialize};

use super::state::Position;

/// Geometry of the playing field
///
/// `width` and `height` are expressed in the same coordinate units as
/// positions; every position the game produces is a multiple of `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width of the field in coordinate units
    pub width: i32,
    /// Height of the field in coordinate units
    pub height: i32,
    /// Edge length of one cell
    pub cell_size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            cell_size: 10,
        }
    }
}

impl GridConfig {
    /// Create a new configuration with custom dimensions
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Create a small grid for testing (8x6 cells)
    pub fn small() -> Self {
        Self::new(80, 60, 10)
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Check if a position lies inside the field
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The cell at the centre of the field, snapped to the cell grid
    pub fn center(&self) -> Position {
        Position::new(
            self.snap(self.width / 2),
            self.snap(self.height / 2),
        )
    }

    /// Position of the cell at column `col`, row `row`
    pub fn cell(&self, col: i32, row: i32) -> Position {
        Position::new(col * self.cell_size, row * self.cell_size)
    }

    fn snap(&self, coord: i32) -> i32 {
        (coord / self.cell_size) * self.cell_size
    }

    /// Validate the geometry
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0 {
            return Err(format!("cell_size must be positive, got {}", self.cell_size));
        }

        if self.width < self.cell_size || self.height < self.cell_size {
            return Err(format!(
                "grid {}x{} cannot hold a single cell of size {}",
                self.width, self.height, self.cell_size
            ));
        }

        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return Err(format!(
                "grid {}x{} is not a multiple of cell_size {}",
                self.width, self.height, self.cell_size
            ));
        }

        if self.columns() * self.rows() < 2 {
            return Err(format!(
                "grid {}x{} needs room for the snake and the food",
                self.width, self.height
            ));
        }

        Ok(())
    }
}
