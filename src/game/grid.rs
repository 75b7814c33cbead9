//! Board geometry
//!
//! Turns a board size in pixels into the discrete grid the simulation runs
//! on. Everything here is derived once at start-up and never changes for the
//! rest of the session.

use super::state::Cell;
use crate::error::ConfigError;

/// The board is always split into this many columns, whatever its width.
pub const COLUMNS: u32 = 20;

/// Rows needed to keep the seed cell inside the bottom wall.
pub const MIN_ROWS: u32 = 8;

/// Keeps the drawn board height within a terminal's u16 coordinates.
pub const MAX_ROWS: u32 = 4096;

/// Rows below the bottom wall are reserved for score text.
const BOTTOM_RESERVED_CELLS: i32 = 3;

/// Discrete play field derived from the configured board size
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cell_size: i32,
    wall_gap: i32,
    horizontal_cells: i32,
    vertical_cells: i32,
    x_candidates: Vec<i32>,
    y_candidates: Vec<i32>,
}

impl Grid {
    /// Build the grid for a board of `width` x `height` pixels.
    ///
    /// `unit` is a density-like scale used only for the wall thickness.
    pub fn new(width: u32, height: u32, unit: f32) -> Result<Self, ConfigError> {
        if width < COLUMNS {
            return Err(ConfigError::BoardTooNarrow {
                width,
                columns: COLUMNS,
            });
        }
        if !unit.is_finite() || unit < 0.0 {
            return Err(ConfigError::InvalidUnit(unit));
        }

        let too_large = || ConfigError::BoardTooLarge {
            width,
            height,
            max_rows: MAX_ROWS,
        };
        // Every pixel coordinate stays within the board, so both sides
        // fitting in i32 keeps all cell arithmetic below from overflowing
        let width_px = i32::try_from(width).map_err(|_| too_large())?;
        let height_px = i32::try_from(height).map_err(|_| too_large())?;

        let cell_size = width / COLUMNS;
        let rows = height / cell_size;
        if rows < MIN_ROWS {
            return Err(ConfigError::BoardTooShort {
                height,
                rows,
                min: MIN_ROWS,
            });
        }
        if rows > MAX_ROWS {
            return Err(too_large());
        }

        let cell_size = i32::try_from(cell_size).map_err(|_| too_large())?;
        let horizontal_cells = width_px / cell_size;
        let vertical_cells = height_px / cell_size;

        let x_candidates = (1..=horizontal_cells - 2).map(|i| i * cell_size).collect();
        let y_candidates = (1..=vertical_cells - 4).map(|i| i * cell_size).collect();

        Ok(Self {
            cell_size,
            wall_gap: (unit * 10.0).floor() as i32,
            horizontal_cells,
            vertical_cells,
            x_candidates,
            y_candidates,
        })
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Thickness of the wall inset, in pixels
    pub fn wall_gap(&self) -> i32 {
        self.wall_gap
    }

    pub fn horizontal_cells(&self) -> i32 {
        self.horizontal_cells
    }

    pub fn vertical_cells(&self) -> i32 {
        self.vertical_cells
    }

    pub fn playable_width(&self) -> i32 {
        self.horizontal_cells * self.cell_size
    }

    pub fn playable_height(&self) -> i32 {
        self.vertical_cells * self.cell_size
    }

    /// Where a fresh snake starts
    pub fn seed_cell(&self) -> Cell {
        Cell::new(4 * self.cell_size, 4 * self.cell_size)
    }

    pub fn exit_cell(&self) -> Cell {
        Cell::new(
            self.horizontal_cells / 2 * self.cell_size,
            self.vertical_cells / 2 * self.cell_size,
        )
    }

    /// Wall hit test.
    ///
    /// The margins are asymmetric: left and top walls sit on the zero lines,
    /// the right wall one cell in from the edge and the bottom wall three
    /// cells in, leaving room for the score line. Only exact matches count.
    pub fn is_wall(&self, cell: Cell) -> bool {
        cell.x == 0
            || cell.y == 0
            || cell.x == self.playable_width() - self.cell_size
            || cell.y == self.playable_height() - BOTTOM_RESERVED_CELLS * self.cell_size
    }

    /// Cell rows between the top wall and the bottom wall, inclusive of both
    pub fn field_rows(&self) -> i32 {
        self.vertical_cells - BOTTOM_RESERVED_CELLS + 1
    }

    pub fn x_candidates(&self) -> &[i32] {
        &self.x_candidates
    }

    pub fn y_candidates(&self) -> &[i32] {
        &self.y_candidates
    }

    /// Every cell food may be placed on, row by row
    pub fn food_candidates(&self) -> impl Iterator<Item = Cell> + '_ {
        self.y_candidates
            .iter()
            .flat_map(move |&y| self.x_candidates.iter().map(move |&x| Cell::new(x, y)))
    }
}
