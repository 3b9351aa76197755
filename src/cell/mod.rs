//! Cell model: what a grid cell can be and how key presses change it

pub mod edit;
pub mod pitch;
pub mod signal;
pub mod types;

pub use edit::KeyToken;
pub use signal::{Signal, SignalKind};
pub use types::{Accidental, Cell, CellKind, CellType, Instrument, NoteLetter, NotePayload};

use crate::core::types::GRID_SIZE;
use crate::spatial::grid::Grid;

/// The room's playing field
pub type CellGrid = Grid<Cell>;

/// A fresh all-empty grid of the standard size
pub fn new_cell_grid() -> CellGrid {
    Grid::square(GRID_SIZE)
}
