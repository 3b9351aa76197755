//! Starting layouts built from ordinary key presses
//!
//! Patterns go through the same edit path as participants, so anything a
//! pattern places could also have been typed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cell::{CellGrid, KeyToken};
use crate::core::config::CellDefaults;
use crate::core::error::{EchoError, Result};
use crate::core::types::GRID_SIZE;
use crate::room::Room;

/// Key presses for one cell, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEdit {
    pub row: usize,
    pub col: usize,
    pub keys: Vec<String>,
}

impl PatternEdit {
    pub fn new(row: usize, col: usize, keys: &[&str]) -> Self {
        Self {
            row,
            col,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub edits: Vec<PatternEdit>,
}

const NOTE_KEYS: [&str; 7] = ["c", "d", "e", "f", "g", "a", "b"];
const ARROW_KEYS: [&str; 4] = ["up", "down", "left", "right"];
const INSTRUMENT_KEYS: [&str; 9] = ["!", "@", "#", "$", "%", "^", "&", "*", "("];

impl Pattern {
    /// A metronome feeding a short melody that loops back through
    /// redirectors, with a note adjuster walking one note up the scale
    pub fn demo() -> Self {
        Self {
            edits: vec![
                PatternEdit::new(0, 0, &["m", "4"]),
                PatternEdit::new(0, 1, &["c"]),
                PatternEdit::new(0, 2, &["e"]),
                PatternEdit::new(0, 3, &["g"]),
                PatternEdit::new(0, 5, &["ArrowDown"]),
                PatternEdit::new(2, 5, &["a", "3", "$"]),
                PatternEdit::new(4, 5, &["ArrowLeft"]),
                PatternEdit::new(4, 3, &["d", "@"]),
                PatternEdit::new(4, 2, &["f", "#"]),
                PatternEdit::new(2, 2, &["n", "8"]),
            ],
        }
    }

    /// Scatter random cells over the grid; same seed, same pattern
    ///
    /// `density` is the chance (0.0-1.0) that any given cell is filled.
    pub fn random(seed: u64, density: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let density = density.clamp(0.0, 1.0);
        let mut edits = Vec::new();

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if !rng.gen_bool(density) {
                    continue;
                }
                let digit = rng.gen_range(1..=8u8).to_string();
                let keys: Vec<String> = match rng.gen_range(0..10) {
                    0 => vec!["m".into(), digit],
                    1 => vec!["n".into(), digit],
                    2 | 3 => vec![pick(&mut rng, &ARROW_KEYS)],
                    _ => {
                        let mut keys = vec![pick(&mut rng, &NOTE_KEYS), rng.gen_range(2..=6u8).to_string()];
                        if rng.gen_bool(0.5) {
                            keys.push(pick(&mut rng, &INSTRUMENT_KEYS));
                        }
                        keys
                    }
                };
                edits.push(PatternEdit { row, col, keys });
            }
        }

        Self { edits }
    }

    /// Apply directly to a grid (no room, no events)
    pub fn apply_to_grid(&self, grid: &mut CellGrid, defaults: &CellDefaults) -> Result<()> {
        for edit in &self.edits {
            let cell = grid.get_mut(edit.row, edit.col).ok_or(EchoError::InvalidEdit {
                row: edit.row as i64,
                col: edit.col as i64,
            })?;
            for key in &edit.keys {
                cell.apply_edit(KeyToken::parse(key), defaults);
            }
        }
        Ok(())
    }

    /// Apply through a room, as if a participant typed every key
    pub async fn apply_to_room(&self, room: &Room) -> Result<()> {
        for edit in &self.edits {
            for key in &edit.keys {
                room.submit_cell_edit(edit.row as i64, edit.col as i64, key).await?;
            }
        }
        Ok(())
    }
}

fn pick(rng: &mut StdRng, keys: &[&str]) -> String {
    keys.choose(rng).copied().unwrap_or_default().to_string()
}
