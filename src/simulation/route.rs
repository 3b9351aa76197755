//! Signal routing - moves every resting signal one cell along its heading
//!
//! A redirector rewrites the heading of every signal leaving it; any other
//! cell lets signals through unchanged. Signals that would step off the
//! grid are dropped.

use crate::cell::{CellGrid, CellKind, Signal};

/// A signal on its way to (row, col), delivered later in the same tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedSignal {
    pub row: usize,
    pub col: usize,
    pub signal: Signal,
}

/// Take every cell's resting signals and compute where each one lands
///
/// Leaves every cell with no signals. The result is in scan order
/// (row-major, then the order signals rested on their cell); several
/// entries may share a destination.
pub fn route_signals(grid: &mut CellGrid) -> Vec<RoutedSignal> {
    let mut routed = Vec::new();

    for row in 0..grid.height {
        for col in 0..grid.width {
            let Some(cell) = grid.get_mut(row, col) else {
                continue;
            };
            if cell.signals.is_empty() {
                continue;
            }
            let redirect = match cell.kind {
                CellKind::Redirector { direction } => Some(direction),
                _ => None,
            };
            let signals = std::mem::take(&mut cell.signals);

            for mut signal in signals {
                if let Some(direction) = redirect {
                    signal.direction = direction;
                }
                if let Some((dest_row, dest_col)) = grid.neighbor(row, col, signal.direction) {
                    routed.push(RoutedSignal {
                        row: dest_row,
                        col: dest_col,
                        signal,
                    });
                }
            }
        }
    }

    routed
}
