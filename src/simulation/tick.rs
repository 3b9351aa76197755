//! Tick system - advances one room's grid by one step
//!
//! Order within a step:
//! route resting signals -> fire emitters -> deliver routed signals
//! (notes react as they receive) -> advance the tick counter
//!
//! Emitters fire before delivery, so a pulse fired this tick rests on its
//! emitter and only moves on the next tick.

use serde::Serialize;

use crate::cell::{new_cell_grid, CellGrid, CellKind};
use crate::core::config::CellDefaults;
use crate::core::types::Tick;
use crate::simulation::behavior::{receive_signal, run_emitters};
use crate::simulation::route::{route_signals, RoutedSignal};
use crate::simulation::sound::SoundEventBatch;

/// Grid plus the clock that drives it
#[derive(Debug, Clone)]
pub struct Simulation {
    pub grid: CellGrid,
    pub current_tick: Tick,
    pub note_duration_beats: f64,
}

impl Simulation {
    pub fn new(cells: &CellDefaults) -> Self {
        Self {
            grid: new_cell_grid(),
            current_tick: 0,
            note_duration_beats: cells.note_duration_beats,
        }
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&CellDefaults::default())
    }
}

/// Result of one step, handed to subscribers
#[derive(Debug, Clone, Serialize)]
pub struct TickOutput {
    /// Tick index this step ran as (before the counter advanced)
    pub tick: Tick,
    pub grid: CellGrid,
    pub sounds: SoundEventBatch,
}

/// Run one simulation step
pub fn run_simulation_tick(sim: &mut Simulation) -> TickOutput {
    let tick = sim.current_tick;

    let routed = route_signals(&mut sim.grid);
    let fired = run_emitters(&mut sim.grid, tick);
    let sounds = deliver_signals(&mut sim.grid, routed, sim.note_duration_beats);

    tracing::debug!(
        "Tick {}: {} emitters fired, {} notes played",
        tick,
        fired,
        sounds.note_count()
    );

    sim.tick();

    TickOutput {
        tick,
        grid: sim.grid.clone(),
        sounds,
    }
}

/// Drop routed signals onto their destinations, letting notes react
fn deliver_signals(
    grid: &mut CellGrid,
    routed: Vec<RoutedSignal>,
    note_duration_beats: f64,
) -> SoundEventBatch {
    let mut sounds = SoundEventBatch::new();

    for RoutedSignal { row, col, signal } in routed {
        let Some(cell) = grid.get_mut(row, col) else {
            continue;
        };
        cell.signals.push(signal);
        if let CellKind::Note(note) = &mut cell.kind {
            receive_signal(note, &signal, &mut sounds, note_duration_beats);
        }
    }

    sounds
}
