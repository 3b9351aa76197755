//! Room state guarded by the room's lock
//!
//! Everything here is synchronous. The timer task and request handlers in
//! `room` take the lock, call into the session, and release it; that lock
//! is what keeps ticks and edits from interleaving.

use ahash::AHashSet;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::cell::{CellGrid, KeyToken};
use crate::core::config::{CellDefaults, EngineConfig};
use crate::core::error::{EchoError, Result};
use crate::core::types::{ParticipantId, RoomCode, Tick};
use crate::simulation::Simulation;

/// Current tick period and the range participants may move it within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelaySettings {
    pub delay_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl DelaySettings {
    pub fn check(&self, requested_ms: u64) -> Result<()> {
        if requested_ms < self.min_delay_ms || requested_ms > self.max_delay_ms {
            return Err(EchoError::InvalidDelay {
                requested: requested_ms,
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        Ok(())
    }
}

/// The armed tick timer, tagged with the epoch it was armed in
#[derive(Debug)]
pub(crate) struct Ticker {
    pub epoch: u64,
    pub handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct RoomSession {
    pub code: RoomCode,
    pub sim: Simulation,
    cells: CellDefaults,
    delay: DelaySettings,
    participants: AHashSet<ParticipantId>,
    ticker: Option<Ticker>,
    /// Bumped every time a timer is armed; a timer whose epoch is stale must not tick
    epoch: u64,
}

impl RoomSession {
    pub fn new(code: RoomCode, config: &EngineConfig) -> Self {
        Self {
            code,
            sim: Simulation::new(&config.cells),
            cells: config.cells.clone(),
            delay: DelaySettings {
                delay_ms: config.timing.default_delay_ms,
                min_delay_ms: config.timing.min_delay_ms,
                max_delay_ms: config.timing.max_delay_ms,
            },
            participants: AHashSet::new(),
            ticker: None,
            epoch: 0,
        }
    }

    pub fn grid(&self) -> &CellGrid {
        &self.sim.grid
    }

    pub fn tick_count(&self) -> Tick {
        self.sim.current_tick
    }

    pub fn delay(&self) -> DelaySettings {
        self.delay
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn has_participant(&self, id: &ParticipantId) -> bool {
        self.participants.contains(id)
    }

    /// Whether a tick timer is armed
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Add a participant; true if this was the first one
    pub fn add_participant(&mut self, id: ParticipantId) -> bool {
        self.participants.insert(id) && self.participants.len() == 1
    }

    /// Remove a participant; true if that left the room empty
    pub fn remove_participant(&mut self, id: &ParticipantId) -> bool {
        self.participants.remove(id) && self.participants.is_empty()
    }

    /// Apply one key press to the cell at (row, col)
    ///
    /// Coordinates come straight from clients, so they are signed and
    /// bounds-checked here. Unrecognized keys succeed without changing
    /// anything.
    pub fn apply_edit(&mut self, row: i64, col: i64, key: &str) -> Result<()> {
        let grid = &mut self.sim.grid;
        let (row, col) = grid
            .checked_coords(row, col)
            .ok_or(EchoError::InvalidEdit { row, col })?;
        if let Some(cell) = grid.get_mut(row, col) {
            cell.apply_edit(KeyToken::parse(key), &self.cells);
        }
        Ok(())
    }

    /// Validate and store a new tick period; the caller re-arms the timer
    pub fn set_delay(&mut self, delay_ms: u64) -> Result<DelaySettings> {
        self.delay.check(delay_ms)?;
        self.delay.delay_ms = delay_ms;
        Ok(self.delay)
    }

    pub(crate) fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a new epoch for a timer about to be armed
    pub(crate) fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Install a freshly spawned timer, aborting any previous one
    pub(crate) fn install_ticker(&mut self, ticker: Ticker) {
        if let Some(old) = self.ticker.replace(ticker) {
            old.handle.abort();
        }
    }

    /// Abort the armed timer, if any; true if one was running
    pub(crate) fn stop_ticker(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                // Invalidate the epoch too, in case the task already passed its await point
                self.epoch += 1;
                ticker.handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
