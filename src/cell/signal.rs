//! Signals: transient pulses that travel one cell per tick

use serde::{Deserialize, Serialize};

use crate::core::types::Direction;

/// Which emitter produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    /// Triggers notes it lands on
    Metronome,
    /// Raises the pitch of notes it lands on by one semitone
    NoteAdjuster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub direction: Direction,
}

impl Signal {
    pub fn new(kind: SignalKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    /// Fresh signal from an emitter cell
    ///
    /// Emitters have no configurable heading yet: metronome pulses start
    /// east, note-adjuster pulses start south.
    pub fn emitted(kind: SignalKind) -> Self {
        let direction = match kind {
            SignalKind::Metronome => Direction::East,
            SignalKind::NoteAdjuster => Direction::South,
        };
        Self::new(kind, direction)
    }
}
