//! Cell behaviors - emitters fire pulses, notes react to them
//!
//! Emitters (metronome, note adjuster) fire on every tick that is a
//! multiple of their `ticks_per_beat`. The new signal rests on the
//! emitter itself and starts moving on the following tick.
//!
//! Notes are the only receivers: a metronome pulse plays the note, a
//! note-adjuster pulse raises it a semitone.

use crate::cell::{CellGrid, CellKind, NotePayload, Signal, SignalKind};
use crate::core::types::Tick;
use crate::simulation::sound::SoundEventBatch;

/// Signal an emitter fires on `tick`, if any
pub fn emitter_signal(kind: &CellKind, tick: Tick) -> Option<Signal> {
    let (signal_kind, ticks_per_beat) = match *kind {
        CellKind::Metronome { ticks_per_beat } => (SignalKind::Metronome, ticks_per_beat),
        CellKind::NoteAdjuster { ticks_per_beat } => (SignalKind::NoteAdjuster, ticks_per_beat),
        _ => return None,
    };
    if ticks_per_beat == 0 {
        return None;
    }
    (tick % u64::from(ticks_per_beat) == 0).then(|| Signal::emitted(signal_kind))
}

/// Run every emitter in scan order, returns how many fired
pub fn run_emitters(grid: &mut CellGrid, tick: Tick) -> usize {
    let mut fired = 0;
    for (_, cell) in grid.iter_mut() {
        if let Some(signal) = emitter_signal(&cell.kind, tick) {
            cell.signals.push(signal);
            fired += 1;
        }
    }
    fired
}

/// A note reacting to one signal that just landed on it
pub fn receive_signal(
    note: &mut NotePayload,
    signal: &Signal,
    sounds: &mut SoundEventBatch,
    note_duration_beats: f64,
) {
    match signal.kind {
        SignalKind::Metronome => sounds.push(note.instrument, note.pitch(), note_duration_beats),
        SignalKind::NoteAdjuster => note.advance_semitone(),
    }
}
