//! Per-tick sound events grouped by instrument

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::Instrument;

/// Notes one instrument plays this tick
///
/// `pitches[i]` lasts `durations[i]` beats.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct InstrumentSounds {
    pub pitches: Vec<String>,
    pub durations: Vec<f64>,
}

impl InstrumentSounds {
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}

/// Everything triggered during one tick
///
/// Every instrument always has an entry; an empty entry means that
/// instrument stays silent this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundEventBatch {
    by_instrument: [InstrumentSounds; 9],
}

impl SoundEventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instrument: Instrument, pitch: String, duration: f64) {
        let sounds = &mut self.by_instrument[instrument as usize];
        sounds.pitches.push(pitch);
        sounds.durations.push(duration);
    }

    pub fn get(&self, instrument: Instrument) -> &InstrumentSounds {
        &self.by_instrument[instrument as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Instrument, &InstrumentSounds)> + '_ {
        Instrument::ALL.into_iter().zip(self.by_instrument.iter())
    }

    pub fn note_count(&self) -> usize {
        self.by_instrument.iter().map(|s| s.pitches.len()).sum()
    }

    pub fn is_silent(&self) -> bool {
        self.by_instrument.iter().all(InstrumentSounds::is_empty)
    }
}

/// Serialized as a map from instrument name to its sounds
impl Serialize for SoundEventBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Instrument::ALL.len()))?;
        for (instrument, sounds) in self.iter() {
            map.serialize_entry(instrument.name(), sounds)?;
        }
        map.end()
    }
}
