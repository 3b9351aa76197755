//! Cell variants and their payloads
//!
//! A cell is one of five kinds. Each kind carries only the fields that make
//! sense for it, so a metronome can never hold a pitch and a note can never
//! hold a direction.

use serde::{Deserialize, Serialize};

use crate::cell::signal::Signal;
use crate::core::config::CellDefaults;
use crate::core::types::Direction;

/// Natural note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    /// Parse a letter A-G, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'c' => Some(NoteLetter::C),
            'd' => Some(NoteLetter::D),
            'e' => Some(NoteLetter::E),
            'f' => Some(NoteLetter::F),
            'g' => Some(NoteLetter::G),
            'a' => Some(NoteLetter::A),
            'b' => Some(NoteLetter::B),
            _ => None,
        }
    }

    pub fn as_upper(&self) -> char {
        match self {
            NoteLetter::C => 'C',
            NoteLetter::D => 'D',
            NoteLetter::E => 'E',
            NoteLetter::F => 'F',
            NoteLetter::G => 'G',
            NoteLetter::A => 'A',
            NoteLetter::B => 'B',
        }
    }

    /// Letters with a sharp one semitone below the next natural (no E#, B#)
    pub fn has_sharp(&self) -> bool {
        matches!(
            self,
            NoteLetter::C | NoteLetter::D | NoteLetter::F | NoteLetter::G | NoteLetter::A
        )
    }

    /// Letters with a flat one semitone above the previous natural (no Cb, Fb)
    pub fn has_flat(&self) -> bool {
        matches!(
            self,
            NoteLetter::D | NoteLetter::E | NoteLetter::G | NoteLetter::A | NoteLetter::B
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    #[serde(rename = "")]
    Natural,
    #[serde(rename = "#")]
    Sharp,
    #[serde(rename = "b")]
    Flat,
}

impl Accidental {
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// The nine synth voices a note can be played on
///
/// Order matters: the shift-digit edit keys map onto it positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    AmSynth,
    DuoSynth,
    FmSynth,
    MembraneSynth,
    MetalSynth,
    MonoSynth,
    NoiseSynth,
    PluckSynth,
    Synth,
}

impl Instrument {
    pub const ALL: [Instrument; 9] = [
        Instrument::AmSynth,
        Instrument::DuoSynth,
        Instrument::FmSynth,
        Instrument::MembraneSynth,
        Instrument::MetalSynth,
        Instrument::MonoSynth,
        Instrument::NoiseSynth,
        Instrument::PluckSynth,
        Instrument::Synth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::AmSynth => "amsynth",
            Instrument::DuoSynth => "duosynth",
            Instrument::FmSynth => "fmsynth",
            Instrument::MembraneSynth => "membranesynth",
            Instrument::MetalSynth => "metalsynth",
            Instrument::MonoSynth => "monosynth",
            Instrument::NoiseSynth => "noisesynth",
            Instrument::PluckSynth => "plucksynth",
            Instrument::Synth => "synth",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pitch and voice of a note cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    #[serde(rename = "note")]
    pub letter: NoteLetter,
    pub accidental: Accidental,
    pub octave: u8,
    pub instrument: Instrument,
}

impl NotePayload {
    pub fn new(letter: NoteLetter, defaults: &CellDefaults) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
            octave: defaults.default_octave,
            instrument: defaults.default_instrument,
        }
    }

    /// Letter and accidental without octave, e.g. "C#"
    pub fn pitch_class(&self) -> String {
        format!("{}{}", self.letter.as_upper(), self.accidental.symbol())
    }

    /// Full pitch name as played, e.g. "C#4"
    pub fn pitch(&self) -> String {
        format!("{}{}", self.pitch_class(), self.octave)
    }
}

/// Discriminant of a cell, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Empty,
    Note,
    Metronome,
    NoteAdjuster,
    Redirector,
}

/// What a cell is, with its type-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellKind {
    #[default]
    Empty,
    Note(NotePayload),
    Metronome {
        #[serde(rename = "ticksPerBeat")]
        ticks_per_beat: u32,
    },
    NoteAdjuster {
        #[serde(rename = "ticksPerBeat")]
        ticks_per_beat: u32,
    },
    Redirector { direction: Direction },
}

/// One grid cell: its kind plus the signals resting on it this tick
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cell {
    #[serde(flatten)]
    pub kind: CellKind,
    pub signals: Vec<Signal>,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: CellKind) -> Self {
        Self {
            kind,
            signals: Vec::new(),
        }
    }

    pub fn note(letter: NoteLetter, defaults: &CellDefaults) -> Self {
        Self::with_kind(CellKind::Note(NotePayload::new(letter, defaults)))
    }

    pub fn metronome(ticks_per_beat: u32) -> Self {
        Self::with_kind(CellKind::Metronome { ticks_per_beat })
    }

    pub fn note_adjuster(ticks_per_beat: u32) -> Self {
        Self::with_kind(CellKind::NoteAdjuster { ticks_per_beat })
    }

    pub fn redirector(direction: Direction) -> Self {
        Self::with_kind(CellKind::Redirector { direction })
    }

    pub fn cell_type(&self) -> CellType {
        match self.kind {
            CellKind::Empty => CellType::Empty,
            CellKind::Note(_) => CellType::Note,
            CellKind::Metronome { .. } => CellType::Metronome,
            CellKind::NoteAdjuster { .. } => CellType::NoteAdjuster,
            CellKind::Redirector { .. } => CellType::Redirector,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }
}
