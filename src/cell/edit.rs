//! Single-key edit protocol
//!
//! Participants edit a cell one key press at a time. What a key does
//! depends on what the cell currently is: a digit sets the octave of a note
//! but the tempo of a metronome, `+` sharpens a note and does nothing
//! anywhere else. Keys with no meaning for the current cell are accepted
//! and leave it unchanged.

use crate::cell::types::{Accidental, Cell, CellKind, Instrument, NoteLetter, NotePayload};
use crate::core::config::CellDefaults;
use crate::core::types::Direction;

/// Shift-digit symbols, in instrument order
const INSTRUMENT_KEYS: [char; 9] = ['!', '@', '#', '$', '%', '^', '&', '*', '('];

/// A key press, as sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    Backspace,
    Arrow(Direction),
    Digit(u8),
    /// Lowercased ASCII letter
    Letter(char),
    Sharp,
    Flat,
    Instrument(Instrument),
    Unrecognized,
}

impl KeyToken {
    /// Interpret a raw key name, case-insensitive
    ///
    /// Accepts browser key names (`Backspace`, `ArrowUp`) as well as the
    /// short arrow names `up`/`down`/`left`/`right`.
    pub fn parse(raw: &str) -> Self {
        let key = raw.to_lowercase();
        match key.as_str() {
            "backspace" => return KeyToken::Backspace,
            "arrowup" | "up" => return KeyToken::Arrow(Direction::North),
            "arrowdown" | "down" => return KeyToken::Arrow(Direction::South),
            "arrowleft" | "left" => return KeyToken::Arrow(Direction::West),
            "arrowright" | "right" => return KeyToken::Arrow(Direction::East),
            _ => {}
        }

        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return KeyToken::Unrecognized;
        };

        if let Some(digit) = c.to_digit(10) {
            return KeyToken::Digit(digit as u8);
        }
        if c.is_ascii_alphabetic() {
            return KeyToken::Letter(c);
        }
        match c {
            '+' => KeyToken::Sharp,
            '-' => KeyToken::Flat,
            _ => INSTRUMENT_KEYS
                .iter()
                .position(|k| *k == c)
                .map(|i| KeyToken::Instrument(Instrument::ALL[i]))
                .unwrap_or(KeyToken::Unrecognized),
        }
    }
}

impl From<&str> for KeyToken {
    fn from(raw: &str) -> Self {
        KeyToken::parse(raw)
    }
}

impl Cell {
    /// Apply one key press to this cell in place
    ///
    /// Signals resting on the cell are kept; only its kind and payload change.
    pub fn apply_edit(&mut self, token: KeyToken, defaults: &CellDefaults) {
        match token {
            KeyToken::Backspace => self.kind = CellKind::Empty,
            KeyToken::Arrow(direction) => self.kind = CellKind::Redirector { direction },
            KeyToken::Digit(digit) => match &mut self.kind {
                CellKind::Note(note) => note.octave = digit,
                // A zero tempo would never fire
                CellKind::Metronome { ticks_per_beat }
                | CellKind::NoteAdjuster { ticks_per_beat }
                    if digit > 0 =>
                {
                    *ticks_per_beat = u32::from(digit)
                }
                _ => {}
            },
            KeyToken::Letter(c) => {
                if let Some(letter) = NoteLetter::from_char(c) {
                    self.kind = CellKind::Note(NotePayload::new(letter, defaults));
                } else if c == 'm' {
                    self.kind = CellKind::Metronome {
                        ticks_per_beat: defaults.metronome_ticks_per_beat,
                    };
                } else if c == 'n' {
                    self.kind = CellKind::NoteAdjuster {
                        ticks_per_beat: defaults.note_adjuster_ticks_per_beat,
                    };
                }
            }
            KeyToken::Sharp => {
                if let CellKind::Note(note) = &mut self.kind {
                    if note.letter.has_sharp() {
                        note.accidental = Accidental::Sharp;
                    }
                }
            }
            KeyToken::Flat => {
                if let CellKind::Note(note) = &mut self.kind {
                    if note.letter.has_flat() {
                        note.accidental = Accidental::Flat;
                    }
                }
            }
            KeyToken::Instrument(instrument) => {
                if let CellKind::Note(note) = &mut self.kind {
                    note.instrument = instrument;
                }
            }
            KeyToken::Unrecognized => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::signal::{Signal, SignalKind};
    use proptest::prelude::*;

    fn edited(cell: &Cell, keys: &[&str]) -> Cell {
        let defaults = CellDefaults::default();
        let mut cell = cell.clone();
        for key in keys {
            cell.apply_edit(KeyToken::parse(key), &defaults);
        }
        cell
    }

    fn note_of(cell: &Cell) -> NotePayload {
        match cell.kind {
            CellKind::Note(note) => note,
            other => panic!("expected note, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(KeyToken::parse("Backspace"), KeyToken::Backspace);
        assert_eq!(KeyToken::parse("ArrowLeft"), KeyToken::Arrow(Direction::West));
        assert_eq!(KeyToken::parse("up"), KeyToken::Arrow(Direction::North));
        assert_eq!(KeyToken::parse("7"), KeyToken::Digit(7));
        assert_eq!(KeyToken::parse("G"), KeyToken::Letter('g'));
        assert_eq!(KeyToken::parse("+"), KeyToken::Sharp);
        assert_eq!(KeyToken::parse("-"), KeyToken::Flat);
        assert_eq!(KeyToken::parse("!"), KeyToken::Instrument(Instrument::AmSynth));
        assert_eq!(KeyToken::parse("("), KeyToken::Instrument(Instrument::Synth));
        assert_eq!(KeyToken::parse("Shift"), KeyToken::Unrecognized);
        assert_eq!(KeyToken::parse("?"), KeyToken::Unrecognized);
        assert_eq!(KeyToken::parse(""), KeyToken::Unrecognized);
    }

    #[test]
    fn test_letter_creates_note_with_defaults() {
        let cell = edited(&Cell::empty(), &["E"]);
        let note = note_of(&cell);
        assert_eq!(note.letter, NoteLetter::E);
        assert_eq!(note.octave, 4);
        assert_eq!(note.accidental, Accidental::Natural);
        assert_eq!(note.instrument, Instrument::Synth);
    }

    #[test]
    fn test_letter_replaces_previous_note_state() {
        let cell = edited(&Cell::empty(), &["c", "+", "7", "@", "d"]);
        let note = note_of(&cell);
        assert_eq!(note.pitch(), "D4");
        assert_eq!(note.instrument, Instrument::Synth);
    }

    #[test]
    fn test_digit_sets_octave_or_tempo() {
        assert_eq!(note_of(&edited(&Cell::empty(), &["a", "2"])).octave, 2);
        assert_eq!(
            edited(&Cell::empty(), &["m", "3"]).kind,
            CellKind::Metronome { ticks_per_beat: 3 }
        );
        assert_eq!(
            edited(&Cell::empty(), &["n", "8"]).kind,
            CellKind::NoteAdjuster { ticks_per_beat: 8 }
        );
        assert_eq!(edited(&Cell::empty(), &["5"]).kind, CellKind::Empty);
        assert_eq!(
            edited(&Cell::empty(), &["left", "5"]).kind,
            CellKind::Redirector { direction: Direction::West }
        );
    }

    #[test]
    fn test_zero_tempo_ignored() {
        assert_eq!(
            edited(&Cell::empty(), &["m", "0"]).kind,
            CellKind::Metronome { ticks_per_beat: 4 }
        );
        assert_eq!(note_of(&edited(&Cell::empty(), &["c", "0"])).octave, 0);
    }

    #[test]
    fn test_accidentals_respect_letter() {
        assert_eq!(note_of(&edited(&Cell::empty(), &["c", "+"])).pitch(), "C#4");
        assert_eq!(note_of(&edited(&Cell::empty(), &["e", "+"])).pitch(), "E4");
        assert_eq!(note_of(&edited(&Cell::empty(), &["e", "-"])).pitch(), "Eb4");
        assert_eq!(note_of(&edited(&Cell::empty(), &["f", "-"])).pitch(), "F4");
        assert_eq!(note_of(&edited(&Cell::empty(), &["b", "-"])).pitch(), "Bb4");
        assert_eq!(edited(&Cell::metronome(2), &["+"]).kind, CellKind::Metronome { ticks_per_beat: 2 });
    }

    #[test]
    fn test_instrument_keys_only_affect_notes() {
        for (key, instrument) in INSTRUMENT_KEYS.iter().zip(Instrument::ALL) {
            let key = key.to_string();
            let cell = edited(&Cell::empty(), &["g", key.as_str()]);
            assert_eq!(note_of(&cell).instrument, instrument);
        }
        assert_eq!(edited(&Cell::empty(), &["#"]).kind, CellKind::Empty);
    }

    #[test]
    fn test_arrows_override_any_kind() {
        let cell = edited(&Cell::empty(), &["c", "ArrowDown"]);
        assert_eq!(cell.kind, CellKind::Redirector { direction: Direction::South });
        let cell = edited(&Cell::metronome(1), &["right"]);
        assert_eq!(cell.kind, CellKind::Redirector { direction: Direction::East });
    }

    #[test]
    fn test_other_letters_are_noops() {
        let start = edited(&Cell::empty(), &["a"]);
        assert_eq!(edited(&start, &["x"]), start);
        assert_eq!(edited(&start, &["Tab"]), start);
    }

    #[test]
    fn test_edit_keeps_resting_signals() {
        let mut cell = Cell::metronome(1);
        cell.signals.push(Signal::emitted(SignalKind::Metronome));
        let cell = edited(&cell, &["Backspace"]);
        assert!(cell.is_empty());
        assert_eq!(cell.signals.len(), 1);
    }

    fn any_start_cell() -> impl Strategy<Value = Cell> {
        prop_oneof![
            Just(Cell::empty()),
            (1u32..10).prop_map(Cell::metronome),
            (1u32..10).prop_map(Cell::note_adjuster),
            Just(Cell::redirector(Direction::North)),
            "[a-g]".prop_map(|s| edited(&Cell::empty(), &[s.as_str()])),
        ]
    }

    const KEYS: [&str; 16] = [
        "a", "C", "m", "n", "x", "3", "0", "+", "-", "!", "(", "up", "ArrowLeft", "Backspace", "?", "Enter",
    ];

    proptest! {
        #[test]
        fn prop_backspace_always_empties(start in any_start_cell()) {
            let cell = edited(&start, &["Backspace"]);
            prop_assert_eq!(cell.kind, CellKind::Empty);
        }

        #[test]
        fn prop_same_key_twice_is_idempotent(start in any_start_cell(), key in 0usize..KEYS.len()) {
            let once = edited(&start, &[KEYS[key]]);
            let twice = edited(&start, &[KEYS[key], KEYS[key]]);
            prop_assert_eq!(once, twice);
        }
    }
}
