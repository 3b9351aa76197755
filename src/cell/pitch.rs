//! Chromatic pitch cycling for note-adjuster pulses
//!
//! Two spellings of the 12-tone scale starting at C. A pitch is looked up
//! in the sharps spelling first and in the flats spelling otherwise, then
//! advanced one semitone within whichever spelling it was found in.

use crate::cell::types::{Accidental, NoteLetter, NotePayload};

type PitchClass = (NoteLetter, Accidental);

const SHARPS: [PitchClass; 12] = [
    (NoteLetter::C, Accidental::Natural),
    (NoteLetter::C, Accidental::Sharp),
    (NoteLetter::D, Accidental::Natural),
    (NoteLetter::D, Accidental::Sharp),
    (NoteLetter::E, Accidental::Natural),
    (NoteLetter::F, Accidental::Natural),
    (NoteLetter::F, Accidental::Sharp),
    (NoteLetter::G, Accidental::Natural),
    (NoteLetter::G, Accidental::Sharp),
    (NoteLetter::A, Accidental::Natural),
    (NoteLetter::A, Accidental::Sharp),
    (NoteLetter::B, Accidental::Natural),
];

const FLATS: [PitchClass; 12] = [
    (NoteLetter::C, Accidental::Natural),
    (NoteLetter::D, Accidental::Flat),
    (NoteLetter::D, Accidental::Natural),
    (NoteLetter::E, Accidental::Flat),
    (NoteLetter::E, Accidental::Natural),
    (NoteLetter::F, Accidental::Natural),
    (NoteLetter::G, Accidental::Flat),
    (NoteLetter::G, Accidental::Natural),
    (NoteLetter::A, Accidental::Flat),
    (NoteLetter::A, Accidental::Natural),
    (NoteLetter::B, Accidental::Flat),
    (NoteLetter::B, Accidental::Natural),
];

/// Pitch class one semitone above `(letter, accidental)`
pub fn next_semitone(letter: NoteLetter, accidental: Accidental) -> PitchClass {
    let current = (letter, accidental);
    let (scale, index) = match SHARPS.iter().position(|p| *p == current) {
        Some(i) => (&SHARPS, i),
        None => match FLATS.iter().position(|p| *p == current) {
            Some(i) => (&FLATS, i),
            // Spellings in neither scale (E#, Cb, ...) fall back to C
            None => (&FLATS, FLATS.len() - 1),
        },
    };
    scale[(index + 1) % scale.len()]
}

impl NotePayload {
    /// Raise this note one semitone; octave and instrument are untouched
    pub fn advance_semitone(&mut self) {
        let (letter, accidental) = next_semitone(self.letter, self.accidental);
        self.letter = letter;
        self.accidental = accidental;
    }
}
