//! Pitch encoding
//!
//! Maps a written note (letter, accidental markers, octave) onto an absolute
//! semitone scale where `C4 = 60`:
//!
//! ```text
//! pitch = (octave + 1) * 12 + letter_offset + accidental_sum
//! ```
//!
//! Accidentals are the *displayed* `<accidental>` markers of a note, summed
//! additively, so two `flat` markers lower the pitch by two semitones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Written octaves that can be encoded (C-1 = 0 up to B9 = 131)
pub const OCTAVES: RangeInclusive<i32> = -1..=9;

/// Errors raised while decoding a pitch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// Step text is not one of A-G
    #[error("Invalid pitch letter: '{0}' (expected A-G)")]
    InvalidPitchLetter(String),

    #[error("Octave {0} out of range (expected -1 to 9)")]
    OctaveOutOfRange(i32),
}

/// Note letter, stripped of accidental and octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Parse a MusicXML `<step>` value
    pub fn parse(step: &str) -> Result<Self, PitchError> {
        match step.trim() {
            "C" => Ok(Letter::C),
            "D" => Ok(Letter::D),
            "E" => Ok(Letter::E),
            "F" => Ok(Letter::F),
            "G" => Ok(Letter::G),
            "A" => Ok(Letter::A),
            "B" => Ok(Letter::B),
            other => Err(PitchError::InvalidPitchLetter(other.to_string())),
        }
    }

    /// Semitones above C within one octave
    pub fn semitone_offset(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A displayed accidental marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    Flat,
    Sharp,
    Natural,
    DoubleSharp,
    DoubleFlat,
    /// Any other glyph (quarter tones, slash accidentals, ...)
    Other,
}

impl Accidental {
    /// Parse the text of a MusicXML `<accidental>` element
    pub fn from_musicxml(text: &str) -> Self {
        match text.trim() {
            "flat" => Accidental::Flat,
            "sharp" => Accidental::Sharp,
            "natural" => Accidental::Natural,
            "double-sharp" | "sharp-sharp" => Accidental::DoubleSharp,
            "flat-flat" => Accidental::DoubleFlat,
            _ => Accidental::Other,
        }
    }

    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
            Accidental::DoubleFlat => -2,
            Accidental::Natural | Accidental::Other => 0,
        }
    }
}

/// Absolute semitone number (60 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch(pub i32);

impl Pitch {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sounding note: its absolute pitch and the letter it was written with.
///
/// Ordering is by pitch first, so a set of tones iterates lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tone {
    pub pitch: Pitch,
    pub letter: Letter,
}

impl Tone {
    pub fn new(letter: Letter, accidentals: &[Accidental], octave: i32) -> Self {
        Self {
            pitch: encode(letter, accidentals, octave),
            letter,
        }
    }
}

/// Encode a written note to an absolute pitch.
///
/// `octave` must lie in [`OCTAVES`]; [`encode_pitch`] checks it.
pub fn encode(letter: Letter, accidentals: &[Accidental], octave: i32) -> Pitch {
    let alteration: i32 = accidentals.iter().map(|a| a.semitones()).sum();
    Pitch((octave + 1) * 12 + letter.semitone_offset() + alteration)
}

/// Encode from a textual step (e.g. `"F"`)
pub fn encode_pitch(step: &str, accidentals: &[Accidental], octave: i32) -> Result<Pitch, PitchError> {
    let letter = Letter::parse(step)?;
    if !OCTAVES.contains(&octave) {
        return Err(PitchError::OctaveOutOfRange(octave));
    }
    Ok(encode(letter, accidentals, octave))
}
