//! Data models for analysed scores
//!
//! - `pitch`: letters, accidentals and the absolute pitch encoding
//! - `beatmap`: symbols, measures, beat maps and the score
//! - `settings`: build configuration

pub mod beatmap;
pub mod pitch;
pub mod settings;

// Re-export commonly used types
pub use beatmap::{BeatMap, Instrument, Measure, Rational, Score, Symbol};
pub use pitch::{encode, encode_pitch, Accidental, Letter, Pitch, PitchError, Tone, OCTAVES};
pub use settings::{BuildSettings, DuplicateNamePolicy};
