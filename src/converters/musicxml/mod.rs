//! MusicXML format converters
//!
//! This module contains converters for MusicXML format.

pub mod musicxml_to_beatmap;

// Re-export for convenience
pub use musicxml_to_beatmap::{build_score, musicxml_to_score, BuildError, BuildResult};
