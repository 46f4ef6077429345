//! Format converters
//!
//! This module contains converters from music notation formats into beat maps.

pub mod musicxml;

// Re-export for convenience
pub use musicxml::{build_score, musicxml_to_score, BuildError, BuildResult};
