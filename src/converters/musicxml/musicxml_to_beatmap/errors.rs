//! Error types for beat map construction
//!
//! Every variant aborts the whole build; no partial score is returned.

use crate::models::pitch::PitchError;
use thiserror::Error;

/// Structural failure while building a score
#[derive(Debug, Error)]
pub enum BuildError {
    /// XML is malformed (not well-formed)
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Root element is not `<score-partwise>`
    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    /// Required structural element is missing
    #[error("Missing required element: {0}")]
    MissingElement(String),

    /// A note needs a beat position but no `<divisions>` has been declared yet
    #[error("Part '{part}', measure {measure}: note found before any <divisions> value")]
    MissingDivisions { part: String, measure: usize },

    #[error("Part '{part}', measure {measure}: invalid <divisions> value '{value}'")]
    MalformedDivisions { part: String, measure: usize, value: String },

    #[error("Part '{part}', measure {measure}: invalid <duration> value '{value}'")]
    MalformedDuration { part: String, measure: usize, value: String },

    #[error("Part '{part}', measure {measure}: invalid <octave> value '{value}'")]
    MalformedOctave { part: String, measure: usize, value: String },

    /// Backups and forwards moved the time cursor outside the `i32` range
    #[error("Part '{part}', measure {measure}: time cursor out of range")]
    CursorOverflow { part: String, measure: usize },

    #[error(transparent)]
    Pitch(#[from] PitchError),

    /// Two parts share a name and the settings reject duplicates
    #[error("Duplicate instrument name: {0}")]
    DuplicateInstrument(String),

    /// Cached JSON form could not be read or written
    #[error("Score cache error: {0}")]
    Cache(#[from] serde_json::Error),
}

pub type BuildResult<T> = Result<T, BuildError>;
