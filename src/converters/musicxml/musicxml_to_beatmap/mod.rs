//! MusicXML to beat map converter
//!
//! Reconstructs, per instrument and per measure, the beat position, duration
//! and pitch content of every sounding event.
//!
//! # Architecture
//!
//! ```text
//! MusicXML String
//!   ↓ [Parse with roxmltree]
//! XML DOM
//!   ↓ [Decode measure children once: MeasureEvent]
//! Vec<MeasureEvent> per measure
//!   ↓ [Fold with MeasureAccumulator]
//! Score (BeatMap per instrument + key/tempo markers)
//! ```
//!
//! # Timing model
//!
//! - `<attributes><divisions>` sets the division for the rest of the part
//! - a note placed at the cursor either starts a new symbol or, when another
//!   voice already put a symbol at the same cursor value, joins it
//! - `<chord/>` notes join the previous note's symbol without moving the cursor
//! - `<backup>` rewinds the cursor; `<forward>` rewinds too unless
//!   [`BuildSettings::forward_rewinds`] is off

pub mod builder;
pub mod errors;
pub mod parser;

pub use builder::{beat_position, build_beat_map, build_score, fold_measure, MeasureAccumulator};
pub use errors::{BuildError, BuildResult};
pub use parser::{MeasureEvent, NoteKind};

use crate::models::settings::BuildSettings;

/// Build a score with default settings
pub fn musicxml_to_score(xml: &str) -> BuildResult<crate::models::Score> {
    build_score(xml, &BuildSettings::default())
}
