//! Read-only analytics over a built [`Score`]
//!
//! Nothing here mutates the score or needs a cursor, so a score restored
//! from its JSON cache answers every query the same way as a freshly built
//! one.

use crate::models::{BeatMap, Pitch, Score, Symbol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A query with no answer for this score
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("No pitched content")]
    NoPitchedContent,
}

/// Lowest and highest sounding pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchRange {
    pub min_pitch: Pitch,
    pub max_pitch: Pitch,
}

impl PitchRange {
    fn of<'a>(symbols: impl Iterator<Item = &'a Symbol>) -> Option<Self> {
        symbols
            .flat_map(|s| s.pitches.iter().map(|t| t.pitch))
            .fold(None, |range, pitch| {
                Some(match range {
                    None => PitchRange {
                        min_pitch: pitch,
                        max_pitch: pitch,
                    },
                    Some(PitchRange { min_pitch, max_pitch }) => PitchRange {
                        min_pitch: min_pitch.min(pitch),
                        max_pitch: max_pitch.max(pitch),
                    },
                })
            })
    }
}

impl Score {
    /// Instrument names in first-appearance order
    pub fn instrument_names(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.name.as_str()).collect()
    }

    /// Pitch extremes of one instrument, or of the whole score with `None`
    pub fn pitch_range(&self, instrument: Option<&str>) -> Result<PitchRange, LookupMiss> {
        let range = match instrument {
            Some(name) => {
                let beat_map = self
                    .instrument(name)
                    .ok_or_else(|| LookupMiss::UnknownInstrument(name.to_string()))?;
                PitchRange::of(beat_map.symbols())
            }
            None => PitchRange::of(self.instruments.iter().flat_map(|i| i.beat_map.symbols())),
        };

        range.ok_or(LookupMiss::NoPitchedContent)
    }

    pub fn min_pitch(&self) -> Option<Pitch> {
        self.pitch_range(None).ok().map(|r| r.min_pitch)
    }

    pub fn max_pitch(&self) -> Option<Pitch> {
        self.pitch_range(None).ok().map(|r| r.max_pitch)
    }

    /// Tempo markers in document order
    pub fn tempos(&self) -> &[u32] {
        &self.tempos
    }

    /// Key labels in document order, one per change
    pub fn key_signatures(&self) -> &[String] {
        &self.key_signatures
    }

    /// Note letters of an instrument in performance order, rests skipped.
    ///
    /// A chord contributes all of its letters, lowest pitch first, so
    /// simultaneity is lost in the reduction.
    pub fn letter_string(&self, name: &str) -> Option<String> {
        self.instrument(name).map(letter_string)
    }

    /// Instruments whose letter string contains `pattern` contiguously.
    ///
    /// Case-sensitive; an empty pattern matches every instrument.
    pub fn instruments_with_melody(&self, pattern: &str) -> Vec<&str> {
        self.instruments
            .iter()
            .filter(|i| letter_string(&i.beat_map).contains(pattern))
            .map(|i| i.name.as_str())
            .collect()
    }
}

fn letter_string(beat_map: &BeatMap) -> String {
    beat_map
        .symbols()
        .filter(|s| !s.is_rest)
        .flat_map(Symbol::letters)
        .map(|l| l.as_char())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Accidental, Instrument, Letter, Measure, Rational, Tone};

    fn note(beat: i32, letter: Letter, octave: i32) -> Symbol {
        Symbol::pitched(Rational::from_integer(beat), 1, Tone::new(letter, &[], octave))
    }

    fn instrument(name: &str, symbols: Vec<Symbol>) -> Instrument {
        Instrument {
            name: name.to_string(),
            beat_map: BeatMap::new(vec![Measure::new(symbols)]),
        }
    }

    fn score() -> Score {
        let mut chord = note(3, Letter::E, 4);
        chord.absorb(Some(Tone::new(Letter::C, &[Accidental::Sharp], 4)));

        Score {
            instruments: vec![
                instrument(
                    "Violin",
                    vec![
                        note(1, Letter::B, 4),
                        Symbol::rest(Rational::from_integer(2), 1),
                        note(3, Letter::G, 4),
                        note(4, Letter::B, 4),
                        note(5, Letter::C, 5),
                    ],
                ),
                instrument("Cello", vec![note(1, Letter::G, 2), chord]),
                instrument("Triangle", vec![Symbol::rest(Rational::from_integer(1), 4)]),
            ],
            key_signatures: vec!["D".to_string()],
            tempos: vec![72],
        }
    }

    #[test]
    fn test_names_keep_document_order() {
        assert_eq!(score().instrument_names(), vec!["Violin", "Cello", "Triangle"]);
    }

    #[test]
    fn test_range_over_whole_score() {
        let range = score().pitch_range(None).unwrap();
        assert_eq!(range.min_pitch, Pitch(43));
        assert_eq!(range.max_pitch, Pitch(72));
    }

    #[test]
    fn test_range_of_one_instrument() {
        let score = score();
        let range = score.pitch_range(Some("Cello")).unwrap();
        assert_eq!(range, PitchRange { min_pitch: Pitch(43), max_pitch: Pitch(64) });
        assert_eq!(score.min_pitch(), Some(Pitch(43)));
    }

    #[test]
    fn test_range_misses() {
        let score = score();
        assert_eq!(score.pitch_range(Some("Triangle")), Err(LookupMiss::NoPitchedContent));
        assert_eq!(
            score.pitch_range(Some("Tuba")),
            Err(LookupMiss::UnknownInstrument("Tuba".to_string()))
        );
        assert_eq!(Score::default().max_pitch(), None);
    }

    #[test]
    fn test_range_serializes_with_js_names() {
        let json = serde_json::to_string(&PitchRange { min_pitch: Pitch(40), max_pitch: Pitch(70) })
            .unwrap();
        assert_eq!(json, r#"{"minPitch":40,"maxPitch":70}"#);
    }

    #[test]
    fn test_chord_letters_ascend_by_pitch() {
        // C#4 (61) sounds below E4 (64)
        assert_eq!(score().letter_string("Cello").as_deref(), Some("GCE"));
    }

    #[test]
    fn test_melody_search_skips_rests() {
        let score = score();
        assert_eq!(score.instruments_with_melody("BGBC"), vec!["Violin"]);
        assert_eq!(score.instruments_with_melody("GCE"), vec!["Cello"]);
        assert!(score.instruments_with_melody("bgbc").is_empty());
        assert!(score.instruments_with_melody("GEC").is_empty());
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert_eq!(score().instruments_with_melody("").len(), 3);
    }
}
