//! Beat map data model
//!
//! ```text
//! Score
//!   ├── instruments: Vec<Instrument>   (first-appearance order, unique names)
//!   │     └── BeatMap
//!   │           └── Vec<Measure>       (document order, 0-based)
//!   │                 └── Vec<Symbol>  (ascending beat)
//!   ├── key_signatures: Vec<String>
//!   └── tempos: Vec<u32>
//! ```
//!
//! A `Score` is built once and never mutated afterwards. The serde form of a
//! `Score` doubles as the cache format (see [`Score::to_json`]).

use crate::models::pitch::{Letter, Tone};
use num_rational::Rational32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Beat positions are exact fractions
pub type Rational = Rational32;

/// One rhythmic event: a rest, or one or more simultaneous pitches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// Position within the measure, starting at 1
    pub beat: Rational,
    /// Length in the part's division units at the time it was read
    pub duration: u32,
    pub is_rest: bool,
    /// Sounding tones, lowest first. Empty iff `is_rest`.
    pub pitches: BTreeSet<Tone>,
}

impl Symbol {
    pub fn rest(beat: Rational, duration: u32) -> Self {
        Self {
            beat,
            duration,
            is_rest: true,
            pitches: BTreeSet::new(),
        }
    }

    pub fn pitched(beat: Rational, duration: u32, tone: Tone) -> Self {
        let mut pitches = BTreeSet::new();
        pitches.insert(tone);
        Self {
            beat,
            duration,
            is_rest: false,
            pitches,
        }
    }

    /// Merge a coincident event into this symbol.
    ///
    /// A pitch turns a rest into a sounding symbol; a rest never silences
    /// sounding pitches.
    pub fn absorb(&mut self, tone: Option<Tone>) {
        if let Some(tone) = tone {
            self.pitches.insert(tone);
            self.is_rest = false;
        }
    }

    pub fn is_chord(&self) -> bool {
        self.pitches.len() > 1
    }

    /// Letters of the sounding tones, lowest pitch first
    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.pitches.iter().map(|t| t.letter)
    }
}

/// Ordered symbols of one measure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measure {
    pub symbols: Vec<Symbol>,
}

impl Measure {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }
}

/// All measures of one instrument
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatMap {
    pub measures: Vec<Measure>,
}

impl BeatMap {
    pub fn new(measures: Vec<Measure>) -> Self {
        Self { measures }
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    pub fn measure(&self, index: usize) -> Option<&Measure> {
        self.measures.get(index)
    }

    /// Every symbol in performance order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.measures.iter().flat_map(|m| m.symbols.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub name: String,
    pub beat_map: BeatMap,
}

/// A fully analysed score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub instruments: Vec<Instrument>,
    pub key_signatures: Vec<String>,
    pub tempos: Vec<u32>,
}

impl Score {
    /// Look up an instrument's beat map by name
    pub fn instrument(&self, name: &str) -> Option<&BeatMap> {
        self.instruments
            .iter()
            .find(|i| i.name == name)
            .map(|i| &i.beat_map)
    }

    pub(crate) fn instrument_index(&self, name: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.name == name)
    }

    /// Serialize to the cache form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a score from its cache form, bypassing the builder
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
