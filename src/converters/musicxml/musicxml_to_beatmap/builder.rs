//! Score -> BeatMap builder
//!
//! Each measure is a fold over its decoded [`MeasureEvent`]s. The accumulator
//! carries the running time cursor (`current_beat`, in division units,
//! starting at 1), the part's current `division`, and the symbols built so
//! far. Every step consumes the accumulator and returns the next one.

use super::errors::{BuildError, BuildResult};
use super::parser::{
    decode_measure, key_marks, measures, parse_document, parts, tempo_marks, Location,
    MeasureEvent, NoteKind,
};
use crate::models::beatmap::{BeatMap, Instrument, Measure, Rational, Score, Symbol};
use crate::models::pitch::Tone;
use crate::models::settings::{BuildSettings, DuplicateNamePolicy};
use roxmltree::Node;
use std::collections::HashSet;

/// Beat label for a cursor position.
///
/// `ceil(current / division)`, plus the sub-division fraction
/// `(current mod division) / division` when `current mod division != 1`.
pub fn beat_position(current: i32, division: i32) -> Rational {
    let whole = Rational::new(current, division).ceil();
    let offset = current.rem_euclid(division);

    if offset != 1 {
        whole + Rational::new(offset, division)
    } else {
        whole
    }
}

/// Running state while folding one measure
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureAccumulator {
    pub current_beat: i32,
    pub division: Option<i32>,
    pub symbols: Vec<Symbol>,
    /// Cursor value each symbol was created at, parallel to `symbols`
    onsets: Vec<i32>,
    /// Symbol the most recent note landed in
    previous: Option<usize>,
    /// Grace tones waiting for a symbol at their onset
    graces: Vec<(i32, Tone)>,
}

impl MeasureAccumulator {
    /// Start a measure; the division carries over from the previous one
    pub fn new(division: Option<i32>) -> Self {
        Self {
            current_beat: 1,
            division,
            symbols: Vec::new(),
            onsets: Vec::new(),
            previous: None,
            graces: Vec::new(),
        }
    }

    /// Apply one event, producing the next accumulator
    pub fn step(
        self,
        event: &MeasureEvent,
        loc: Location,
        settings: &BuildSettings,
    ) -> BuildResult<Self> {
        match *event {
            MeasureEvent::Divisions(division) => Ok(Self {
                division: Some(division),
                ..self
            }),
            MeasureEvent::Note { kind, duration } => self.note(kind, duration, loc),
            MeasureEvent::Grace(Some(tone)) => {
                self.require_division(loc)?;
                Ok(self.grace(tone))
            }
            MeasureEvent::Grace(None) => Ok(self),
            MeasureEvent::Backup(duration) => self.shift(duration, true, loc),
            MeasureEvent::Forward(duration) => self.shift(duration, settings.forward_rewinds, loc),
        }
    }

    /// Close the measure, handing the division on to the next one.
    ///
    /// Grace tones that never met a sounding symbol are dropped.
    pub fn finish(self) -> (Measure, Option<i32>) {
        if !self.graces.is_empty() {
            log::debug!("Dropping {} unattached grace notes", self.graces.len());
        }

        // Later voices are appended after a <backup>; restore time order.
        // Stable, and onsets are unique, so one voice keeps document order.
        let mut timed: Vec<(i32, Symbol)> = self.onsets.into_iter().zip(self.symbols).collect();
        timed.sort_by_key(|(onset, _)| *onset);

        let symbols = timed.into_iter().map(|(_, symbol)| symbol).collect();
        (Measure::new(symbols), self.division)
    }

    fn require_division(&self, loc: Location) -> BuildResult<i32> {
        self.division.ok_or_else(|| BuildError::MissingDivisions {
            part: loc.part.to_string(),
            measure: loc.measure,
        })
    }

    fn note(mut self, kind: NoteKind, duration: u32, loc: Location) -> BuildResult<Self> {
        let division = self.require_division(loc)?;

        match kind {
            NoteKind::ChordContinuation(tone) => match self.previous {
                // Shares the previous note's symbol; the cursor does not move
                Some(index) => {
                    self.symbols[index].absorb(Some(tone));
                    Ok(self)
                }
                // Nothing to attach to: treat as an ordinary note
                None => self.place(Some(tone), duration, division).shift(duration, false, loc),
            },
            NoteKind::Pitched(tone) => {
                self.place(Some(tone), duration, division).shift(duration, false, loc)
            }
            NoteKind::Rest => self.place(None, duration, division).shift(duration, false, loc),
        }
    }

    /// A grace tone sounds with whatever symbol sits at the cursor. It
    /// never starts a symbol of its own, so it waits for one if needed.
    fn grace(mut self, tone: Tone) -> Self {
        match self.symbol_at(self.current_beat) {
            Some(index) => self.symbols[index].absorb(Some(tone)),
            None => self.graces.push((self.current_beat, tone)),
        }
        self
    }

    fn symbol_at(&self, onset: i32) -> Option<usize> {
        self.onsets.iter().position(|&o| o == onset)
    }

    /// Merge into the symbol already at the cursor, or start a new one
    fn place(mut self, tone: Option<Tone>, duration: u32, division: i32) -> Self {
        let index = match self.symbol_at(self.current_beat) {
            Some(index) => {
                self.symbols[index].absorb(tone);
                index
            }
            None => {
                let beat = beat_position(self.current_beat, division);
                let symbol = match tone {
                    Some(tone) => Symbol::pitched(beat, duration, tone),
                    None => Symbol::rest(beat, duration),
                };
                self.symbols.push(symbol);
                self.onsets.push(self.current_beat);
                self.symbols.len() - 1
            }
        };

        let onset = self.current_beat;
        let (waiting, rest): (Vec<_>, Vec<_>) =
            self.graces.into_iter().partition(|(o, _)| *o == onset);
        for (_, tone) in waiting {
            self.symbols[index].absorb(Some(tone));
        }
        self.graces = rest;
        self.previous = Some(index);

        self
    }

    /// Move the cursor by `duration`, backwards when `rewind` is set
    fn shift(self, duration: u32, rewind: bool, loc: Location) -> BuildResult<Self> {
        let current_beat = i32::try_from(duration)
            .ok()
            .and_then(|d| {
                if rewind {
                    self.current_beat.checked_sub(d)
                } else {
                    self.current_beat.checked_add(d)
                }
            })
            .ok_or_else(|| BuildError::CursorOverflow {
                part: loc.part.to_string(),
                measure: loc.measure,
            })?;

        Ok(Self {
            current_beat,
            ..self
        })
    }
}

/// Fold the events of one measure
pub fn fold_measure(
    events: &[MeasureEvent],
    division: Option<i32>,
    loc: Location,
    settings: &BuildSettings,
) -> BuildResult<(Measure, Option<i32>)> {
    let accumulator = events
        .iter()
        .try_fold(MeasureAccumulator::new(division), |acc, event| {
            acc.step(event, loc, settings)
        })?;

    Ok(accumulator.finish())
}

/// Build the beat map of one `<part>`
pub fn build_beat_map(part: Node, name: &str, settings: &BuildSettings) -> BuildResult<BeatMap> {
    let mut division = None;
    let mut result = Vec::new();

    for (index, measure_node) in measures(part).into_iter().enumerate() {
        let loc = Location {
            part: name,
            measure: index + 1,
        };
        let events = decode_measure(measure_node, loc, settings)?;
        let (measure, next_division) = fold_measure(&events, division, loc, settings)?;

        division = next_division;
        result.push(measure);
    }

    log::debug!("Built beat map for '{}': {} measures", name, result.len());

    Ok(BeatMap::new(result))
}

/// Build a complete score from MusicXML text
pub fn build_score(xml: &str, settings: &BuildSettings) -> BuildResult<Score> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();
    let parts = parts(root)?;

    let mut instruments: Vec<Instrument> = Vec::with_capacity(parts.len());
    let mut seen = HashSet::new();

    for (name, part) in &parts {
        let name = unique_name(name, &seen, settings.duplicate_names)?;
        let beat_map = build_beat_map(*part, &name, settings)?;

        seen.insert(name.clone());
        instruments.push(Instrument { name, beat_map });
    }

    let part_nodes: Vec<Node> = parts.iter().map(|(_, node)| *node).collect();
    let key_signatures = collect_key_signatures(&part_nodes);
    let tempos = collect_tempos(&part_nodes);

    log::info!(
        "Built score: {} instruments, {} key signatures, {} tempos",
        instruments.len(),
        key_signatures.len(),
        tempos.len()
    );

    Ok(Score {
        instruments,
        key_signatures,
        tempos,
    })
}

fn unique_name(
    name: &str,
    seen: &HashSet<String>,
    policy: DuplicateNamePolicy,
) -> BuildResult<String> {
    if !seen.contains(name) {
        return Ok(name.to_string());
    }

    match policy {
        DuplicateNamePolicy::Reject => Err(BuildError::DuplicateInstrument(name.to_string())),
        DuplicateNamePolicy::Disambiguate => Ok((2..)
            .map(|n| format!("{} ({})", name, n))
            .find(|candidate| !seen.contains(candidate))
            .unwrap_or_else(|| name.to_string())),
    }
}

/// Walk measure index by measure index across all parts, so markers come out
/// in time order rather than part order. A marker that an earlier part
/// already declared in the same measure is a restatement and is collected
/// once; repeats within one part are kept.
fn collect_time_wise<T, F>(parts: &[Node], marks: F) -> Vec<T>
where
    T: PartialEq,
    F: Fn(Node) -> Vec<T>,
{
    let per_part: Vec<Vec<Node>> = parts.iter().map(|p| measures(*p)).collect();
    let longest = per_part.iter().map(Vec::len).max().unwrap_or(0);

    let mut collected = Vec::new();
    for index in 0..longest {
        let mut in_measure: Vec<T> = Vec::new();
        for measure in per_part.iter().filter_map(|m| m.get(index)) {
            // Each earlier marker can absorb one restatement
            let mut unmatched: Vec<&T> = in_measure.iter().collect();
            let mut fresh = Vec::new();
            for mark in marks(*measure) {
                match unmatched.iter().position(|m| **m == mark) {
                    Some(i) => {
                        unmatched.swap_remove(i);
                    }
                    None => fresh.push(mark),
                }
            }
            in_measure.extend(fresh);
        }
        collected.extend(in_measure);
    }

    collected
}

fn collect_key_signatures(parts: &[Node]) -> Vec<String> {
    let mut labels: Vec<String> = collect_time_wise(parts, key_marks);
    // A repeated label marks no change
    labels.dedup();
    labels
}

fn collect_tempos(parts: &[Node]) -> Vec<u32> {
    collect_time_wise(parts, tempo_marks)
}
