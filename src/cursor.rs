//! Bidirectional traversal over one instrument's beat map
//!
//! The cursor borrows a [`Score`] and owns only its own position. Stepping
//! past either end of the beat map is reported as a [`CursorError`], never
//! clamped.

use crate::models::{Measure, Score, Symbol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Navigation past the edges of a beat map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("No instrument selected")]
    NoInstrument,

    #[error("No next beat: already at the last measure")]
    NoNext,

    #[error("No previous beat: already at the first measure")]
    NoPrev,

    /// Only measures `1..count` can be jumped to; measure 0 is the start state
    #[error("Measure {requested} does not exist (valid: 1..{count})")]
    BadMeasure { requested: usize, count: usize },
}

/// Detached traversal state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    /// Index into `Score::instruments`
    pub instrument: Option<usize>,
    pub measure: usize,
    /// `None` is "before the first symbol" of the measure
    pub beat: Option<usize>,
}

/// Stateful cursor over a score
#[derive(Debug, Clone)]
pub struct BeatCursor<'a> {
    score: &'a Score,
    position: CursorPosition,
}

impl<'a> BeatCursor<'a> {
    /// A cursor with no instrument selected
    pub fn new(score: &'a Score) -> Self {
        Self {
            score,
            position: CursorPosition::default(),
        }
    }

    /// Re-attach a saved position. A position that does not fit the score
    /// (e.g. saved against a different score) starts over.
    pub fn resume(score: &'a Score, position: CursorPosition) -> Self {
        let fits = match position.instrument {
            None => position.measure == 0 && position.beat.is_none(),
            Some(index) => score.instruments.get(index).map_or(false, |instrument| {
                let measures = &instrument.beat_map.measures;
                match measures.get(position.measure) {
                    Some(measure) => position.beat.map_or(true, |b| b < measure.len()),
                    None => measures.is_empty() && position.measure == 0 && position.beat.is_none(),
                }
            }),
        };

        if fits {
            Self { score, position }
        } else {
            Self::new(score)
        }
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    /// Switch to an instrument and rewind to before its first symbol.
    ///
    /// Returns `false` (and leaves the cursor untouched) for an unknown name.
    pub fn select_instrument(&mut self, name: &str) -> bool {
        match self.score.instrument_index(name) {
            Some(index) => {
                self.position = CursorPosition {
                    instrument: Some(index),
                    measure: 0,
                    beat: None,
                };
                true
            }
            None => false,
        }
    }

    pub fn instrument_name(&self) -> Option<&'a str> {
        self.position
            .instrument
            .and_then(|i| self.score.instruments.get(i))
            .map(|i| i.name.as_str())
    }

    pub fn measure_num(&self) -> usize {
        self.position.measure
    }

    pub fn beat_index(&self) -> Option<usize> {
        self.position.beat
    }

    /// Symbol under the cursor, if it is on one
    pub fn current(&self) -> Option<&'a Symbol> {
        let measure = self.current_measure().ok()?;
        measure.get(self.position.beat?)
    }

    /// Jump to measure `n` (`0 < n < measure count`), before its first symbol
    pub fn set_measure_num(&mut self, n: usize) -> Result<(), CursorError> {
        let count = self.measures()?.len();
        if n == 0 || n >= count {
            return Err(CursorError::BadMeasure { requested: n, count });
        }

        self.position.measure = n;
        self.position.beat = None;
        Ok(())
    }

    /// Move to the next measure's first symbol
    pub fn next_measure(&mut self) -> Result<Option<&'a Symbol>, CursorError> {
        let measures = self.measures()?;
        let target = self.position.measure + 1;
        let measure = measures.get(target).ok_or(CursorError::NoNext)?;

        self.land(target, measure, 0);
        Ok(self.current())
    }

    /// Move to the previous measure's first symbol
    pub fn prev_measure(&mut self) -> Result<Option<&'a Symbol>, CursorError> {
        let measures = self.measures()?;
        let target = self.position.measure.checked_sub(1).ok_or(CursorError::NoPrev)?;

        self.land(target, &measures[target], 0);
        Ok(self.current())
    }

    /// Step forward one symbol, crossing into the next measure at the end.
    ///
    /// `Ok(None)` means the cursor landed on a measure without symbols.
    pub fn next(&mut self) -> Result<Option<&'a Symbol>, CursorError> {
        let len = self.current_measure()?.len();
        let following = self.position.beat.map_or(0, |b| b + 1);

        if following < len {
            self.position.beat = Some(following);
            return Ok(self.current());
        }

        self.next_measure()
    }

    /// Step back one symbol, crossing onto the previous measure's last symbol
    pub fn prev(&mut self) -> Result<Option<&'a Symbol>, CursorError> {
        if let Some(beat) = self.position.beat.filter(|&b| b > 0) {
            self.position.beat = Some(beat - 1);
            return Ok(self.current());
        }

        let measures = self.measures()?;
        let target = self.position.measure.checked_sub(1).ok_or(CursorError::NoPrev)?;
        let measure = &measures[target];

        self.land(target, measure, measure.len().saturating_sub(1));
        Ok(self.current())
    }

    pub fn has_next(&self) -> bool {
        let Ok(measures) = self.measures() else {
            return false;
        };
        let len = measures.get(self.position.measure).map_or(0, Measure::len);
        let following = self.position.beat.map_or(0, |b| b + 1);

        following < len || self.position.measure + 1 < measures.len()
    }

    pub fn has_prev(&self) -> bool {
        if self.measures().is_err() {
            return false;
        }
        self.position.beat.map_or(false, |b| b > 0) || self.position.measure > 0
    }

    fn measures(&self) -> Result<&'a [Measure], CursorError> {
        self.position
            .instrument
            .and_then(|i| self.score.instruments.get(i))
            .map(|i| i.beat_map.measures.as_slice())
            .ok_or(CursorError::NoInstrument)
    }

    fn current_measure(&self) -> Result<&'a Measure, CursorError> {
        let measures = self.measures()?;
        // An instrument without measures has no first measure either
        measures.get(self.position.measure).ok_or(CursorError::NoNext)
    }

    fn land(&mut self, measure_index: usize, measure: &Measure, beat: usize) {
        self.position.measure = measure_index;
        self.position.beat = if measure.is_empty() { None } else { Some(beat) };
    }
}

impl Score {
    /// Start a cursor over this score
    pub fn cursor(&self) -> BeatCursor<'_> {
        BeatCursor::new(self)
    }
}
