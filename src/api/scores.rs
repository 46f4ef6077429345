//! Score store and the JavaScript-facing query and cursor calls
//!
//! WASM owns the loaded score. Cursor state is kept beside it as a detached
//! [`CursorPosition`] and re-attached for every call.

use crate::api::helpers::{js_error, serialize, string_array};
use crate::{wasm_info, wasm_warn};
use crate::converters::build_score;
use crate::cursor::{BeatCursor, CursorError, CursorPosition};
use crate::models::{BuildSettings, Score, Symbol};
use crate::query::LookupMiss;
use lazy_static::lazy_static;
use std::sync::{Mutex, MutexGuard};
use wasm_bindgen::prelude::*;

struct Loaded {
    score: Score,
    position: CursorPosition,
}

lazy_static! {
    static ref SCORE: Mutex<Option<Loaded>> = Mutex::new(None);
}

fn store() -> Result<MutexGuard<'static, Option<Loaded>>, JsValue> {
    SCORE
        .lock()
        .map_err(|e| js_error("Score store unavailable", e))
}

fn install(score: Score) -> Result<(), JsValue> {
    *store()? = Some(Loaded {
        score,
        position: CursorPosition::default(),
    });
    Ok(())
}

/// Run a read-only query against the loaded score
fn with_score<T>(f: impl FnOnce(&Score) -> T) -> Result<T, JsValue> {
    let guard = store()?;
    let loaded = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No score loaded"))?;
    Ok(f(&loaded.score))
}

/// Run a cursor operation and store the resulting position
fn with_cursor<T>(f: impl FnOnce(&mut BeatCursor) -> T) -> Result<T, JsValue> {
    let mut guard = store()?;
    let loaded = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No score loaded"))?;

    let mut cursor = BeatCursor::resume(&loaded.score, loaded.position);
    let result = f(&mut cursor);
    let position = cursor.position();
    loaded.position = position;

    Ok(result)
}

fn step(
    name: &str,
    f: impl FnOnce(&mut BeatCursor) -> Result<Option<Symbol>, CursorError>,
) -> Result<JsValue, JsValue> {
    match with_cursor(f)? {
        Ok(Some(symbol)) => serialize(&symbol, "Symbol serialization error"),
        Ok(None) => Ok(JsValue::NULL),
        Err(e) => {
            wasm_warn!("{}: {}", name, e);
            Err(JsValue::from_str(&e.to_string()))
        }
    }
}

/// Build a score from MusicXML text and make it the loaded score
///
/// `settings_json` is an optional JSON `BuildSettings` object.
#[wasm_bindgen(js_name = loadMusicXML)]
pub fn load_musicxml(xml: &str, settings_json: Option<String>) -> Result<(), JsValue> {
    wasm_info!("loadMusicXML called ({} bytes)", xml.len());

    let settings: BuildSettings = match settings_json.as_deref() {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(json).map_err(|e| js_error("Invalid build settings", e))?
        }
        _ => BuildSettings::default(),
    };

    let score = build_score(xml, &settings).map_err(|e| js_error("MusicXML build error", e))?;
    wasm_info!("  Loaded {} instruments", score.instruments.len());

    install(score)
}

/// Load a score from its JSON cache form
#[wasm_bindgen(js_name = loadScoreJson)]
pub fn load_score_json(json: &str) -> Result<(), JsValue> {
    wasm_info!("loadScoreJson called");

    let score = Score::from_json(json).map_err(|e| js_error("Score cache error", e))?;
    install(score)
}

/// JSON cache form of the loaded score
#[wasm_bindgen(js_name = exportScoreJson)]
pub fn export_score_json() -> Result<String, JsValue> {
    with_score(Score::to_json)?.map_err(|e| js_error("Score cache error", e))
}

#[wasm_bindgen(js_name = getInstrumentNames)]
pub fn get_instrument_names() -> Result<js_sys::Array, JsValue> {
    with_score(|score| string_array(&score.instrument_names()))
}

/// `{minPitch, maxPitch}`, or `null` when there is nothing pitched to measure
#[wasm_bindgen(js_name = getPitchRange)]
pub fn get_pitch_range(instrument: Option<String>) -> Result<JsValue, JsValue> {
    match with_score(|score| score.pitch_range(instrument.as_deref()))? {
        Ok(range) => serialize(&range, "Pitch range serialization error"),
        Err(LookupMiss::NoPitchedContent) => Ok(JsValue::NULL),
        Err(miss) => {
            wasm_warn!("getPitchRange: {}", miss);
            Ok(JsValue::NULL)
        }
    }
}

#[wasm_bindgen(js_name = getKeySignatures)]
pub fn get_key_signatures() -> Result<js_sys::Array, JsValue> {
    with_score(|score| string_array(score.key_signatures()))
}

#[wasm_bindgen(js_name = getTempos)]
pub fn get_tempos() -> Result<Vec<u32>, JsValue> {
    with_score(|score| score.tempos().to_vec())
}

#[wasm_bindgen(js_name = getInstrumentsWithMelody)]
pub fn get_instruments_with_melody(pattern: &str) -> Result<js_sys::Array, JsValue> {
    with_score(|score| string_array(&score.instruments_with_melody(pattern)))
}

#[wasm_bindgen(js_name = selectInstrument)]
pub fn select_instrument(name: &str) -> Result<bool, JsValue> {
    let selected = with_cursor(|cursor| cursor.select_instrument(name))?;
    if !selected {
        wasm_warn!("selectInstrument: unknown instrument '{}'", name);
    }
    Ok(selected)
}

#[wasm_bindgen(js_name = setMeasureNum)]
pub fn set_measure_num(n: usize) -> Result<(), JsValue> {
    with_cursor(|cursor| cursor.set_measure_num(n))?.map_err(|e| {
        wasm_warn!("setMeasureNum: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Next symbol (or `null` for an empty measure); throws at the end
#[wasm_bindgen(js_name = next)]
pub fn next() -> Result<JsValue, JsValue> {
    step("next", |cursor| cursor.next().map(|s| s.cloned()))
}

#[wasm_bindgen(js_name = prev)]
pub fn prev() -> Result<JsValue, JsValue> {
    step("prev", |cursor| cursor.prev().map(|s| s.cloned()))
}

#[wasm_bindgen(js_name = nextMeasure)]
pub fn next_measure() -> Result<JsValue, JsValue> {
    step("nextMeasure", |cursor| cursor.next_measure().map(|s| s.cloned()))
}

#[wasm_bindgen(js_name = prevMeasure)]
pub fn prev_measure() -> Result<JsValue, JsValue> {
    step("prevMeasure", |cursor| cursor.prev_measure().map(|s| s.cloned()))
}

#[wasm_bindgen(js_name = hasNext)]
pub fn has_next() -> Result<bool, JsValue> {
    with_cursor(|cursor| cursor.has_next())
}

#[wasm_bindgen(js_name = hasPrev)]
pub fn has_prev() -> Result<bool, JsValue> {
    with_cursor(|cursor| cursor.has_prev())
}
