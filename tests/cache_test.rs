// JSON cache form of a score

mod common;

use common::voice_and_piano;
use score_index_wasm::{musicxml_to_score, Score};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cached_score_answers_like_the_built_one() {
    let built = musicxml_to_score(&voice_and_piano()).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("score.json");
    fs::write(&path, built.to_json().unwrap()).unwrap();

    let cached = Score::from_json(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(cached, built);
    assert_eq!(cached.instrument_names(), built.instrument_names());
    assert_eq!(cached.pitch_range(None), built.pitch_range(None));
    assert_eq!(cached.instruments_with_melody("FACF"), vec!["Voice"]);
}

#[test]
fn test_cache_form_field_names() {
    let built = musicxml_to_score(&voice_and_piano()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&built.to_json().unwrap()).unwrap();

    assert_eq!(value["keySignatures"][0], "Bb");
    assert_eq!(value["instruments"][0]["name"], "Voice");
    // beat 1 of the first symbol, as [numerator, denominator]
    assert_eq!(value["instruments"][0]["beatMap"][0][0]["beat"], serde_json::json!([1, 1]));
}

#[test]
fn test_corrupt_cache_is_an_error() {
    assert!(Score::from_json("{\"instruments\": 3}").is_err());
}
