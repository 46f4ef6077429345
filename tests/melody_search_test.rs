// Melody containment search over built scores

mod common;

use common::{chord, melody, note, score_xml};
use score_index_wasm::musicxml_to_score;

fn two_parts() -> score_index_wasm::Score {
    let xml = score_xml(&[("Violin", &melody("ABGBCE", 5)), ("Flute", &melody("EGDA", 5))]);
    musicxml_to_score(&xml).unwrap()
}

#[test]
fn test_each_instrument_found_by_its_own_figure() {
    let score = two_parts();

    assert_eq!(score.instruments_with_melody("BGBC"), vec!["Violin"]);
    assert_eq!(score.instruments_with_melody("GD"), vec!["Flute"]);
    assert_eq!(score.instruments_with_melody("A"), vec!["Violin", "Flute"]);
}

#[test]
fn test_search_is_exact() {
    let score = two_parts();

    assert!(score.instruments_with_melody("bgbc").is_empty());
    assert!(score.instruments_with_melody("CBGB").is_empty());
    assert!(score.instruments_with_melody("BGBCEA").is_empty());
}

#[test]
fn test_figure_spans_barline() {
    // "BGBC" straddles measures 1 and 2 of the violin part
    let score = two_parts();
    assert_eq!(score.letter_string("Violin").as_deref(), Some("ABGBCE"));
    assert_eq!(score.instrument("Violin").map(|b| b.measure_count()), Some(2));
}

#[test]
fn test_chords_flatten_low_to_high() {
    // Written top-down; read back bottom-up
    let measures = format!(
        "<measure number=\"1\"><attributes><divisions>1</divisions></attributes>{}{}{}{}</measure>",
        note("G", 4, 1, None),
        chord("E", 4, 1, None),
        chord("C", 4, 1, None),
        note("D", 4, 1, None),
    );
    let score = musicxml_to_score(&score_xml(&[("Guitar", &measures)])).unwrap();

    assert_eq!(score.letter_string("Guitar").as_deref(), Some("CEGD"));
    assert_eq!(score.instruments_with_melody("GD"), vec!["Guitar"]);
    assert!(score.instruments_with_melody("GECD").is_empty());
}

#[test]
fn test_rests_do_not_break_a_figure() {
    let measures = format!(
        "<measure number=\"1\"><attributes><divisions>1</divisions></attributes>{}{}{}</measure>",
        note("F", 4, 1, None),
        common::rest(2),
        note("A", 4, 1, None),
    );
    let score = musicxml_to_score(&score_xml(&[("Clarinet", &measures)])).unwrap();

    assert_eq!(score.instruments_with_melody("FA"), vec!["Clarinet"]);
}

#[test]
fn test_unknown_instrument_has_no_letters() {
    assert_eq!(two_parts().letter_string("Tuba"), None);
}
