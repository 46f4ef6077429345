//! XML access layer for beat map construction
//!
//! Wraps roxmltree: opens the document, resolves part names, and decodes the
//! children of a `<measure>` into [`MeasureEvent`]s. Decoding happens once per
//! element, so the builder never probes the XML tree again.

use super::errors::{BuildError, BuildResult};
use crate::models::pitch::{Accidental, Letter, Tone, OCTAVES};
use crate::models::settings::BuildSettings;
use roxmltree::{Document, Node, ParsingOptions};
use std::collections::HashMap;

// ============================================================================
// DOCUMENT ACCESS
// ============================================================================

/// Parse the MusicXML text and check the root element
pub fn parse_document(xml: &str) -> BuildResult<Document<'_>> {
    // Most exported scores carry a DOCTYPE line
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };

    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| BuildError::InvalidXml(e.to_string()))?;

    match doc.root_element().tag_name().name() {
        "score-partwise" => Ok(doc),
        other => Err(BuildError::UnsupportedFormat(format!(
            "Expected score-partwise, found {}",
            other
        ))),
    }
}

/// Get first child element with given tag name
pub fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Get the trimmed text of the first child with given tag
pub fn get_child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    get_child(node, tag).and_then(|n| n.text()).map(str::trim)
}

pub fn has_child(node: Node, tag: &str) -> bool {
    get_child(node, tag).is_some()
}

/// Map part id -> part name from `<part-list>`
pub fn part_names(score: Node) -> HashMap<String, String> {
    let mut names = HashMap::new();

    let Some(part_list) = get_child(score, "part-list") else {
        return names;
    };

    for score_part in part_list
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "score-part")
    {
        if let Some(id) = score_part.attribute("id") {
            let name = get_child_text(score_part, "part-name")
                .filter(|s| !s.is_empty())
                .unwrap_or(id);
            names.insert(id.to_string(), name.to_string());
        }
    }

    names
}

/// All `<part>` elements with their display names, in document order
pub fn parts<'a, 'input>(score: Node<'a, 'input>) -> BuildResult<Vec<(String, Node<'a, 'input>)>> {
    let names = part_names(score);

    let parts: Vec<_> = score
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "part")
        .enumerate()
        .map(|(index, node)| {
            let name = node
                .attribute("id")
                .map(|id| names.get(id).cloned().unwrap_or_else(|| id.to_string()))
                .unwrap_or_else(|| format!("Part {}", index + 1));
            (name, node)
        })
        .collect();

    if parts.is_empty() {
        return Err(BuildError::MissingElement("No parts found in score".to_string()));
    }

    Ok(parts)
}

/// `<measure>` children of a part
pub fn measures<'a, 'input>(part: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    part.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "measure")
        .collect()
}

// ============================================================================
// MEASURE EVENTS
// ============================================================================

/// Where in the document an element was found (for error messages)
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    pub part: &'a str,
    /// 1-based measure position within the part
    pub measure: usize,
}

/// What a `<note>` contributes, decided once at decode time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Rest,
    Pitched(Tone),
    /// Marked `<chord/>`: sounds with the previous note
    ChordContinuation(Tone),
}

/// One time-relevant child of a `<measure>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureEvent {
    Divisions(i32),
    Note { kind: NoteKind, duration: u32 },
    /// Grace note kept by the settings: sounds at the cursor, takes no time
    Grace(Option<Tone>),
    Backup(u32),
    Forward(u32),
}

/// Decode the children of a `<measure>` in document order
pub fn decode_measure(
    measure: Node,
    loc: Location,
    settings: &BuildSettings,
) -> BuildResult<Vec<MeasureEvent>> {
    let mut events = Vec::new();

    for child in measure.children().filter(|n| n.is_element()) {
        let event = match child.tag_name().name() {
            "attributes" => decode_divisions(child, loc)?.map(MeasureEvent::Divisions),
            "note" => decode_note(child, loc, settings)?,
            "backup" => Some(MeasureEvent::Backup(decode_duration(child, loc)?)),
            "forward" => Some(MeasureEvent::Forward(decode_duration(child, loc)?)),
            // print, sound, barline, direction, ...
            _ => None,
        };

        if let Some(event) = event {
            events.push(event);
        }
    }

    Ok(events)
}

fn decode_divisions(attributes: Node, loc: Location) -> BuildResult<Option<i32>> {
    let Some(text) = get_child_text(attributes, "divisions") else {
        return Ok(None);
    };

    match text.parse::<i32>() {
        Ok(divisions) if divisions > 0 => Ok(Some(divisions)),
        _ => Err(BuildError::MalformedDivisions {
            part: loc.part.to_string(),
            measure: loc.measure,
            value: text.to_string(),
        }),
    }
}

/// Parse the `<duration>` child of a note, backup or forward element.
///
/// Durations are kept within `i32` so the builder's signed cursor can move
/// by them in either direction.
fn decode_duration(node: Node, loc: Location) -> BuildResult<u32> {
    let text = get_child_text(node, "duration").unwrap_or("");

    match text.parse::<i32>() {
        Ok(duration) if duration > 0 => Ok(duration.unsigned_abs()),
        _ => Err(BuildError::MalformedDuration {
            part: loc.part.to_string(),
            measure: loc.measure,
            value: text.to_string(),
        }),
    }
}

fn decode_note(
    note: Node,
    loc: Location,
    settings: &BuildSettings,
) -> BuildResult<Option<MeasureEvent>> {
    let tone = match get_child(note, "pitch") {
        Some(pitch) => Some(decode_tone(note, pitch, loc)?),
        // <rest/> and <unpitched/> carry no pitch
        None => None,
    };

    if has_child(note, "grace") {
        if settings.skip_grace_notes {
            return Ok(None);
        }
        return Ok(Some(MeasureEvent::Grace(tone)));
    }

    let duration = decode_duration(note, loc)?;

    let kind = match (tone, has_child(note, "chord")) {
        (Some(tone), true) => NoteKind::ChordContinuation(tone),
        (Some(tone), false) => NoteKind::Pitched(tone),
        (None, false) => NoteKind::Rest,
        // A rest cannot extend a chord
        (None, true) => return Ok(None),
    };

    Ok(Some(MeasureEvent::Note { kind, duration }))
}

fn decode_tone(note: Node, pitch: Node, loc: Location) -> BuildResult<Tone> {
    let step = get_child_text(pitch, "step")
        .ok_or_else(|| BuildError::MissingElement("pitch missing step element".to_string()))?;
    let letter = Letter::parse(step)?;

    let octave_text = get_child_text(pitch, "octave").unwrap_or("");
    let octave = match octave_text.parse::<i32>() {
        Ok(octave) if OCTAVES.contains(&octave) => octave,
        _ => {
            return Err(BuildError::MalformedOctave {
                part: loc.part.to_string(),
                measure: loc.measure,
                value: octave_text.to_string(),
            })
        }
    };

    // Displayed accidental markers, not <alter>
    let accidentals: Vec<Accidental> = note
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "accidental")
        .filter_map(|n| n.text())
        .map(Accidental::from_musicxml)
        .collect();

    Ok(Tone::new(letter, &accidentals, octave))
}

// ============================================================================
// DOCUMENT-LEVEL MARKERS
// ============================================================================

const MAJOR_KEYS: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];

const MINOR_KEYS: [&str; 15] = [
    "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m", "A#m",
];

/// Conventional name for a key signature, e.g. `-2 => "Bb"`
pub fn key_label(fifths: i32, minor: bool) -> Option<&'static str> {
    if !(-7..=7).contains(&fifths) {
        return None;
    }
    let index = (fifths + 7) as usize;
    Some(if minor { MINOR_KEYS[index] } else { MAJOR_KEYS[index] })
}

/// Key signature labels declared in a measure
pub fn key_marks(measure: Node) -> Vec<String> {
    let mut labels = Vec::new();

    for key in measure
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "attributes")
        .flat_map(|attributes| attributes.children())
        .filter(|n| n.is_element() && n.tag_name().name() == "key")
    {
        let Some(fifths_text) = get_child_text(key, "fifths") else {
            // Non-traditional keys (<key-step>/<key-alter>) have no conventional name
            continue;
        };
        let minor = get_child_text(key, "mode") == Some("minor");

        match fifths_text.parse::<i32>().ok().and_then(|f| key_label(f, minor)) {
            Some(label) => labels.push(label.to_string()),
            None => log::warn!("Skipping key signature with fifths '{}'", fifths_text),
        }
    }

    labels
}

/// Tempo markers (`<sound tempo="...">`) in a measure, rounded to whole BPM
pub fn tempo_marks(measure: Node) -> Vec<u32> {
    let mut tempos = Vec::new();

    for sound in measure
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sound")
    {
        let Some(text) = sound.attribute("tempo") else {
            continue;
        };

        match text.trim().parse::<f64>() {
            Ok(bpm) if bpm.is_finite() && bpm > 0.0 => tempos.push(bpm.round() as u32),
            _ => log::warn!("Skipping tempo marker with value '{}'", text),
        }
    }

    tempos
}
