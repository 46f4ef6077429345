//! Shared MusicXML fixtures for integration tests

#![allow(dead_code)]

/// Wrap (part name, measures) pairs into a score-partwise document
pub fn score_xml(parts: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n\
         <score-partwise version=\"3.1\">\n  <part-list>\n",
    );
    for (i, (name, _)) in parts.iter().enumerate() {
        xml.push_str(&format!(
            "    <score-part id=\"P{}\"><part-name>{}</part-name></score-part>\n",
            i + 1,
            name
        ));
    }
    xml.push_str("  </part-list>\n");
    for (i, (_, measures)) in parts.iter().enumerate() {
        xml.push_str(&format!("  <part id=\"P{}\">\n{}\n  </part>\n", i + 1, measures));
    }
    xml.push_str("</score-partwise>\n");
    xml
}

/// A `<note>` with an optional displayed accidental
pub fn note(step: &str, octave: i32, duration: u32, accidental: Option<&str>) -> String {
    let accidental = accidental
        .map(|a| format!("<accidental>{}</accidental>", a))
        .unwrap_or_default();
    format!(
        "<note><pitch><step>{}</step><octave>{}</octave></pitch><duration>{}</duration>{}</note>",
        step, octave, duration, accidental
    )
}

pub fn chord(step: &str, octave: i32, duration: u32, accidental: Option<&str>) -> String {
    note(step, octave, duration, accidental).replacen("<note>", "<note><chord/>", 1)
}

pub fn rest(duration: u32) -> String {
    format!("<note><rest/><duration>{}</duration></note>", duration)
}

/// Quarter notes (divisions = 1) spelling out a letter sequence, four per measure
pub fn melody(letters: &str, octave: i32) -> String {
    let notes: Vec<String> = letters
        .chars()
        .map(|c| note(&c.to_string(), octave, 1, None))
        .collect();

    notes
        .chunks(4)
        .enumerate()
        .map(|(i, chunk)| {
            let attributes = if i == 0 {
                "<attributes><divisions>1</divisions></attributes>"
            } else {
                ""
            };
            format!("<measure number=\"{}\">{}{}</measure>", i + 1, attributes, chunk.concat())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two parts: a voice in F3..F4 and a piano reaching down to Eb0 and up to Ab4
pub fn voice_and_piano() -> String {
    let voice = format!(
        "<measure number=\"1\">\
           <attributes><divisions>1</divisions><key><fifths>-2</fifths></key></attributes>\
           <direction><sound tempo=\"66\"/></direction>\
           {}{}{}{}\
         </measure>\
         <measure number=\"2\">{}</measure>",
        note("F", 3, 1, None),
        note("A", 3, 1, None),
        note("C", 4, 1, None),
        note("F", 4, 1, None),
        rest(4),
    );

    let piano = format!(
        "<measure number=\"1\">\
           <attributes><divisions>2</divisions><key><fifths>-2</fifths></key></attributes>\
           {}{}{}\
           <backup><duration>4</duration></backup>\
           {}\
         </measure>\
         <measure number=\"2\">{}{}</measure>",
        note("E", 0, 2, Some("flat")),
        chord("A", 4, 2, Some("flat")),
        note("B", 3, 2, Some("flat")),
        note("C", 4, 4, None),
        note("F", 3, 4, None),
        note("D", 4, 4, None),
    );

    score_xml(&[("Voice", &voice), ("Piano", &piano)])
}
