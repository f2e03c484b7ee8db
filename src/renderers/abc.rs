//! Canonical ABC output
//!
//! Rebuilds the text from the score: header lines, then each measure's events
//! with whitespace removed, followed by its closing barline. An opening
//! barline is only written when it does not also close the previous measure.
//! Error markers never reach the score, so the output only holds what could
//! be processed. The output reads back into the same structure.

use crate::models::score::{Score, Section};
use crate::parse::tokens::is_header_line;
use crate::text::cursor::TextRange;

/// Serialize `score`; `default_music` is appended when it has no notes
pub fn serialize(score: &Score, default_music: &str) -> String {
    let mut output = String::new();
    let mut last_closing: Option<TextRange> = None;

    let emitted = score
        .sections
        .iter()
        .enumerate()
        .filter(|(i, section)| *i == 0 || section.has_measures() || section.metadata.has_lyrics())
        .map(|(_, section)| section);

    for section in emitted {
        write_section(&mut output, section, &mut last_closing);
    }

    if !score.has_notes() {
        output.push_str(default_music);
        output.push('\n');
    }
    output
}

fn write_section(output: &mut String, section: &Section, last_closing: &mut Option<TextRange>) {
    for entry in section.metadata.iter() {
        output.push(entry.key);
        output.push(':');
        output.push_str(&entry.value);
        output.push('\n');
    }

    let mut line = String::new();
    let mut after_barline = false;

    for measure in &section.measures {
        // A barline shared with the previous measure is written once
        if let Some(barline) = &measure.left_barline {
            if *last_closing != Some(barline.range) {
                push_barline(&mut line, &barline.text, &mut after_barline);
            }
        }
        for event in &measure.events {
            line.extend(event.raw_text().chars().filter(|c| !c.is_whitespace()));
            after_barline = false;
        }
        if let Some(barline) = &measure.right_barline {
            push_barline(&mut line, &barline.text, &mut after_barline);
        }
        *last_closing = measure.right_barline.as_ref().map(|b| b.range);
    }

    // `A:|` would read back as a header line
    if is_header_line(&line) {
        line.insert(1, ' ');
    }
    output.push_str(&line);
    output.push('\n');
}

fn push_barline(line: &mut String, text: &str, after_barline: &mut bool) {
    // Adjacent barlines would merge into a different one
    if *after_barline {
        line.push(' ');
    }
    line.push_str(text);
    *after_barline = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MUSIC;
    use crate::models::barlines::Barline;
    use crate::models::elements::{Event, GenericElement, Rest, Rhythm};
    use crate::models::score::Measure;
    use crate::text::cursor::TextRange;

    fn rest(raw: &str) -> Event {
        Event::Rest(Rest {
            raw_text: raw.into(),
            range: TextRange::new(0, raw.len()),
            rhythm: Rhythm::default(),
            error_fragment: None,
            timing: None,
        })
    }

    #[test]
    fn test_empty_score_gets_default_music() {
        let mut section = Section::new();
        section.metadata.insert('X', "1");
        let score = Score {
            sections: vec![section],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "X:1\n\n| z4 |]\n");
    }

    #[test]
    fn test_measures_and_barlines() {
        let mut measure = Measure::after_barline(1, Barline::new("|:", TextRange::new(0, 2)));
        measure.events = vec![rest("z 2"), rest(" z2")];
        measure.right_barline = Some(Barline::new(":|", TextRange::new(9, 11)));
        let mut section = Section::new();
        section.measures.push(measure);
        let score = Score {
            sections: vec![section],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "|:z2z2:|\n");
    }

    #[test]
    fn test_skips_empty_later_sections_unless_lyrics() {
        let mut first = Section::new();
        let mut measure = Measure::new(0);
        measure.events.push(rest("z4"));
        first.measures.push(measure);

        let mut empty = Section::new();
        empty.metadata.insert('T', "dropped");
        let mut lyrics = Section::new();
        lyrics.metadata.insert('w', "la la");

        let score = Score {
            sections: vec![first, empty, lyrics],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "z4\nw:la la\n\n");
    }

    #[test]
    fn test_pass_through_elements_are_kept() {
        let mut measure = Measure::new(0);
        measure.events.push(Event::Other(GenericElement {
            name: "Annotation".into(),
            raw_text: "\"Am\"".into(),
            range: TextRange::new(0, 4),
        }));
        measure.events.push(rest("z"));
        let mut section = Section::new();
        section.measures.push(measure);
        let score = Score {
            sections: vec![section],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "\"Am\"z\n");
    }

    #[test]
    fn test_music_line_is_not_read_as_header() {
        let mut pickup = Measure::new(0);
        pickup.events.push(rest("A"));
        pickup.right_barline = Some(Barline::new(":|", TextRange::new(2, 4)));
        let mut section = Section::new();
        section.measures.push(pickup);
        let score = Score {
            sections: vec![section],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "A :|\n");
    }

    #[test]
    fn test_adjacent_barlines_stay_apart() {
        let mut first = Measure::after_barline(1, Barline::new("|", TextRange::new(0, 1)));
        first.events.push(rest("z4"));
        first.right_barline = Some(Barline::new("|", TextRange::new(5, 6)));
        let mut empty = Measure::after_barline(2, Barline::new("|", TextRange::new(5, 6)));
        empty.right_barline = Some(Barline::new("|]", TextRange::new(7, 9)));
        let mut section = Section::new();
        section.measures.extend([first, empty]);
        let score = Score {
            sections: vec![section],
        };
        assert_eq!(serialize(&score, DEFAULT_MUSIC), "|z4| |]\n");
    }
}
