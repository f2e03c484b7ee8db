//! Node classification: one top-level syntax node → score elements
//!
//! Most nodes map to a single element. Chords may add an error marker per
//! malformed member, and a dotted rhythm splits into its two partners.

use crate::models::elements::{
    Chord, Decoration, Element, ErrorMarker, Event, GenericElement, Note, Rest, Rhythm,
};
use crate::syntax::{NodeKind, SyntaxNode};
use crate::text::cursor::TextRange;

/// Source name for top-level error nodes
const ERROR_SOURCE: &str = "ABC";

/// Classify a top-level node
///
/// Callers skip trivia (`Program`, `Comment`) before classifying. The result
/// is never empty.
pub fn classify(node: SyntaxNode<'_>, text: &str) -> Vec<Element> {
    match node.kind() {
        NodeKind::Metadata => vec![Element::Metadata(generic(node, text))],
        NodeKind::Barline => vec![Element::Barline(generic(node, text))],
        NodeKind::Note | NodeKind::Rest => vec![classify_note(node, text)],
        NodeKind::Chord => classify_chord(node, text),
        NodeKind::DottedRhythm => classify_dotted(node, text),
        NodeKind::Decoration => vec![Element::Event(Event::Decoration(decoration(node, text)))],
        NodeKind::Error => vec![Element::Error(error_marker(node, text, ERROR_SOURCE))],
        NodeKind::Program
        | NodeKind::Comment
        | NodeKind::Dot
        | NodeKind::Ornament(_)
        | NodeKind::Pitch
        | NodeKind::Accidental
        | NodeKind::Octave
        | NodeKind::Duration
        | NodeKind::Other(_) => vec![Element::Event(Event::Other(generic(node, text)))],
    }
}

/// Name, raw text and span of any node
pub fn generic(node: SyntaxNode<'_>, text: &str) -> GenericElement {
    GenericElement {
        name: node.kind().name().to_string(),
        raw_text: node.text(text).to_string(),
        range: node.range(),
    }
}

fn error_marker(node: SyntaxNode<'_>, text: &str, source: &str) -> ErrorMarker {
    ErrorMarker {
        source: source.to_string(),
        raw_text: node.text(text).to_string(),
        range: node.range(),
        error_fragment: None,
    }
}

/// Fields read from a note's or rest's immediate children
#[derive(Default)]
struct NoteFields {
    pitch: Option<String>,
    accidental: String,
    octave: String,
    duration: String,
    error_fragment: Option<String>,
}

impl NoteFields {
    fn read(node: SyntaxNode<'_>, text: &str) -> Self {
        let mut fields = NoteFields::default();
        for child in node.children() {
            let content = child.text(text).to_string();
            match child.kind() {
                NodeKind::Pitch if !child.range().is_empty() => fields.pitch = Some(content),
                NodeKind::Accidental => fields.accidental = content,
                NodeKind::Octave => fields.octave = content,
                NodeKind::Duration => fields.duration = content,
                NodeKind::Error => fields.error_fragment = Some(content),
                _ => {}
            }
        }
        fields
    }

    fn rhythm(&self) -> Rhythm {
        Rhythm {
            duration: self.duration.clone(),
            ..Rhythm::default()
        }
    }
}

/// Note or rest; a note without a pitch becomes an error marker
fn classify_note(node: SyntaxNode<'_>, text: &str) -> Element {
    let fields = NoteFields::read(node, text);
    let raw_text = node.text(text).to_string();
    let range = node.range();

    if node.kind() == &NodeKind::Rest {
        return Element::Event(Event::Rest(Rest {
            raw_text,
            range,
            rhythm: fields.rhythm(),
            error_fragment: fields.error_fragment,
            timing: None,
        }));
    }

    match note_from_fields(fields, raw_text.clone(), range) {
        Some(note) => Element::Event(Event::Note(note)),
        None => Element::Error(ErrorMarker {
            source: "Note".to_string(),
            raw_text,
            range,
            error_fragment: None,
        }),
    }
}

fn note_from_fields(fields: NoteFields, raw_text: String, range: TextRange) -> Option<Note> {
    let rhythm = fields.rhythm();
    Some(Note {
        raw_text,
        range,
        pitch: fields.pitch?,
        accidental: fields.accidental,
        octave: fields.octave,
        rhythm,
        error_fragment: fields.error_fragment,
        timing: None,
    })
}

/// Chord with its well-formed members
///
/// Malformed members become their own error markers. A chord with no
/// well-formed member is one error marker over the whole chord.
fn classify_chord(node: SyntaxNode<'_>, text: &str) -> Vec<Element> {
    let mut notes = Vec::new();
    let mut errors = Vec::new();

    for child in node.children() {
        match child.kind() {
            NodeKind::Note => {
                let fields = NoteFields::read(child, text);
                let raw_text = child.text(text).to_string();
                let well_formed = fields.error_fragment.is_none();
                let fragment = fields.error_fragment.clone();
                match note_from_fields(fields, raw_text.clone(), child.range()) {
                    Some(note) if well_formed => notes.push(note),
                    _ => errors.push(ErrorMarker {
                        source: "Chord".to_string(),
                        raw_text,
                        range: child.range(),
                        error_fragment: fragment,
                    }),
                }
            }
            NodeKind::Error => errors.push(error_marker(child, text, "Chord")),
            _ => {}
        }
    }

    if notes.is_empty() {
        log::debug!("chord at {} has no valid notes", node.range().from);
        return vec![Element::Error(error_marker(node, text, "Chord"))];
    }

    // The first member's duration applies to the whole chord
    let duration = notes[0].rhythm.duration.clone();
    for note in &mut notes {
        note.rhythm.duration = duration.clone();
    }
    let members: String = notes.iter().map(|n| n.raw_text.as_str()).collect();

    let mut elements: Vec<Element> = errors.into_iter().map(Element::Error).collect();
    elements.push(Element::Event(Event::Chord(Chord {
        raw_text: format!("[{}]", members),
        range: node.range(),
        notes,
        rhythm: Rhythm {
            duration,
            ..Rhythm::default()
        },
        timing: None,
    })));
    elements
}

fn decoration(node: SyntaxNode<'_>, text: &str) -> Decoration {
    let ornament = node.children().find_map(|child| match child.kind() {
        NodeKind::Ornament(ornament) => Some(*ornament),
        _ => None,
    });
    let name = match ornament {
        Some(ornament) => split_camel_case(ornament.node_name()),
        None => "Decoration".to_string(),
    };
    Decoration {
        raw_text: node.text(text).to_string(),
        range: node.range(),
        name,
        ornament,
    }
}

/// `StaccatoMark` → `Staccato Mark`
pub fn split_camel_case(name: &str) -> String {
    let mut words = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            words.push(' ');
        }
        words.push(ch);
    }
    words
}

/// Split a dotted rhythm into its two partners
///
/// The dot run is appended to the first partner (text and span) and recorded
/// as the leading marker of the second.
fn classify_dotted(node: SyntaxNode<'_>, text: &str) -> Vec<Element> {
    let mut dot: Option<GenericElement> = None;
    let mut partners: Vec<Event> = Vec::new();
    let mut errors: Vec<Element> = Vec::new();

    for child in node.children() {
        match child.kind() {
            NodeKind::Dot => dot = Some(generic(child, text)),
            NodeKind::Note | NodeKind::Rest | NodeKind::Chord => {
                for element in classify(child, text) {
                    match element {
                        Element::Event(event) if event.is_timed() => partners.push(event),
                        Element::Error(marker) => errors.push(Element::Error(marker)),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    let dot = match dot {
        Some(dot) if partners.len() >= 2 => dot,
        _ => return vec![Element::Error(error_marker(node, text, "DottedRhythm"))],
    };

    let mut partners = partners.into_iter();
    let (Some(mut first), Some(mut second)) = (partners.next(), partners.next()) else {
        return vec![Element::Error(error_marker(node, text, "DottedRhythm"))];
    };

    if let Some(rhythm) = first.rhythm_mut() {
        rhythm.post_dot = dot.raw_text.clone();
    }
    first.raw_text_mut().push_str(&dot.raw_text);
    first.range_mut().to = dot.range.to;
    if let Some(rhythm) = second.rhythm_mut() {
        rhythm.pre_dot = dot.raw_text.clone();
    }

    errors.push(Element::Event(first));
    errors.push(Element::Event(second));
    errors.extend(partners.map(Element::Event));
    errors
}
