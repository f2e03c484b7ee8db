//! Structuring pipeline
//!
//! One pass per document change:
//!
//! ```text
//! SyntaxTree ─ classify ─▶ elements ─ build ─▶ Score ─ annotate ─▶ timed Score
//!                  │                                   │
//!                  └──── error markers ──▶ Diagnostics ◀── measure checks
//!                                                      │
//!                                      serialize ─▶ canonical ABC
//! ```
//!
//! The result replaces the previous one as a whole; nothing is patched in
//! place.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::config::EngineConfig;
use crate::diagnostics::{
    classify_measure, report_embedded_fragment, report_error_marker, report_measure, Diagnostics,
};
use crate::error::Result;
use crate::models::elements::Element;
use crate::models::score::Score;
use crate::parse::parse_abc;
use crate::renderers::abc::serialize;
use crate::structure::{annotate, build_score, classify};
use crate::syntax::{RawNode, SyntaxTree};

pub use crate::structure::position::{locate, CursorLocation};

/// Everything derived from one version of the document
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Structured {
    pub score: Score,
    pub diagnostics: Diagnostics,
    /// Canonical, error-free text
    pub abc: String,
    /// Length of the score in seconds
    pub duration: f64,
}

/// Structure a document from its syntax tree
///
/// Never fails: problems in the text end up in `diagnostics`.
pub fn structure(tree: &SyntaxTree, text: &str, config: &EngineConfig) -> Structured {
    let defaults = config.defaults.to_metadata();
    let mut diagnostics = Diagnostics::new();
    let mut elements = Vec::new();

    for node in tree.root().children() {
        if node.kind().is_trivia() {
            continue;
        }
        for element in classify(node, text) {
            match element {
                Element::Error(marker) => diagnostics.extend(report_error_marker(&marker)),
                Element::Event(mut event) => {
                    diagnostics.extend(report_embedded_fragment(&mut event));
                    elements.push(Element::Event(event));
                }
                other => elements.push(other),
            }
        }
    }

    let (mut score, warnings) =
        build_score(elements, defaults.clone(), config.warn_invalid_metadata);
    diagnostics.extend(warnings);

    let (duration, untimeable) = annotate(&mut score, &defaults);
    for marker in &untimeable {
        diagnostics.extend(report_error_marker(marker));
    }
    for section in &mut score.sections {
        for measure in &mut section.measures {
            classify_measure(measure, config.fill_tolerance);
            diagnostics.extend(report_measure(measure));
        }
    }

    let abc = serialize(&score, &config.default_music);
    log::debug!(
        "structured {} sections, {} measures, {} diagnostics",
        score.sections.len(),
        score.measures().count(),
        diagnostics.len()
    );

    Structured {
        score,
        diagnostics,
        abc,
        duration,
    }
}

/// Parse `text` with the bundled grammar and structure it
pub fn structure_text(text: &str, config: &EngineConfig) -> Structured {
    structure(&parse_abc(text), text, config)
}

/// Structure a document from a host-supplied tree
pub fn structure_raw(raw: &RawNode, text: &str, config: &EngineConfig) -> Result<Structured> {
    let tree = SyntaxTree::from_raw(raw, text.len())?;
    Ok(structure(&tree, text, config))
}

/// Latest structuring result, swapped in whole
#[derive(Debug, Default)]
pub struct ScoreStore {
    current: RwLock<Arc<Structured>>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new result; returns it for immediate use
    pub fn replace(&self, next: Structured) -> Arc<Structured> {
        let next = Arc::new(next);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::clone(&next);
        next
    }

    /// Snapshot of the current result
    pub fn current(&self) -> Arc<Structured> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&current)
    }
}
