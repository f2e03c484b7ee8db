//! ABC sketch structuring engine
//!
//! Turns an ABC-style music sketch (its syntax tree plus the text) into a
//! validated score: sections, measures and timed events, positioned
//! diagnostics, a playback schedule, and a canonical error-free rendition of
//! the text.
//!
//! ```
//! use abc_sketch_wasm::{structure_text, EngineConfig};
//!
//! let result = structure_text("K:G\n| G A B c |]", &EngineConfig::default());
//! assert_eq!(result.abc, "K:G\n|GABc|]\n");
//! assert!(result.diagnostics.is_empty());
//! ```

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod models;
pub mod parse;
pub mod renderers;
pub mod structure;
pub mod syntax;
pub mod text;
pub mod theory;

// Re-export commonly used types
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use engine::{locate, structure, structure_raw, structure_text, ScoreStore, Structured};
pub use error::{ConfigError, EngineError, Result};
pub use models::{Measure, MeasureStatus, Score, Section};
pub use parse::parse_abc;
pub use structure::position::CursorLocation;
pub use syntax::{RawNode, SyntaxTree};
pub use text::cursor::{Selection, TextRange};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            log::warn!("logger was already initialized");
        }
    }

    log::info!("ABC sketch engine initialized");
}
