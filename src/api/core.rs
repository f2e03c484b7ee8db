//! JavaScript-facing structuring API
//!
//! The editor calls `structureDocument` (or `structureText`) after every
//! change and then queries the stored result: canonical text for the
//! renderer, diagnostics for the lint layer, the playback schedule for the
//! synthesizer, and cursor lookups for the status line.

use lazy_static::lazy_static;
use serde::Serialize;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, engine_error, serialize};
use crate::config::EngineConfig;
use crate::engine::{locate, structure_raw, structure_text, ScoreStore};
use crate::renderers::playback::{describe_location, loop_region, schedule, LoopRegion};
use crate::structure::position::CursorLocation;
use crate::syntax::RawNode;
use crate::text::cursor::Selection;
use crate::{wasm_info, wasm_log, wasm_warn};

// WASM-owned structuring result and configuration
lazy_static! {
    static ref STORE: ScoreStore = ScoreStore::new();
    static ref CONFIG: Mutex<EngineConfig> = Mutex::new(EngineConfig::default());
}

fn current_config() -> EngineConfig {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Answer to a cursor lookup
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub location: CursorLocation,
    /// Status line text, empty when nothing is under the cursor
    pub status: String,
    pub loop_region: Option<LoopRegion>,
}

/// Summary returned after structuring
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct StructureSummary<'a> {
    abc: &'a str,
    diagnostics: &'a crate::diagnostics::Diagnostics,
    measure_count: usize,
    duration: f64,
}

fn summarize(result: &crate::engine::Structured) -> Result<JsValue, JsValue> {
    let summary = StructureSummary {
        abc: &result.abc,
        diagnostics: &result.diagnostics,
        measure_count: result.score.measures().count(),
        duration: result.duration,
    };
    serialize(&summary, "Failed to serialize structure summary")
}

/// Structure the document from the editor's syntax tree
///
/// # Parameters
/// - `tree_js`: nested `{ name, from, to, children }` nodes
/// - `text`: the document the tree was parsed from
#[wasm_bindgen(js_name = structureDocument)]
pub fn structure_document(tree_js: JsValue, text: &str) -> Result<JsValue, JsValue> {
    let started = js_sys::Date::now();
    let raw: RawNode = deserialize(tree_js, "Invalid syntax tree")?;

    let result = structure_raw(&raw, text, &current_config()).map_err(engine_error)?;
    let result = STORE.replace(result);

    wasm_info!(
        "structureDocument: {} measures, {} diagnostics in {:.1}ms",
        result.score.measures().count(),
        result.diagnostics.len(),
        js_sys::Date::now() - started
    );
    summarize(&result)
}

/// Structure plain text using the bundled parser
#[wasm_bindgen(js_name = structureText)]
pub fn structure_text_js(text: &str) -> Result<JsValue, JsValue> {
    let result = STORE.replace(structure_text(text, &current_config()));
    wasm_log!("structureText: {} bytes", text.len());
    summarize(&result)
}

/// Measure and event under the selection
///
/// # Parameters
/// - `selection_js`: `{ ranges: [{ from, to }, ...] }`; only the first range is used
#[wasm_bindgen(js_name = locateSelection)]
pub fn locate_selection(selection_js: JsValue) -> Result<JsValue, JsValue> {
    let selection: Selection = deserialize(selection_js, "Invalid selection")?;
    let result = STORE.current();
    let location = locate(&result.score, &selection);

    let report = LocationReport {
        status: describe_location(&result.score, &location),
        loop_region: loop_region(&result.score, &location),
        location,
    };
    serialize(&report, "Failed to serialize location")
}

/// Canonical text of the latest result
#[wasm_bindgen(js_name = getAbcOutput)]
pub fn get_abc_output() -> String {
    STORE.current().abc.clone()
}

/// Diagnostics of the latest result, in lint format
#[wasm_bindgen(js_name = getDiagnostics)]
pub fn get_diagnostics() -> Result<JsValue, JsValue> {
    let result = STORE.current();
    serialize(&result.diagnostics.marks, "Failed to serialize diagnostics")
}

/// Playback schedule of the latest result
#[wasm_bindgen(js_name = getPlayback)]
pub fn get_playback() -> Result<JsValue, JsValue> {
    let result = STORE.current();
    serialize(&schedule(&result.score), "Failed to serialize playback")
}

/// Replace the engine configuration; takes effect on the next structuring call
#[wasm_bindgen(js_name = setEngineConfig)]
pub fn set_engine_config(config_js: JsValue) -> Result<(), JsValue> {
    let config: EngineConfig = deserialize(config_js, "Invalid engine configuration")?;
    if let Err(e) = config.validate() {
        wasm_warn!("setEngineConfig rejected: {}", e);
        return Err(engine_error(e));
    }
    *CONFIG.lock().unwrap_or_else(|e| e.into_inner()) = config;
    Ok(())
}
