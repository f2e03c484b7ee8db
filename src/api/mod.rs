//! ABC sketch WASM API
//!
//! # Module Structure
//!
//! - `helpers`: Console logging and `JsValue` conversions
//! - `core`: Structuring, lookups and configuration exported to JavaScript

pub mod helpers;
pub mod core;

pub use self::core::*;
