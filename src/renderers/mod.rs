//! Renderers module for the ABC sketch engine
//!
//! Output derived from a structured score.
//!
//! ## Modules
//!
//! - `abc`: Canonical text for the notation renderer
//! - `playback`: Synthesizer schedule, loop points and status text

pub mod abc;
pub mod playback;

// Re-export commonly used types
pub use abc::serialize;
pub use playback::{describe_location, loop_region, schedule, LoopRegion, Playback, PlaybackEvent};
