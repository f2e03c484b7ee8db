//! Engine configuration
//!
//! Defaults mirror what a blank sketch starts with: `X:1`, `T:Sketch`, C major,
//! quarter-note unit length, 4/4 at 120 bpm, and a single whole-measure rest
//! when nothing has been written yet.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::metadata::{is_valid_value, Metadata};

/// Measure appended to the output when the score has no notes
pub const DEFAULT_MUSIC: &str = "| z4 |]";

/// Tolerance for "the measure is full"
pub const DEFAULT_FILL_TOLERANCE: f64 = 0.01;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MetadataDefaults {
    pub index: String,
    pub title: String,
    pub key: String,
    pub unit_length: String,
    pub meter: String,
    pub tempo: String,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            index: "1".to_string(),
            title: "Sketch".to_string(),
            key: "C".to_string(),
            unit_length: "1/4".to_string(),
            meter: "4/4".to_string(),
            tempo: "120".to_string(),
        }
    }
}

impl MetadataDefaults {
    /// Defaults as a metadata map, in header order
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert('X', self.index.clone());
        metadata.insert('T', self.title.clone());
        metadata.insert('K', self.key.clone());
        metadata.insert('L', self.unit_length.clone());
        metadata.insert('M', self.meter.clone());
        metadata.insert('Q', self.tempo.clone());
        metadata
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: MetadataDefaults,
    /// Allowed distance of a measure's duration from 1.0
    pub fill_tolerance: f64,
    /// Report header values that were replaced by a default
    pub warn_invalid_metadata: bool,
    /// Music emitted when the score has no notes
    pub default_music: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: MetadataDefaults::default(),
            fill_tolerance: DEFAULT_FILL_TOLERANCE,
            warn_invalid_metadata: false,
            default_music: DEFAULT_MUSIC.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tolerances outside (0, 1) and defaults that would fail their
    /// own validators
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fill_tolerance > 0.0 && self.fill_tolerance < 1.0) {
            return Err(ConfigError::Tolerance(self.fill_tolerance));
        }
        for entry in self.defaults.to_metadata().iter() {
            if !is_valid_value(entry.key, &entry.value) {
                return Err(ConfigError::InvalidDefault {
                    key: entry.key,
                    value: entry.value.clone(),
                });
            }
        }
        Ok(())
    }
}
