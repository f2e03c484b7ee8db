//! Header fields (`K:`, `L:`, `M:`, `Q:`, ...)
//!
//! A section's metadata is an ordered map from single-letter keys to raw
//! values. Repeating a key overrides its value in place, so serialized
//! headers keep the order they were first written in.

use serde::{Deserialize, Serialize};

use crate::theory::{is_valid_key, is_valid_meter, is_valid_tempo, is_valid_unit_length};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: char,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<MetadataEntry>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or override a value
    pub fn insert(&mut self, key: char, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(MetadataEntry { key, value }),
        }
    }

    pub fn get(&self, key: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: char) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay another section's values onto this running accumulation
    pub fn merge_from(&mut self, other: &Metadata) {
        for entry in &other.entries {
            self.insert(entry.key, entry.value.clone());
        }
    }

    /// Whether the section carries lyrics (`W:` / `w:`)
    pub fn has_lyrics(&self) -> bool {
        self.contains_key('W') || self.contains_key('w')
    }
}

impl FromIterator<(char, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (char, String)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// Split a header line into key and trimmed value
///
/// `"K: G"` → `('K', "G")`. Returns `None` unless the part before the first
/// colon is a single ASCII letter.
pub fn split_metadata(raw: &str) -> Option<(char, String)> {
    let (key, value) = raw.split_once(':')?;
    let mut chars = key.trim().chars();
    let key = chars.next().filter(|c| c.is_ascii_alphabetic())?;
    if chars.next().is_some() {
        return None;
    }
    Some((key, value.trim().to_string()))
}

/// Check a value against the validator for its key
///
/// Keys without a validator (T, X, C, ...) accept anything.
pub fn is_valid_value(key: char, value: &str) -> bool {
    match key {
        'K' => is_valid_key(value),
        'L' => is_valid_unit_length(value),
        'M' => is_valid_meter(value),
        'Q' => is_valid_tempo(value),
        _ => true,
    }
}

/// Replace an invalid value with the default for its key
///
/// Returns the value to store and whether a substitution happened.
pub fn normalize_value(key: char, value: &str, defaults: &Metadata) -> (String, bool) {
    if is_valid_value(key, value) {
        return (value.to_string(), false);
    }
    let fallback = defaults.get(key).unwrap_or_default().to_string();
    (fallback, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Metadata {
        [('K', "C"), ('L', "1/4"), ('M', "4/4"), ('Q', "120")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }

    #[test]
    fn test_insert_overrides_in_place() {
        let mut md = Metadata::new();
        md.insert('X', "1");
        md.insert('K', "C");
        md.insert('X', "2");
        let keys: Vec<char> = md.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!['X', 'K']);
        assert_eq!(md.get('X'), Some("2"));
    }

    #[test]
    fn test_merge_from() {
        let mut running = defaults();
        let mut section = Metadata::new();
        section.insert('K', "G");
        section.insert('T', "Reel");
        running.merge_from(&section);
        assert_eq!(running.get('K'), Some("G"));
        assert_eq!(running.get('T'), Some("Reel"));
        assert_eq!(running.get('M'), Some("4/4"));
    }

    #[test]
    fn test_split_metadata() {
        assert_eq!(split_metadata("K: G"), Some(('K', "G".to_string())));
        assert_eq!(split_metadata("Q:1/4=120"), Some(('Q', "1/4=120".to_string())));
        // Inner colons stay in the value instead of being dropped
        assert_eq!(split_metadata("T:Time: 3"), Some(('T', "Time: 3".to_string())));
        assert_eq!(split_metadata("no colon"), None);
        assert_eq!(split_metadata("KK:G"), None);
    }

    #[test]
    fn test_normalize_value() {
        let defaults = defaults();
        assert_eq!(normalize_value('K', "G", &defaults), ("G".to_string(), false));
        assert_eq!(normalize_value('K', "H", &defaults), ("C".to_string(), true));
        assert_eq!(normalize_value('L', "1/6", &defaults), ("1/4".to_string(), true));
        assert_eq!(normalize_value('M', "C", &defaults), ("4/4".to_string(), true));
        assert_eq!(normalize_value('Q', "fast", &defaults), ("120".to_string(), true));
        assert_eq!(normalize_value('T', "", &defaults), (String::new(), false));
    }

    #[test]
    fn test_lyrics_detection() {
        let mut md = Metadata::new();
        assert!(!md.has_lyrics());
        md.insert('w', "la la");
        assert!(md.has_lyrics());
    }
}
