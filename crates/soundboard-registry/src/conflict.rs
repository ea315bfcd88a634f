//! Conflict detection for key bindings

use std::collections::BTreeMap;

use soundboard_storage::NameMap;

/// A key claimed by more than one tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub key: String,
    pub names: Vec<String>,
}

/// Detects keys shared between tiles
///
/// Keys are compared as exact strings: `Control-a` and `control-A` are
/// different keys even if the platform treats them alike.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Detect all conflicts in a name to key mapping, ordered by key
    pub fn detect(bindings: &NameMap) -> Vec<Conflict> {
        let mut key_to_names: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        // Build reverse index
        for (name, key) in bindings.iter() {
            key_to_names.entry(key).or_default().push(name.to_string());
        }

        key_to_names
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(key, names)| Conflict {
                key: key.to_string(),
                names,
            })
            .collect()
    }

    /// Whether a mapping has any shared key
    pub fn has_conflicts(bindings: &NameMap) -> bool {
        !Self::detect(bindings).is_empty()
    }
}
