//! Domain types shared across the senv crates.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::hash_map::Entry as HashEntry;
use std::collections::HashMap;

/// Snapshot of environment variables captured once per resolution pass.
///
/// The resolution engine never mutates the snapshot; writes to the real
/// environment go through the store in `senv-env`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariables(HashMap<String, String>);

impl EnvironmentVariables {
    /// Create a new empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Create from an existing HashMap
    #[must_use]
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Insert a variable, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a variable by exact key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    /// Get a variable comparing keys case-insensitively
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&String> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Check if a variable exists
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Get the number of variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for EnvironmentVariables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EnvironmentVariables {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyed<V> {
    display: String,
    value: V,
}

/// Case-insensitive map from normalized configuration keys to values.
///
/// The first-seen spelling of a key is preserved for display; lookups,
/// overwrites, and removals compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap<V> {
    entries: HashMap<String, Keyed<V>>,
}

impl<V> KeyMap<V> {
    /// Create a new empty map
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a value, returning the previous one if any.
    ///
    /// An overwrite keeps the display form of the key already present.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let display = key.into();
        match self.entries.entry(display.to_lowercase()) {
            HashEntry::Occupied(mut occupied) => {
                Some(std::mem::replace(&mut occupied.get_mut().value, value))
            }
            HashEntry::Vacant(vacant) => {
                vacant.insert(Keyed { display, value });
                None
            }
        }
    }

    /// Get a value by key, case-insensitively
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&key.to_lowercase()).map(|e| &e.value)
    }

    /// Remove a value by key, case-insensitively
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(&key.to_lowercase()).map(|e| e.value)
    }

    /// Check if a key is present, case-insensitively
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Iterate over entries as (display key, value)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.values().map(|e| (e.display.as_str(), &e.value))
    }

    /// Iterate over display keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.display.as_str())
    }

    /// Get the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for KeyMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for KeyMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Sorted by display key so serialized output is deterministic
        let mut entries: Vec<(&str, &V)> = self.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Case-insensitive set of normalized configuration keys.
///
/// Like `KeyMap`, the first-seen spelling is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    entries: HashMap<String, String>,
}

impl KeySet {
    /// Create a new empty set
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a key; returns false if it was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let display = key.into();
        let folded = display.to_lowercase();
        match self.entries.entry(folded) {
            HashEntry::Occupied(_) => false,
            HashEntry::Vacant(vacant) => {
                vacant.insert(display);
                true
            }
        }
    }

    /// Check membership, case-insensitively
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Iterate over display keys
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Get the number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_map_lookup_is_case_insensitive() {
        let mut map = KeyMap::new();
        map.insert("App:Token", "abc".to_string());

        assert_eq!(map.get("APP:TOKEN"), Some(&"abc".to_string()));
        assert_eq!(map.get("app:token"), Some(&"abc".to_string()));
        assert!(map.contains_key("aPp:ToKeN"));
        assert!(map.get("App:Other").is_none());
    }

    #[test]
    fn key_map_overwrite_keeps_first_display_form() {
        let mut map = KeyMap::new();
        map.insert("App:Token", 1);
        let previous = map.insert("APP:TOKEN", 2);

        assert_eq!(previous, Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["App:Token"]);
        assert_eq!(map.get("app:token"), Some(&2));
    }

    #[test]
    fn key_set_membership_ignores_case() {
        let set: KeySet = ["App:ConnectionString"].into_iter().collect();
        assert!(set.contains("APP:CONNECTIONSTRING"));
        assert!(set.contains("app:connectionstring"));
        assert!(!set.contains("App:Other"));
    }

    #[test]
    fn environment_snapshot_case_insensitive_lookup() {
        let env: EnvironmentVariables =
            [("Path".to_string(), "/usr/bin".to_string())].into_iter().collect();
        assert_eq!(env.get_ignore_case("PATH"), Some(&"/usr/bin".to_string()));
        assert!(env.get("PATH").is_none());
    }
}
