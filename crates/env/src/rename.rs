//! Key-rename transformer over an environment store.
//!
//! Applies a rename function to every key in a store snapshot. Entries whose
//! transform is a no-op are left untouched; for each changed key the new key
//! is assigned the original value, and the original is deleted only when
//! requested. Includes the section-aware Pascal-case strategy for converting
//! shouting-snake-case keys into hierarchical keys.

use crate::store::EnvStore;
use senv_core::constants::{ENV_SECTION_SEPARATOR, KEY_SEPARATOR, WORD_SEPARATOR};
use senv_core::Result;
use tracing::debug;

/// Apply `transform` to every key in the store's snapshot.
///
/// Returns the number of keys that were renamed.
pub fn rename_keys<F>(store: &dyn EnvStore, mut transform: F, remove_original: bool) -> Result<usize>
where
    F: FnMut(&str) -> String,
{
    let snapshot = store.snapshot()?;
    let mut renamed = 0;
    for (key, value) in snapshot.iter() {
        let new_key = transform(key);
        if new_key == *key {
            continue;
        }
        store.set(&new_key, value)?;
        if remove_original {
            store.remove(key)?;
        }
        renamed += 1;
    }
    debug!(renamed, remove_original, "applied key-rename transform");
    Ok(renamed)
}

/// Rename every key matching `predicate` (all keys when `None`) to its
/// hierarchical Pascal-case form.
pub fn pascal_case_keys(
    store: &dyn EnvStore,
    predicate: Option<&dyn Fn(&str) -> bool>,
    remove_original: bool,
) -> Result<usize> {
    rename_keys(
        store,
        |key| match predicate {
            Some(matches) if !matches(key) => key.to_string(),
            _ => pascal_case_key(key),
        },
        remove_original,
    )
}

/// Convert a shouting-snake-case key into a hierarchical Pascal-case key.
///
/// The key is split on `__` into sections, each section is split on `_` into
/// words, each word is title-cased, words are concatenated, and sections are
/// rejoined with `:`. `APP_NAME__SERVICE_URL` becomes `AppName:ServiceUrl`.
#[must_use]
pub fn pascal_case_key(key: &str) -> String {
    key.split(ENV_SECTION_SEPARATOR)
        .map(|section| {
            section
                .split(WORD_SEPARATOR)
                .map(title_case)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use senv_core::EnvironmentVariables;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Store fake over a plain map; no process environment involved.
    #[derive(Default)]
    struct MapStore {
        entries: RefCell<HashMap<String, String>>,
    }

    impl MapStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: RefCell::new(
                    entries
                        .iter()
                        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                        .collect(),
                ),
            }
        }

        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }
    }

    impl EnvStore for MapStore {
        fn snapshot(&self) -> Result<EnvironmentVariables> {
            Ok(self
                .entries
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }

    #[test]
    fn pascal_case_examples() {
        assert_eq!(pascal_case_key("APP_NAME__SERVICE_URL"), "AppName:ServiceUrl");
        assert_eq!(pascal_case_key("TOKEN"), "Token");
        assert_eq!(pascal_case_key("app__key"), "App:Key");
        assert_eq!(pascal_case_key("A__B__C"), "A:B:C");
    }

    #[test]
    fn rename_assigns_new_key_and_keeps_original_by_default() {
        let store = MapStore::with(&[("MY_APP__TOKEN", "abc")]);
        let renamed = pascal_case_keys(&store, None, false).unwrap();

        assert_eq!(renamed, 1);
        assert_eq!(store.get("MyApp:Token"), Some("abc".to_string()));
        assert_eq!(store.get("MY_APP__TOKEN"), Some("abc".to_string()));
    }

    #[test]
    fn rename_removes_original_when_requested() {
        let store = MapStore::with(&[("MY_APP__TOKEN", "abc")]);
        pascal_case_keys(&store, None, true).unwrap();

        assert_eq!(store.get("MyApp:Token"), Some("abc".to_string()));
        assert!(store.get("MY_APP__TOKEN").is_none());
    }

    #[test]
    fn noop_transform_leaves_entry_untouched() {
        let store = MapStore::with(&[("Token", "abc")]);
        let renamed = rename_keys(&store, |key| key.to_string(), true).unwrap();

        assert_eq!(renamed, 0);
        assert_eq!(store.get("Token"), Some("abc".to_string()));
    }

    #[test]
    fn predicate_gates_which_keys_are_rewritten() {
        let store = MapStore::with(&[("MY_APP__TOKEN", "abc"), ("PATH", "/usr/bin")]);
        let only_my_app = |key: &str| key.starts_with("MY_APP");
        let renamed = pascal_case_keys(&store, Some(&only_my_app), true).unwrap();

        assert_eq!(renamed, 1);
        assert_eq!(store.get("MyApp:Token"), Some("abc".to_string()));
        assert_eq!(store.get("PATH"), Some("/usr/bin".to_string()));
        assert!(store.get("Path").is_none());
    }
}
