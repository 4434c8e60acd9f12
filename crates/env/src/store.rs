//! Scoped access to the process environment store.
//!
//! The resolution engine itself only ever consumes an immutable snapshot;
//! mutation (the rename transformer, callers re-exporting variables) goes
//! through `EnvStore` so every write takes the global environment lock.

use once_cell::sync::Lazy;
use senv_core::{EnvironmentVariables, Error, Result};
use std::env;
use std::sync::RwLock;

/// Global RwLock for thread-safe environment variable access.
/// Reads are much more common than writes.
static ENV_LOCK: Lazy<RwLock<()>> = Lazy::new(|| RwLock::new(()));

/// Scope at which environment variables are read and written.
///
/// Only the process scope exists on this platform; wider scopes (user,
/// machine) have no equivalent here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvScope {
    /// The current process environment
    #[default]
    Process,
}

/// Store capability over a mutable environment at a given scope.
pub trait EnvStore {
    /// Capture an immutable snapshot of the store
    fn snapshot(&self) -> Result<EnvironmentVariables>;

    /// Assign `value` to `key` at the store's scope
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` at the store's scope
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-scoped store guarded by the global environment lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStore;

impl ProcessStore {
    /// Store for the given scope.
    #[must_use]
    pub fn new(scope: EnvScope) -> Self {
        let EnvScope::Process = scope;
        Self
    }
}

impl EnvStore for ProcessStore {
    fn snapshot(&self) -> Result<EnvironmentVariables> {
        let _guard = ENV_LOCK
            .read()
            .map_err(|_| Error::configuration("environment lock poisoned"))?;
        Ok(env::vars().collect())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = ENV_LOCK
            .write()
            .map_err(|_| Error::configuration("environment lock poisoned"))?;
        env::set_var(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = ENV_LOCK
            .write()
            .map_err(|_| Error::configuration("environment lock poisoned"))?;
        env::remove_var(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_store_round_trip() {
        let store = ProcessStore::new(EnvScope::Process);

        store.set("SENV_STORE_TEST_VAR_UNIQUE", "value-1").unwrap();
        let snapshot = store.snapshot().unwrap();
        assert_eq!(
            snapshot.get("SENV_STORE_TEST_VAR_UNIQUE"),
            Some(&"value-1".to_string())
        );

        store.remove("SENV_STORE_TEST_VAR_UNIQUE").unwrap();
        let snapshot = store.snapshot().unwrap();
        assert!(snapshot.get("SENV_STORE_TEST_VAR_UNIQUE").is_none());
    }
}
