//! Secrets resolution engine.
//!
//! One synchronous pass over an environment snapshot: scan and classify every
//! entry, resolve suffix-tagged and allow-listed entries through the file
//! loader with a pass-scoped cache, then merge plain and file-backed values
//! per the precedence policy. The pass never aborts: every file-level failure
//! is reported per key and resolution continues.

use crate::fs::{FileSystem, RealFileSystem};
use crate::keys;
use crate::loader::FileLoader;
use crate::options::{LoadOptions, SecretsOptions};
use senv_core::{EnvironmentVariables, Error, KeyMap, KeySet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single per-key resolution failure.
#[derive(Debug, Clone)]
pub struct ResolveFailure {
    /// Normalized key the failure applies to
    pub key: String,
    /// The literal, unexpanded path string that failed to resolve
    pub path: String,
    /// The underlying file-level error
    pub error: Arc<Error>,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to resolve '{}' from '{}': {}",
            self.key, self.path, self.error
        )
    }
}

/// Result of one resolution pass.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Final normalized key → value snapshot
    pub values: KeyMap<String>,
    /// Every per-key failure encountered during the pass
    pub failures: Vec<ResolveFailure>,
}

/// Resolves file-backed secrets out of an environment snapshot.
///
/// The resolver holds no per-pass state; concurrent passes on one instance
/// each get their own cache and accumulators.
pub struct SecretsResolver {
    loader: FileLoader,
}

impl SecretsResolver {
    /// Resolver over the real filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(RealFileSystem))
    }

    /// Resolver over a custom filesystem capability
    #[must_use]
    pub fn with_file_system(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            loader: FileLoader::with_file_system(fs),
        }
    }

    /// Run one resolution pass, logging each failure.
    pub fn load(&self, env: &EnvironmentVariables, options: &SecretsOptions) -> Resolution {
        self.load_with_reporter(env, options, |failure| {
            warn!(
                key = %failure.key,
                path = %failure.path,
                error = %failure.error,
                "secret resolution failed"
            );
        })
    }

    /// Run one resolution pass, streaming each failure to `reporter` as it
    /// occurs. Failures are also collected into the returned `Resolution`.
    pub fn load_with_reporter(
        &self,
        env: &EnvironmentVariables,
        options: &SecretsOptions,
        mut reporter: impl FnMut(&ResolveFailure),
    ) -> Resolution {
        debug!(entries = env.len(), "starting secrets resolution pass");

        let mut pass = Pass {
            loader: &self.loader,
            env,
            options,
            load_options: options.load_options(),
            cache: HashMap::new(),
            plain: KeyMap::new(),
            file_backed: KeyMap::new(),
            force_file_win: KeySet::new(),
            suppressed: KeySet::new(),
            failures: Vec::new(),
            reporter: &mut reporter,
        };
        pass.scan();
        pass.resolve_allow_list();
        let (values, failures) = pass.merge();

        debug!(
            values = values.len(),
            failures = failures.len(),
            "secrets resolution pass complete"
        );
        Resolution { values, failures }
    }
}

impl Default for SecretsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// State for a single resolution pass; discarded once the snapshot is built.
struct Pass<'a, 'r> {
    loader: &'a FileLoader,
    env: &'a EnvironmentVariables,
    options: &'a SecretsOptions,
    load_options: LoadOptions,
    /// Path-string → content cache, keyed by the raw, unexpanded value so
    /// each distinct reference hits the disk at most once per pass.
    cache: HashMap<String, std::result::Result<String, Arc<Error>>>,
    plain: KeyMap<String>,
    file_backed: KeyMap<String>,
    force_file_win: KeySet,
    suppressed: KeySet,
    failures: Vec<ResolveFailure>,
    reporter: &'r mut dyn FnMut(&ResolveFailure),
}

impl Pass<'_, '_> {
    /// Scan the snapshot once, splitting entries into the plain map and
    /// (through the loader) the file-backed map.
    fn scan(&mut self) {
        let env = self.env;
        let options = self.options;
        for (raw_key, raw_value) in env.iter() {
            let survived = match &options.prefix {
                Some(prefix) => match keys::strip_prefix_ci(raw_key, prefix) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => raw_key.as_str(),
            };

            if !options.suffix.is_empty() {
                if let Some(stem) = keys::strip_suffix_ci(survived, &options.suffix) {
                    // Suffixed keys never reach the plain map or the output
                    self.resolve_suffixed(stem, raw_value);
                    continue;
                }
            }

            self.plain.insert(keys::normalize(survived), raw_value.clone());
        }
    }

    fn resolve_suffixed(&mut self, stem: &str, raw_value: &str) {
        let base_key = keys::normalize(stem);
        if raw_value.trim().is_empty() {
            // A blank path contributes nothing; not a failure
            return;
        }
        match self.read_cached(raw_value) {
            Ok(text) => {
                let trimmed = self.options.trim.apply(&text).to_string();
                self.file_backed.insert(base_key, trimmed);
            }
            Err(error) => self.report(base_key, raw_value, error),
        }
    }

    /// Treat the plain value of every allow-listed key as a path. Success is
    /// authoritative: it overwrites any suffix-derived value and forces file
    /// precedence. Failure suppresses the key so the raw path string never
    /// leaks into the output as a value.
    fn resolve_allow_list(&mut self) {
        let candidates: Vec<(String, String)> = self
            .options
            .allow_list
            .iter()
            .filter_map(|key| {
                self.plain
                    .get(key)
                    .map(|path| (key.to_string(), path.clone()))
            })
            .collect();

        for (key, path) in candidates {
            if path.trim().is_empty() {
                continue;
            }
            match self.read_cached(&path) {
                Ok(text) => {
                    let trimmed = self.options.trim.apply(&text).to_string();
                    self.file_backed.insert(key.clone(), trimmed);
                    self.force_file_win.insert(key);
                }
                Err(error) => {
                    self.force_file_win.insert(key.clone());
                    self.suppressed.insert(key.clone());
                    self.report(key, &path, error);
                }
            }
        }
    }

    fn read_cached(&mut self, raw_path: &str) -> std::result::Result<String, Arc<Error>> {
        if let Some(cached) = self.cache.get(raw_path) {
            return cached.clone();
        }
        let outcome = self
            .loader
            .load(raw_path, &self.load_options, self.env)
            .map_err(Arc::new);
        self.cache.insert(raw_path.to_string(), outcome.clone());
        outcome
    }

    fn report(&mut self, key: impl Into<String>, path: &str, error: Arc<Error>) {
        let failure = ResolveFailure {
            key: key.into(),
            path: path.to_string(),
            error,
        };
        (self.reporter)(&failure);
        self.failures.push(failure);
    }

    /// Merge the plain and file-backed maps into the output snapshot.
    fn merge(self) -> (KeyMap<String>, Vec<ResolveFailure>) {
        let Pass {
            options,
            plain,
            file_backed,
            force_file_win,
            suppressed,
            failures,
            ..
        } = self;

        let decide = |key: &str| -> Option<String> {
            let prefer_file = options.prefer_file_content
                || force_file_win.contains(key)
                || options.override_keys.contains(key);
            let plain_value = plain.get(key);
            let file_value = file_backed.get(key);
            if prefer_file {
                match file_value {
                    Some(value) => Some(value.clone()),
                    // A suppressed key contributes nothing rather than
                    // falling back to the unresolved path string
                    None if suppressed.contains(key) => None,
                    None => plain_value.cloned(),
                }
            } else {
                // Plain wins ties, including a present-but-empty plain value;
                // only an absent plain entry falls back to file content
                plain_value.or(file_value).cloned()
            }
        };

        let mut values = KeyMap::new();
        for (key, _) in plain.iter() {
            if let Some(value) = decide(key) {
                values.insert(key, value);
            }
        }
        for (key, _) in file_backed.iter() {
            if !plain.contains_key(key) {
                if let Some(value) = decide(key) {
                    values.insert(key, value);
                }
            }
        }
        (values, failures)
    }
}
