//! Path resolution and file loading for secret indirections.
//!
//! `FileLoader::load` is a pure function of (path string, options, snapshot):
//! it expands home-directory and environment-variable references, resolves
//! the result against the base directory, optionally enforces containment,
//! checks existence and size, then reads and decodes the file. Caching is the
//! caller's responsibility.

use crate::fs::{FileSystem, RealFileSystem};
use crate::options::LoadOptions;
use senv_core::{EnvironmentVariables, Error, Result};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Loads a single secret file under the safety constraints in `LoadOptions`.
pub struct FileLoader {
    fs: Arc<dyn FileSystem>,
}

impl FileLoader {
    /// Loader over the real filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(RealFileSystem))
    }

    /// Loader over a custom filesystem capability
    #[must_use]
    pub fn with_file_system(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the file referenced by `raw` and return its decoded text.
    ///
    /// `env` is the snapshot used for `%NAME%` and `$VAR` expansion; the
    /// process environment is consulted as a fallback.
    pub fn load(&self, raw: &str, options: &LoadOptions, env: &EnvironmentVariables) -> Result<String> {
        let expanded = expand(raw, env);
        let base = absolutize(&options.base_dir);

        let candidate = Path::new(expanded.as_str());
        let resolved = if candidate.is_absolute() {
            lexically_normalized(candidate)
        } else {
            lexically_normalized(&base.join(candidate))
        };
        trace!(raw, resolved = %resolved.display(), "resolved secret file path");

        if options.enforce_base_path {
            ensure_within_base(&resolved, &base)?;
        }

        if !self.fs.is_file(&resolved) {
            return Err(Error::file_not_found(resolved));
        }

        if let Some(limit) = options.max_file_bytes {
            let size = self.fs.file_size(&resolved)?;
            if size > limit {
                return Err(Error::file_too_large(resolved, size, limit));
            }
        }

        self.fs.read_to_string(&resolved, options.encoding)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand `~`, `%NAME%`, and `$VAR`/`${VAR}` references in a raw path string.
fn expand(raw: &str, env: &EnvironmentVariables) -> String {
    let expanded = expand_percent(raw, env);
    shellexpand::full_with_context_no_errors(
        &expanded,
        || dirs::home_dir().map(|home| home.to_string_lossy().into_owned()),
        |name| lookup(name, env),
    )
    .into_owned()
}

fn lookup(name: &str, env: &EnvironmentVariables) -> Option<String> {
    env.get_ignore_case(name)
        .cloned()
        .or_else(|| std::env::var(name).ok())
}

/// Substitute `%NAME%` references. Unmatched or unknown references are left
/// verbatim, matching Windows expansion semantics.
fn expand_percent(input: &str, env: &EnvironmentVariables) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name, env) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Make a path absolute against the working directory and resolve `.`/`..`
/// segments lexically.
fn absolutize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    lexically_normalized(&absolute)
}

/// Resolve `.` and `..` components without touching the filesystem, so the
/// containment check cannot be bypassed with `..` segments.
fn lexically_normalized(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn ensure_within_base(resolved: &Path, base: &Path) -> Result<()> {
    let mut canonical = base
        .to_string_lossy()
        .trim_end_matches(&['/', '\\'][..])
        .to_string();
    canonical.push(std::path::MAIN_SEPARATOR);

    let candidate = resolved.to_string_lossy();
    // Case-insensitive comparison only where the filesystem is
    let contained = if cfg!(windows) {
        candidate.to_lowercase().starts_with(&canonical.to_lowercase())
    } else {
        candidate.starts_with(&canonical)
    };

    if contained {
        Ok(())
    } else {
        Err(Error::path_escapes_base(resolved, base))
    }
}
