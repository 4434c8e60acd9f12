//! Immutable per-pass options for secret resolution.

use senv_core::constants::{DEFAULT_FILE_SUFFIX, DEFAULT_MAX_FILE_BYTES};
use senv_core::{Error, KeySet, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How trailing characters are removed from resolved file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimMode {
    /// Keep the content exactly as read
    None,
    /// Remove all trailing whitespace
    #[default]
    TrailingWhitespace,
    /// Remove trailing newline and carriage-return characters only
    TrailingNewlines,
}

impl TrimMode {
    /// Apply the trim policy to resolved file content.
    #[must_use]
    pub fn apply(self, text: &str) -> &str {
        match self {
            TrimMode::None => text,
            TrimMode::TrailingWhitespace => text.trim_end(),
            TrimMode::TrailingNewlines => text.trim_end_matches(&['\r', '\n'][..]),
        }
    }
}

impl FromStr for TrimMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(TrimMode::None),
            "trailing-whitespace" => Ok(TrimMode::TrailingWhitespace),
            "trailing-newlines" => Ok(TrimMode::TrailingNewlines),
            other => Err(format!(
                "unknown trim mode '{other}' (expected none, trailing-whitespace, or trailing-newlines)"
            )),
        }
    }
}

/// Text encoding used when decoding secret files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// UTF-8; a leading byte-order mark is tolerated and stripped
    #[default]
    Utf8,
    /// UTF-16 little-endian
    Utf16Le,
    /// UTF-16 big-endian
    Utf16Be,
}

impl TextEncoding {
    /// Canonical name used in error messages and CLI flags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        }
    }

    /// Decode raw file bytes, stripping a leading byte-order mark.
    pub fn decode(self, path: &Path, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                std::str::from_utf8(bytes)
                    .map(str::to_owned)
                    .map_err(|_| Error::encoding(path, self.name()))
            }
            TextEncoding::Utf16Le => {
                let bytes = bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes);
                decode_utf16(path, bytes, u16::from_le_bytes, self.name())
            }
            TextEncoding::Utf16Be => {
                let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
                decode_utf16(path, bytes, u16::from_be_bytes, self.name())
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16le" | "utf16le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(TextEncoding::Utf16Be),
            other => Err(format!(
                "unknown encoding '{other}' (expected utf-8, utf-16le, or utf-16be)"
            )),
        }
    }
}

fn decode_utf16(
    path: &Path,
    bytes: &[u8],
    from_bytes: fn([u8; 2]) -> u16,
    encoding: &str,
) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::encoding(path, encoding));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| Error::encoding(path, encoding))
}

/// Options for a single file load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Base directory for relative paths
    pub base_dir: PathBuf,
    /// Require the resolved path to stay within the base directory
    pub enforce_base_path: bool,
    /// Maximum file size in bytes; `None` disables the check
    pub max_file_bytes: Option<u64>,
    /// Text encoding of the file
    pub encoding: TextEncoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            enforce_base_path: false,
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
            encoding: TextEncoding::default(),
        }
    }
}

/// Options for one secrets resolution pass. Immutable once built.
#[derive(Debug, Clone)]
pub struct SecretsOptions {
    /// Suffix marking keys as file indirections; empty disables suffix handling
    pub suffix: String,
    /// Only consider raw keys starting with this prefix, stripping it
    pub prefix: Option<String>,
    /// Normalized keys always treated as file-backed
    pub allow_list: KeySet,
    /// Normalized keys where file content always wins the merge
    pub override_keys: KeySet,
    /// Prefer file content over plain values globally
    pub prefer_file_content: bool,
    /// Trim policy applied to resolved file content
    pub trim: TrimMode,
    /// Text encoding of secret files
    pub encoding: TextEncoding,
    /// Base directory for relative paths
    pub base_dir: PathBuf,
    /// Require resolved paths to stay within the base directory
    pub enforce_base_path: bool,
    /// Maximum secret file size in bytes; `None` disables the check
    pub max_file_bytes: Option<u64>,
}

impl SecretsOptions {
    /// Options with the conventional defaults: `_FILE` suffix, no prefix,
    /// working directory as base, 128 KiB size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            suffix: DEFAULT_FILE_SUFFIX.to_string(),
            prefix: None,
            allow_list: KeySet::new(),
            override_keys: KeySet::new(),
            prefer_file_content: false,
            trim: TrimMode::default(),
            encoding: TextEncoding::default(),
            base_dir: default_base_dir(),
            enforce_base_path: false,
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
        }
    }

    /// Set the file-indirection suffix; an empty string disables it.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Only consider keys carrying this prefix, stripping it during
    /// normalization.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Replace the allow-list of keys treated as file-backed unconditionally.
    #[must_use]
    pub fn with_allow_list(mut self, keys: KeySet) -> Self {
        self.allow_list = keys;
        self
    }

    /// Add a single key to the allow-list.
    #[must_use]
    pub fn allow_key(mut self, key: impl Into<String>) -> Self {
        self.allow_list.insert(key);
        self
    }

    /// Replace the set of keys where file content always wins.
    #[must_use]
    pub fn with_override_keys(mut self, keys: KeySet) -> Self {
        self.override_keys = keys;
        self
    }

    /// Add a single key to the override set.
    #[must_use]
    pub fn override_key(mut self, key: impl Into<String>) -> Self {
        self.override_keys.insert(key);
        self
    }

    /// Globally prefer file content over plain values during the merge.
    #[must_use]
    pub fn prefer_file_content(mut self, prefer: bool) -> Self {
        self.prefer_file_content = prefer;
        self
    }

    /// Set the trim policy for resolved file content.
    #[must_use]
    pub fn with_trim(mut self, trim: TrimMode) -> Self {
        self.trim = trim;
        self
    }

    /// Set the text encoding of secret files.
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the base directory for relative path resolution.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Require resolved paths to stay within the base directory.
    #[must_use]
    pub fn enforce_base_path(mut self, enforce: bool) -> Self {
        self.enforce_base_path = enforce;
        self
    }

    /// Set the maximum secret file size; `None` disables the check.
    #[must_use]
    pub fn with_max_file_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_file_bytes = limit;
        self
    }

    /// The loader-level options for this pass.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            base_dir: self.base_dir.clone(),
            enforce_base_path: self.enforce_base_path,
            max_file_bytes: self.max_file_bytes,
            encoding: self.encoding,
        }
    }
}

impl Default for SecretsOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
