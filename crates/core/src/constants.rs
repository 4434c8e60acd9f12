//! Shared constants for the senv crates.

/// Default suffix marking an environment key as a file indirection.
pub const DEFAULT_FILE_SUFFIX: &str = "_FILE";

/// Separator sequence in raw environment keys that is rewritten to the
/// hierarchical separator during normalization.
pub const ENV_SECTION_SEPARATOR: &str = "__";

/// Hierarchical separator used in normalized configuration keys.
pub const KEY_SEPARATOR: &str = ":";

/// Word separator inside a single key section (shouting-snake-case).
pub const WORD_SEPARATOR: char = '_';

/// Default maximum secret file size in bytes (128 KiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 128 * 1024;
