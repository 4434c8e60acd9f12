//! Key normalization helpers.
//!
//! Raw environment keys use `__` between sections; normalized configuration
//! keys use `:`. All prefix and suffix matching is case-insensitive.

use senv_core::constants::{ENV_SECTION_SEPARATOR, KEY_SEPARATOR};

/// Rewrite section separators to the hierarchical separator.
#[must_use]
pub fn normalize(key: &str) -> String {
    key.replace(ENV_SECTION_SEPARATOR, KEY_SEPARATOR)
}

/// Strip `prefix` from the front of `raw` if it matches case-insensitively.
#[must_use]
pub fn strip_prefix_ci<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let head = raw.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&raw[prefix.len()..])
    } else {
        None
    }
}

/// Strip `suffix` from the end of `raw` if it matches case-insensitively.
#[must_use]
pub fn strip_suffix_ci<'a>(raw: &'a str, suffix: &str) -> Option<&'a str> {
    let split = raw.len().checked_sub(suffix.len())?;
    let tail = raw.get(split..)?;
    if tail.eq_ignore_ascii_case(suffix) {
        Some(&raw[..split])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rewrites_section_separators() {
        assert_eq!(normalize("APP__DB__HOST"), "APP:DB:HOST");
        assert_eq!(normalize("PLAIN"), "PLAIN");
    }

    #[test]
    fn prefix_stripping_ignores_case() {
        assert_eq!(strip_prefix_ci("MYAPP_TOKEN", "myapp_"), Some("TOKEN"));
        assert_eq!(strip_prefix_ci("OTHER_TOKEN", "MYAPP_"), None);
        assert_eq!(strip_prefix_ci("X", "MYAPP_"), None);
    }

    #[test]
    fn suffix_stripping_ignores_case() {
        assert_eq!(strip_suffix_ci("APP__TOKEN_FILE", "_file"), Some("APP__TOKEN"));
        assert_eq!(strip_suffix_ci("APP__TOKEN", "_FILE"), None);
        assert_eq!(strip_suffix_ci("A", "_FILE"), None);
    }
}
