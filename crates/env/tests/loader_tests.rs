//! File loader tests against the real filesystem.

use senv_core::{EnvironmentVariables, Error};
use senv_env::{FileLoader, LoadOptions, TextEncoding};
use std::fs;
use tempfile::TempDir;

fn snapshot(entries: &[(&str, &str)]) -> EnvironmentVariables {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn options_for(dir: &TempDir) -> LoadOptions {
    LoadOptions {
        base_dir: dir.path().to_path_buf(),
        ..LoadOptions::default()
    }
}

#[test]
fn loads_relative_to_base_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("token.txt"), "secret\n").unwrap();

    let loader = FileLoader::new();
    let text = loader
        .load("token.txt", &options_for(&dir), &snapshot(&[]))
        .unwrap();

    // Trimming is the caller's responsibility
    assert_eq!(text, "secret\n");
}

#[test]
fn absolute_path_ignores_base_dir() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("token.txt");
    fs::write(&file, "secret").unwrap();

    let other_base = TempDir::new().unwrap();
    let loader = FileLoader::new();
    let text = loader
        .load(
            file.to_str().unwrap(),
            &options_for(&other_base),
            &snapshot(&[]),
        )
        .unwrap();

    assert_eq!(text, "secret");
}

#[test]
fn directory_is_treated_as_not_found() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("subdir")).unwrap();

    let loader = FileLoader::new();
    let err = loader
        .load("subdir", &options_for(&dir), &snapshot(&[]))
        .unwrap_err();

    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();

    let loader = FileLoader::new();
    let err = loader
        .load("nope.txt", &options_for(&dir), &snapshot(&[]))
        .unwrap_err();

    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn percent_template_expands_from_snapshot() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("token.txt"), "secret").unwrap();

    let env = snapshot(&[("SECRETS_DIR", dir.path().to_str().unwrap())]);
    let loader = FileLoader::new();
    let text = loader
        .load("%SECRETS_DIR%/token.txt", &options_for(&dir), &env)
        .unwrap();

    assert_eq!(text, "secret");
}

#[test]
fn dollar_template_expands_from_snapshot() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("token.txt"), "secret").unwrap();

    let env = snapshot(&[("SECRETS_DIR", dir.path().to_str().unwrap())]);
    let loader = FileLoader::new();
    let text = loader
        .load("${SECRETS_DIR}/token.txt", &options_for(&dir), &env)
        .unwrap();

    assert_eq!(text, "secret");
}

#[test]
fn enforce_base_path_rejects_parent_escape() {
    let dir = TempDir::new().unwrap();
    let inner = dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    fs::write(dir.path().join("outside.txt"), "oops").unwrap();

    let options = LoadOptions {
        base_dir: inner,
        enforce_base_path: true,
        ..LoadOptions::default()
    };
    let loader = FileLoader::new();
    let err = loader
        .load("../outside.txt", &options, &snapshot(&[]))
        .unwrap_err();

    assert!(matches!(err, Error::PathEscapesBase { .. }));
}

#[test]
fn size_limit_applies_before_reading() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("big.txt"), vec![b'x'; 64]).unwrap();

    let options = LoadOptions {
        max_file_bytes: Some(16),
        ..options_for(&dir)
    };
    let loader = FileLoader::new();
    let err = loader.load("big.txt", &options, &snapshot(&[])).unwrap_err();

    assert!(matches!(err, Error::FileTooLarge { size: 64, limit: 16, .. }));
}

#[test]
fn no_size_limit_reads_any_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("big.txt"), vec![b'x'; 64]).unwrap();

    let options = LoadOptions {
        max_file_bytes: None,
        ..options_for(&dir)
    };
    let loader = FileLoader::new();
    let text = loader.load("big.txt", &options, &snapshot(&[])).unwrap();

    assert_eq!(text.len(), 64);
}

#[test]
fn utf16le_file_decodes_with_configured_encoding() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "hello".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(dir.path().join("wide.txt"), bytes).unwrap();

    let options = LoadOptions {
        encoding: TextEncoding::Utf16Le,
        ..options_for(&dir)
    };
    let loader = FileLoader::new();
    let text = loader.load("wide.txt", &options, &snapshot(&[])).unwrap();

    assert_eq!(text, "hello");
}

#[test]
fn utf8_bom_is_stripped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bom.txt"), b"\xEF\xBB\xBFsecret").unwrap();

    let loader = FileLoader::new();
    let text = loader
        .load("bom.txt", &options_for(&dir), &snapshot(&[]))
        .unwrap();

    assert_eq!(text, "secret");
}
