//! File-backed environment-configuration resolution for senv.
//!
//! This crate scans a flat environment snapshot, detects entries that are
//! indirections to secret files (via a naming suffix or an explicit
//! allow-list), resolves those indirections to file contents under safety
//! constraints, and merges the result with plain values under a configurable
//! precedence policy.
//!
//! ## Key Components
//!
//! - **`loader`**: Path expansion, base-directory resolution, containment
//!   enforcement, size checks, and text decoding for a single file.
//! - **`resolver`**: The resolution engine: one synchronous pass over the
//!   snapshot that classifies entries, resolves file indirections through a
//!   pass-scoped cache, and merges per the precedence policy while reporting
//!   per-key failures without ever aborting.
//! - **`fs`**: The narrow filesystem capability the loader runs against, with
//!   a real implementation and an in-memory fake for tests.
//! - **`store`**: Lock-guarded access to the process environment.
//! - **`rename`**: The key-rename transformer applied to a store, including
//!   the section-aware Pascal-case strategy.

pub mod fs;
pub mod keys;
pub mod loader;
pub mod options;
pub mod rename;
pub mod resolver;
pub mod store;

pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use loader::FileLoader;
pub use options::{LoadOptions, SecretsOptions, TextEncoding, TrimMode};
pub use rename::{pascal_case_key, pascal_case_keys, rename_keys};
pub use resolver::{Resolution, ResolveFailure, SecretsResolver};
pub use store::{EnvScope, EnvStore, ProcessStore};
