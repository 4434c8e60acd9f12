//! Core domain types, errors, and constants for the `senv` crates.
//!
//! This crate establishes the foundational building blocks shared by the
//! resolution engine and the CLI. It performs no I/O of its own.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing the failure modes of secret file resolution.
//! - **`types`**: Contains domain-specific wrappers like
//!   `EnvironmentVariables` (an immutable snapshot of the environment) and
//!   the case-insensitive `KeyMap`/`KeySet` collections used for normalized
//!   configuration keys.
//! - **`constants`**: Shared defaults such as the file-indirection suffix and
//!   the key separators.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::{EnvironmentVariables, KeyMap, KeySet},
};
