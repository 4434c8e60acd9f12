use clap::Args;
use senv_core::constants::DEFAULT_FILE_SUFFIX;
use senv_env::{
    EnvScope, EnvStore, ProcessStore, SecretsOptions, SecretsResolver, TextEncoding, TrimMode,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ResolveArgs {
    /// Suffix marking keys as file indirections (empty disables)
    #[arg(long, default_value = DEFAULT_FILE_SUFFIX)]
    suffix: String,

    /// Only consider keys with this prefix, stripping it
    #[arg(long)]
    prefix: Option<String>,

    /// Normalized key always treated as file-backed (repeatable)
    #[arg(long = "allow")]
    allow: Vec<String>,

    /// Normalized key where file content always wins (repeatable)
    #[arg(long = "override-key")]
    override_keys: Vec<String>,

    /// Prefer file content over plain values globally
    #[arg(long)]
    prefer_file: bool,

    /// Trim policy for file content
    #[arg(long, default_value = "trailing-whitespace")]
    trim: TrimMode,

    /// Text encoding of secret files
    #[arg(long, default_value = "utf-8")]
    encoding: TextEncoding,

    /// Base directory for relative paths (defaults to the working directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Require resolved paths to stay within the base directory
    #[arg(long)]
    enforce_base_path: bool,

    /// Maximum secret file size in bytes (0 disables the limit)
    #[arg(long)]
    max_file_bytes: Option<u64>,

    /// Output format
    #[arg(long, default_value = "env", value_parser = ["env", "json"])]
    format: String,
}

pub fn execute(args: ResolveArgs) -> eyre::Result<()> {
    let store = ProcessStore::new(EnvScope::Process);
    let env = store.snapshot()?;

    let mut options = SecretsOptions::new()
        .with_suffix(args.suffix)
        .prefer_file_content(args.prefer_file)
        .with_trim(args.trim)
        .with_encoding(args.encoding)
        .enforce_base_path(args.enforce_base_path);
    if let Some(prefix) = args.prefix {
        options = options.with_prefix(prefix);
    }
    for key in args.allow {
        options = options.allow_key(key);
    }
    for key in args.override_keys {
        options = options.override_key(key);
    }
    if let Some(base_dir) = args.base_dir {
        options = options.with_base_dir(base_dir);
    }
    if let Some(limit) = args.max_file_bytes {
        options = options.with_max_file_bytes((limit > 0).then_some(limit));
    }

    let resolution = SecretsResolver::new().load(&env, &options);
    tracing::debug!(
        values = resolution.values.len(),
        failures = resolution.failures.len(),
        "resolution pass finished"
    );

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&resolution.values)?),
        _ => {
            let mut entries: Vec<(&str, &String)> = resolution.values.iter().collect();
            entries.sort_by_key(|(key, _)| *key);
            for (key, value) in entries {
                println!("{key}={value}");
            }
        }
    }

    if !resolution.failures.is_empty() {
        for failure in &resolution.failures {
            eprintln!("senv: {failure}");
        }
        std::process::exit(1);
    }
    Ok(())
}
