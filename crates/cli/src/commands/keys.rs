use clap::Args;
use senv_env::{pascal_case_key, pascal_case_keys, EnvScope, EnvStore, ProcessStore};

#[derive(Args)]
pub struct KeysArgs {
    /// Only show keys whose Pascal-case form differs
    #[arg(long)]
    changed_only: bool,

    /// Rewrite the process environment in place, removing the original keys
    #[arg(long)]
    apply: bool,
}

pub fn execute(args: KeysArgs) -> eyre::Result<()> {
    let store = ProcessStore::new(EnvScope::Process);

    if args.apply {
        let renamed = pascal_case_keys(&store, None, true)?;
        eprintln!("senv: renamed {renamed} keys");
        return Ok(());
    }

    let snapshot = store.snapshot()?;
    let mut entries: Vec<(String, String)> = snapshot
        .iter()
        .map(|(key, _)| (key.clone(), pascal_case_key(key)))
        .filter(|(key, renamed)| !args.changed_only || key != renamed)
        .collect();
    entries.sort();

    for (key, renamed) in entries {
        println!("{key} -> {renamed}");
    }
    Ok(())
}
