use clap::Subcommand;

mod keys;
mod resolve;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the current environment into a configuration snapshot
    Resolve(resolve::ResolveArgs),

    /// Preview or apply hierarchical Pascal-case forms of environment keys
    Keys(keys::KeysArgs),
}

impl Commands {
    pub fn execute(self) -> eyre::Result<()> {
        match self {
            Commands::Resolve(args) => resolve::execute(args),
            Commands::Keys(args) => keys::execute(args),
        }
    }
}
