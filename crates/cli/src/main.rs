use clap::Parser;

mod commands;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "senv")]
#[command(about = "Resolve file-backed secrets from environment variables", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    logging::init().map_err(|e| eyre::eyre!(e))?;

    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
