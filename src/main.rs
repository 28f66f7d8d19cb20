use anyhow::Result;
use clap::Parser;

use casc_script::cli::{Cli, Commands};
use casc_script::{commands, logging};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize structured logging
    logging::init(cli.log_level.as_deref());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Config(args) => commands::config::run(args.command),
    }
}
