//! Main entry point for the anim-rs CLI

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use anim_rs::cli::{Cli, Commands};
use anim_rs::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still wins when set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .init();

    match cli.command {
        Commands::Skeleton { command } => commands::skeleton::execute(command),
        Commands::Blend { command } => commands::blend::execute(command),
        Commands::Simulate(args) => commands::simulate::execute(args),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
