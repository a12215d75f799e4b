//! Root CLI structure for anim-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "anim-rs")]
#[command(about = "Command-line tools for skeletal pose evaluation", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `--verbose` and `--quiet`
    pub fn log_level(&self) -> log::LevelFilter {
        match (self.verbose, self.quiet) {
            (0, true) => log::LevelFilter::Error,
            (0, false) => log::LevelFilter::Warn,
            (1, _) => log::LevelFilter::Info,
            (2, _) => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Skeleton definition operations
    Skeleton {
        #[command(subcommand)]
        command: crate::commands::skeleton::SkeletonCommands,
    },

    /// Blend request operations
    Blend {
        #[command(subcommand)]
        command: crate::commands::blend::BlendCommands,
    },

    /// Run a character animator over a scripted signal sequence
    Simulate(crate::commands::simulate::SimulateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
