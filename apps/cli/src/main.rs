//! cmdforge CLI - operator tooling for declarative custom commands
//!
//! Validates a specification directory, prints argument trees, and runs a
//! simulated host shell that drives the dispatcher the way a game server
//! would.

mod colors;
mod commands;
mod world;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{check, inspect, shell};

/// cmdforge - declarative custom commands
#[derive(Parser, Debug)]
#[command(
    name = "cmdforge",
    author,
    version,
    about = "cmdforge - declarative custom commands",
    long_about = "Loads command specification units (YAML or TOML), checks them, prints their argument trees,\nand simulates a host that invokes them."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "cmdforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every unit in a directory and report what was found
    ///
    /// Exits non-zero if any unit failed to load.
    Check {
        /// Commands directory (defaults to the configured one)
        dir: Option<PathBuf>,
    },

    /// Print the argument tree of one command
    Inspect {
        /// Commands directory
        dir: PathBuf,

        /// Command name or alias
        name: String,
    },

    /// Run a simulated host reading invocations from stdin
    ///
    /// Lines: `as <player> /<cmd> args...`, `console /<cmd> args...`,
    /// `tab <player|console> /<cmd> args...`, `balance <player>`, `wait <seconds>`,
    /// `quit`.
    Shell {
        /// World file describing worlds, players, balances and permissions
        #[arg(short, long)]
        world: PathBuf,

        /// Commands directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = commands::load_config(&args.config)?;

    match args.command {
        Command::Check { dir } => check::execute(&config, dir).await,
        Command::Inspect { dir, name } => inspect::execute(&dir, &name).await,
        Command::Shell { world, dir } => shell::execute(config, &world, dir).await,
    }
}
