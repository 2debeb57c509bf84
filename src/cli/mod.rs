//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod cloud;
pub mod config;
pub mod fetch;
pub mod inspect;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Burstiness/memory analysis of QRNG bit samples
#[derive(Parser)]
#[command(name = "burst-cloud")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse all samples and render the (B, M) cloud (default)
    Cloud(cloud::CloudArgs),

    /// Detailed gap profile of a single sample
    Inspect(inspect::InspectArgs),

    /// Download samples from a QRNG backend
    Fetch(fetch::FetchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => cloud::run(cloud::CloudArgs::default()),
        Some(Commands::Cloud(args)) => cloud::run(args),
        Some(Commands::Inspect(args)) => inspect::run(args),
        Some(Commands::Fetch(args)) => fetch::run(args),
        Some(Commands::Config(args)) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["burst-cloud"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["burst-cloud", "cloud", "-vv", "--seed", "5"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Cloud(args)) => assert_eq!(args.seed, Some(5)),
            _ => panic!("expected cloud command"),
        }
    }

    #[test]
    fn test_inspect_requires_file() {
        assert!(Cli::try_parse_from(["burst-cloud", "inspect"]).is_err());
    }
}
