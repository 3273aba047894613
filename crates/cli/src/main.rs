mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{ConvertArgs, InfoArgs, LinkArgs};

/// ndm - timestamp-driven incremental builds from the command line
#[derive(Parser)]
#[command(name = "ndm")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build one output from input files by running a command
  Convert(ConvertArgs),

  /// Hard link one file to one or more destinations
  Link(LinkArgs),

  /// Show version and default build settings
  Info(InfoArgs),
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Convert(args) => cmd::cmd_convert(args),
    Commands::Link(args) => cmd::cmd_link(args),
    Commands::Info(args) => cmd::cmd_info(args),
  }
}
