//! Subcommand implementations and the build options they share.

mod convert;
mod info;
mod link;

use std::error::Error;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use ndmake_lib::consts::DEFAULT_COMMAND_TIMEOUT;
use ndmake_lib::{BuildConfig, BuildFailure, BuildReport, ProcessRunner, Target, TargetId, plan, update};

use crate::output::{OutputFormat, count, print_chain_step, print_error, print_info, print_json, print_success};

pub use convert::{ConvertArgs, cmd_convert};
pub use info::{InfoArgs, cmd_info};
pub use link::{LinkArgs, cmd_link};

/// Options accepted by every subcommand that runs a build.
#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Kill commands that run longer than this (e.g., "30s", "5m")
  #[arg(long, default_value_t = humantime::Duration::from(DEFAULT_COMMAND_TIMEOUT))]
  pub timeout: humantime::Duration,

  /// Write outputs in place instead of through a staging file
  #[arg(long)]
  pub non_atomic: bool,

  /// Show what would be built without running anything
  #[arg(long)]
  pub dry_run: bool,

  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub format: OutputFormat,
}

impl BuildArgs {
  fn config(&self) -> BuildConfig {
    BuildConfig {
      atomic_outputs: !self.non_atomic,
      ..BuildConfig::default()
    }
  }
}

#[derive(Debug, Serialize)]
struct FailureOutput<'a> {
  error: String,
  target: Option<&'a TargetId>,
  chain: &'a [TargetId],
}

/// Build `root` with the given options and print the outcome.
///
/// Exits the process with status 1 if the build fails.
fn run_build(root: &dyn Target, args: &BuildArgs) -> Result<()> {
  let config = args.config();
  debug!(timeout = %args.timeout, atomic = config.atomic_outputs, dry_run = args.dry_run, "build options");

  let result = if args.dry_run {
    plan(root, &config)
  } else {
    let runner = ProcessRunner::new(args.timeout.into()).context("Failed to create async runtime")?;
    update(root, &runner, &config)
  };

  match result {
    Ok(report) => print_report(&report, args.format),
    Err(failure) => {
      print_failure(&failure, args.format)?;
      std::process::exit(1);
    }
  }
}

fn print_report(report: &BuildReport, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    return print_json(report);
  }

  for id in &report.updated {
    if report.dry_run {
      print_info(&format!("Would build {id}"));
    } else {
      print_success(&format!("Built {id}"));
    }
  }

  if report.is_noop() {
    print_info(&format!("Nothing to do ({} up to date)", count(report.up_to_date, "target")));
  } else if report.dry_run {
    print_info(&format!("{} would be built", count(report.updated.len(), "target")));
  } else {
    print_info(&format!(
      "{} built, {} up to date",
      count(report.updated.len(), "target"),
      report.up_to_date
    ));
  }

  Ok(())
}

fn print_failure(failure: &BuildFailure, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    return print_json(&FailureOutput {
      error: failure.error.to_string(),
      target: failure.failed_target(),
      chain: &failure.chain,
    });
  }

  print_error(&failure.to_string());

  let mut cause = failure.error.source();
  while let Some(err) = cause {
    eprintln!("  caused by: {err}");
    cause = err.source();
  }

  if failure.chain.len() > 1 {
    eprintln!("  dependency chain:");
    for (depth, id) in failure.chain.iter().enumerate() {
      print_chain_step(depth, &id.to_string());
    }
  }

  Ok(())
}
