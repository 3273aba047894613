//! Implementation of the `ndm convert` command.
//!
//! Builds one output from a list of input files by running a command
//! template, the way a single make rule would.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;

use ndmake_lib::{CommandTemplate, Commands, ConvertTarget, SourceTarget, TargetRef};

use super::{BuildArgs, run_build};

#[derive(Args, Debug)]
pub struct ConvertArgs {
  /// Input file; repeat for several inputs, available as $${in:0}, $${in:1}, ...
  #[arg(short, long = "input", required = true)]
  pub inputs: Vec<PathBuf>,

  /// Output file, available as $${out}
  #[arg(short, long)]
  pub output: PathBuf,

  /// Program and arguments to run, after `--`
  #[arg(last = true, required = true)]
  pub command: Vec<String>,

  #[command(flatten)]
  pub build: BuildArgs,
}

pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
  let Some((program, rest)) = args.command.split_first() else {
    bail!("No command given after `--`");
  };

  let template = CommandTemplate::new(program.as_str()).args(rest.iter().cloned());
  let inputs: Vec<TargetRef> = args
    .inputs
    .iter()
    .map(|path| Arc::new(SourceTarget::new(path)) as TargetRef)
    .collect();

  let target = ConvertTarget::new(&args.output, inputs, Commands::new(vec![template]));

  run_build(&target, &args.build)
}
