//! Implementation of the `ndm link` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use ndmake_lib::{AggregateTarget, HardlinkTarget, SourceTarget, TargetRef};

use super::{BuildArgs, run_build};

#[derive(Args, Debug)]
pub struct LinkArgs {
  /// Existing file to link to
  pub src: PathBuf,

  /// Link paths to create or refresh
  #[arg(required = true)]
  pub dests: Vec<PathBuf>,

  #[command(flatten)]
  pub build: BuildArgs,
}

/// Link each destination to `src`, relinking only those older than it.
pub fn cmd_link(args: LinkArgs) -> Result<()> {
  let src: TargetRef = Arc::new(SourceTarget::new(&args.src));
  let links: Vec<TargetRef> = args
    .dests
    .iter()
    .map(|dest| Arc::new(HardlinkTarget::new(dest, src.clone())) as TargetRef)
    .collect();

  run_build(&AggregateTarget::new(links), &args.build)
}
