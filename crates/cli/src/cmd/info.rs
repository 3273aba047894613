use anyhow::Result;
use clap::Args;
use serde::Serialize;

use ndmake_lib::BuildConfig;
use ndmake_lib::consts::DEFAULT_COMMAND_TIMEOUT;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Args, Debug)]
pub struct InfoArgs {
  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
  version: &'static str,
  command_timeout_secs: u64,
  atomic_outputs: bool,
  detect_cycles: bool,
}

pub fn cmd_info(args: InfoArgs) -> Result<()> {
  let config = BuildConfig::default();
  let info = InfoOutput {
    version: env!("CARGO_PKG_VERSION"),
    command_timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
    atomic_outputs: config.atomic_outputs,
    detect_cycles: config.detect_cycles,
  };

  if args.format.is_json() {
    return print_json(&info);
  }

  print_info(&format!("ndm {}", info.version));
  print_stat(
    "Command timeout",
    &humantime::format_duration(DEFAULT_COMMAND_TIMEOUT).to_string(),
  );
  print_stat("Atomic outputs", if info.atomic_outputs { "on" } else { "off" });
  print_stat("Cycle check", if info.detect_cycles { "on" } else { "off" });

  Ok(())
}
