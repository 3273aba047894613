//! Process runner behavior as seen through converter targets.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ndmake_lib::{BuildConfig, BuildError, CommandTemplate, Commands, ConvertTarget, TargetRef, update};

use super::common::{SpyRunner, TestEnv, scripted};

#[test]
fn slow_command_times_out() {
  let env = TestEnv::new();
  let svg = env.source("logo.svg", "<svg/>");
  let png_path = env.path("icon.png");
  let png = scripted(&png_path, vec![svg], "sleep 10");
  let runner = SpyRunner::with_timeout(Duration::from_millis(300));

  let started = Instant::now();
  let failure = update(png.as_ref(), &runner, &BuildConfig::default()).unwrap_err();

  assert!(matches!(
    failure.error,
    BuildError::CommandFailed { timed_out: true, .. }
  ));
  assert!(started.elapsed() < Duration::from_secs(10));
  assert!(!png_path.exists());
}

#[test]
fn commands_see_closed_stdin() {
  let env = TestEnv::new();
  let svg = env.source("logo.svg", "<svg/>");
  let out_path = env.path("stdin.txt");
  let out = scripted(&out_path, vec![svg], "cat > \"$1\"");

  update(out.as_ref(), &SpyRunner::new(), &BuildConfig::default()).unwrap();

  assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "");
}

#[test]
fn multiple_commands_run_in_order() {
  let env = TestEnv::new();
  let a = env.source("a.txt", "a");
  let b = env.source("b.txt", "b");
  let out_path = env.path("joined.txt");
  let recipe = Commands::new(vec![
    CommandTemplate::new("cp").arg("$${in:0}").arg("$${out}"),
    CommandTemplate::new("/bin/sh")
      .arg("-c")
      .arg("cat \"$1\" >> \"$2\"")
      .arg("sh")
      .arg("$${in:1}")
      .arg("$${out}"),
  ]);
  let out: TargetRef = Arc::new(ConvertTarget::new(&out_path, vec![a, b], recipe));
  let runner = SpyRunner::new();

  update(out.as_ref(), &runner, &BuildConfig::default()).unwrap();

  assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "ab");
  let programs: Vec<String> = runner.commands().into_iter().map(|c| c.program).collect();
  assert_eq!(programs, ["cp", "/bin/sh"]);
}

#[test]
fn inputs_placeholder_expands_to_every_input() {
  let env = TestEnv::new();
  let a = env.source("a.txt", "1");
  let b = env.source("b.txt", "2");
  let out_path = env.path("all.txt");
  let template = CommandTemplate::new("/bin/sh")
    .arg("-c")
    .arg("out=\"$1\"; shift; cat \"$@\" > \"$out\"")
    .arg("sh")
    .arg("$${out}")
    .arg("$${inputs}");
  let out = ConvertTarget::new(&out_path, vec![a, b], Commands::new(vec![template]));

  update(&out, &SpyRunner::new(), &BuildConfig::default()).unwrap();

  assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "12");
}

#[test]
fn unknown_program_is_spawn_error() {
  let env = TestEnv::new();
  let svg = env.source("logo.svg", "<svg/>");
  let template = CommandTemplate::new("ndm-no-such-converter").arg("$${in}").arg("$${out}");
  let out = ConvertTarget::new(env.path("icon.png"), vec![svg], Commands::new(vec![template]));

  let failure = update(&out, &SpyRunner::new(), &BuildConfig::default()).unwrap_err();

  assert!(matches!(failure.error, BuildError::CommandSpawn { .. }));
}
