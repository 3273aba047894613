//! ndmake-lib: a minimal timestamp-driven incremental build engine
//!
//! This crate provides the building blocks of a make-like dependency system
//! expressed as composable objects instead of a rule file:
//! - `Target`: a node in the dependency graph with a staleness test and an update action
//! - `SourceTarget`, `ConvertTarget`, `HardlinkTarget`, `AggregateTarget`: the concrete kinds
//! - `CommandRunner`: the seam through which converters run external programs
//! - `update` / `plan`: the entry points that walk the graph bottom-up

pub mod command;
pub mod consts;
pub mod execute;
pub mod placeholder;
pub mod target;
mod util;

pub use command::{CommandLine, CommandRunner, CommandTemplate, ProcessRunner};
pub use execute::{BuildConfig, BuildContext, BuildError, BuildFailure, BuildReport, plan, update};
pub use target::{
  AggregateTarget, Commands, ConvertJob, ConvertTarget, HardlinkTarget, Recipe, SourceTarget, Target, TargetId,
  TargetRef, Timestamp,
};
