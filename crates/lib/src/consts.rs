use std::time::Duration;

/// Wall-clock limit for a single external command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Prefix of the synthesized identity of virtual targets.
pub const VIRTUAL_TARGET_PREFIX: &str = "virtual-target";

/// Marker placed in the name of output staging files.
pub const STAGING_MARKER: &str = "ndm-stage";
