use serde::{Deserialize, Serialize};

use crate::object::LoggerTimeZone;

pub const DEFAULT_LEVEL: &str = "debug";
pub const DEFAULT_ROTATE_POLICY: &str = "size";
/// Hours.
pub const DEFAULT_ROTATE_TIME: u32 = 0;
/// Megabytes; `0` lets the size backend pick its own limit.
pub const DEFAULT_ROTATE_SIZE: u64 = 0;
/// Count; `0` keeps every rotated file.
pub const DEFAULT_MAX_BACKUP: usize = 0;
/// Days; `0` never expires rotated files.
pub const DEFAULT_MAX_AGE: u32 = 0;

/// User facing logger configuration.
///
/// Empty strings and zero values mean "use the default", see the `DEFAULT_*` constants.
/// Every field may be omitted when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum severity: `trace|debug|info|warn|error|fatal|panic`.
    pub level: String,
    /// Log file path; empty keeps output on the console only.
    pub file: String,
    /// `size`, `daily` or `time`.
    pub rotate_policy: String,
    /// Rotation interval in hours for the `time` policy.
    pub rotate_time: u32,
    /// Size limit in megabytes for the `size` policy.
    pub rotate_size: u64,
    /// Number of rotated files to keep.
    pub max_backup: usize,
    /// Days a rotated file is kept.
    pub max_age: u32,
    /// Human-readable text instead of JSON.
    pub format_text: bool,
    /// Force ANSI colors in text output.
    pub format_color: bool,
    /// Annotate entries with target, file and line of the call site.
    pub format_report: bool,
    pub timezone: LoggerTimeZone,
}
