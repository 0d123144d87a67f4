use std::path::PathBuf;

use crate::{
    config::{
        DEFAULT_LEVEL, DEFAULT_MAX_AGE, DEFAULT_MAX_BACKUP, DEFAULT_ROTATE_POLICY,
        DEFAULT_ROTATE_SIZE, DEFAULT_ROTATE_TIME, LoggerConfig,
    },
    error::LoggerError,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone, RotatePolicy},
};

/// Effective logger settings after merging a [`LoggerConfig`] with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub level: LoggerLevel,
    pub format: LoggerFormat,
    /// Include target, file and line of the call site.
    pub report_caller: bool,
    pub timezone: LoggerTimeZone,
    pub output: Output,
}

/// Where entries go besides formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Console,
    /// Console mirrored into a rolling file.
    File(FileSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    /// Active file for size rotation, link name for time rotation.
    pub path: PathBuf,
    pub rotation: Rotation,
}

/// Parameters of the selected rotation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rotation {
    Size {
        max_size_mb: u64,
        max_backup: usize,
        max_age_days: u32,
    },
    Time {
        /// strftime-like file name pattern (`%Y%m%d...`).
        pattern: String,
        interval_hours: u32,
        max_backup: usize,
        max_age_days: u32,
    },
}

impl Settings {
    /// Validates and merges `cfg` with the package defaults.
    ///
    /// Performs no I/O: opening the rotation backend happens when the settings are applied.
    pub fn resolve(cfg: &LoggerConfig) -> Result<Self, LoggerError> {
        let level_text = if cfg.level.is_empty() {
            DEFAULT_LEVEL
        } else {
            cfg.level.as_str()
        };
        let level = level_text.parse::<LoggerLevel>()?;

        let output = if cfg.file.is_empty() {
            Output::Console
        } else {
            Output::File(FileSettings::resolve(cfg))
        };

        Ok(Self {
            level,
            format: LoggerFormat::from_flags(cfg.format_text, cfg.format_color),
            report_caller: cfg.format_report,
            timezone: cfg.timezone,
            output,
        })
    }

    pub fn file(&self) -> Option<&FileSettings> {
        match &self.output {
            Output::Console => None,
            Output::File(file) => Some(file),
        }
    }
}

impl FileSettings {
    fn resolve(cfg: &LoggerConfig) -> Self {
        let mut max_age_days = if cfg.max_age > 0 {
            cfg.max_age
        } else {
            DEFAULT_MAX_AGE
        };
        let max_backup = if cfg.max_backup > 0 {
            cfg.max_backup
        } else {
            DEFAULT_MAX_BACKUP
        };

        let tag = if cfg.rotate_policy.is_empty() {
            DEFAULT_ROTATE_POLICY
        } else {
            cfg.rotate_policy.as_str()
        };
        let policy = RotatePolicy::from_tag(tag);

        let rotation = match policy.pattern_suffix() {
            None => Rotation::Size {
                max_size_mb: if cfg.rotate_size > 0 {
                    cfg.rotate_size
                } else {
                    DEFAULT_ROTATE_SIZE
                },
                max_backup,
                max_age_days,
            },
            Some(suffix) => {
                // The time backend keeps either a count or an age limit, count wins.
                if max_backup > 0 {
                    max_age_days = 0;
                }
                let rotate_time = if cfg.rotate_time > 0 {
                    cfg.rotate_time
                } else {
                    DEFAULT_ROTATE_TIME
                };
                Rotation::Time {
                    pattern: format!("{}{suffix}", cfg.file.replace('%', "%%")),
                    interval_hours: policy.interval_hours(rotate_time),
                    max_backup,
                    max_age_days,
                }
            }
        };

        Self {
            path: PathBuf::from(&cfg.file),
            rotation,
        }
    }
}
