use std::{str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::error::LoggerError;

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Caches the local UTC offset.
///
/// Reading the offset is only reliable while the process is single threaded,
/// so call this from `main()` before spawning threads. Falls back to UTC when the offset is unknown.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// Time zone used for entry timestamps and rotated file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Local,
    Utc,
}

impl LoggerTimeZone {
    pub fn offset(&self) -> UtcOffset {
        match self {
            LoggerTimeZone::Local => init_local_offset(),
            LoggerTimeZone::Utc => UtcOffset::UTC,
        }
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset())
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(LoggerTimeZone::Local),
            "utc" => Ok(LoggerTimeZone::Utc),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}
