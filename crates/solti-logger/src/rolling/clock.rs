use time::OffsetDateTime;

use crate::object::LoggerTimeZone;

/// Source of "now" for rotation decisions and backup names.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;
}

impl Clock for LoggerTimeZone {
    #[inline]
    fn now(&self) -> OffsetDateTime {
        LoggerTimeZone::now(self)
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;
