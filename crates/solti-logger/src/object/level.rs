use std::{fmt, str::FromStr};

use tracing_subscriber::filter::LevelFilter;

use crate::error::LoggerError;

/// Minimum severity a logger emits.
///
/// Ordered from the most verbose to the most severe.
/// `tracing` has no levels above `ERROR`: at [`LoggerLevel::Fatal`] and [`LoggerLevel::Panic`]
/// only the `ERROR` events emitted by `fatal!` and `log_panic!` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoggerLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LoggerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerLevel::Trace => "trace",
            LoggerLevel::Debug => "debug",
            LoggerLevel::Info => "info",
            LoggerLevel::Warn => "warn",
            LoggerLevel::Error => "error",
            LoggerLevel::Fatal => "fatal",
            LoggerLevel::Panic => "panic",
        }
    }

    /// Most verbose `tracing` level this severity can let through.
    pub fn filter(&self) -> LevelFilter {
        match self {
            LoggerLevel::Trace => LevelFilter::TRACE,
            LoggerLevel::Debug => LevelFilter::DEBUG,
            LoggerLevel::Info => LevelFilter::INFO,
            LoggerLevel::Warn => LevelFilter::WARN,
            LoggerLevel::Error | LoggerLevel::Fatal | LoggerLevel::Panic => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "trace" => Ok(LoggerLevel::Trace),
            "debug" => Ok(LoggerLevel::Debug),
            "info" => Ok(LoggerLevel::Info),
            "warn" | "warning" => Ok(LoggerLevel::Warn),
            "error" => Ok(LoggerLevel::Error),
            "fatal" => Ok(LoggerLevel::Fatal),
            "panic" => Ok(LoggerLevel::Panic),
            _ => Err(LoggerError::InvalidLogLevel(s.to_string())),
        }
    }
}
