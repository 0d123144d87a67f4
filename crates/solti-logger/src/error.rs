use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Invalid log level: {0} (expected: trace|debug|info|warn|error|fatal|panic)")]
    InvalidLogLevel(String),
    #[error("Invalid time zone: {0} (expected: local|utc)")]
    InvalidTimeZone(String),
    #[error("Invalid rotation pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Options max_age and max_backup cannot be both set for time based rotation")]
    ConflictingRetention,
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logger has been already initialized")]
    AlreadyInitialized,
    #[error("Failed to initialize logger: {0}")]
    InitializationFailed(String),
}
