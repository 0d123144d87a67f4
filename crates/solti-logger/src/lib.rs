//! Process-wide logging on top of `tracing`.
//!
//! A [`LoggerConfig`] picks the minimum level, JSON or text output, call-site reporting
//! and an optional log file rotated by size or by time.
//! [`init_logger`] applies it to one shared subscriber; the leveled macros
//! ([`trace!`], [`debug!`], [`info!`], [`warn!`], [`error!`], [`fatal!`], [`log_panic!`]) write through it.
//!
//! # Examples
//! ```rust,no_run
//! use solti_logger::{LoggerConfig, init_logger, info};
//!
//! fn main() -> Result<(), solti_logger::LoggerError> {
//!     solti_logger::init_local_offset();
//!
//!     let cfg = LoggerConfig {
//!         level: "info".into(),
//!         file: "/var/log/app.log".into(),
//!         rotate_policy: "daily".into(),
//!         max_backup: 7,
//!         ..Default::default()
//!     };
//!     init_logger(&cfg)?;
//!
//!     info!("logger initialized");
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod filter;
mod logger;
mod macros;
mod object;
mod resolve;
pub mod rolling;
mod writer;

pub use config::{
    DEFAULT_LEVEL, DEFAULT_MAX_AGE, DEFAULT_MAX_BACKUP, DEFAULT_ROTATE_POLICY,
    DEFAULT_ROTATE_SIZE, DEFAULT_ROTATE_TIME, LoggerConfig,
};
pub use error::LoggerError;
pub use logger::{Logger, LoggerSubscriber, init_logger, logger};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, RotatePolicy, init_local_offset};
pub use resolve::{FileSettings, Output, Rotation, Settings};
pub use writer::{Console, ConsoleWriter, MemorySink};

#[doc(hidden)]
pub mod __private {
    pub use tracing;

    pub fn exit() -> ! {
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test touching the global logger.
    #[test]
    fn global_logger_validates_before_install_and_keeps_level() {
        // A scoped subscriber does not count as a global one.
        let (console, _sink) = Console::memory();
        let (_scoped, subscriber) = Logger::new(console);
        tracing::subscriber::with_default(subscriber, || tracing::info!("scoped"));

        let err = init_logger(&LoggerConfig {
            level: "shout".into(),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, LoggerError::InvalidLogLevel(_)));
        assert!(logger().is_none());

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = init_logger(&LoggerConfig {
            file: blocker.join("app.log").display().to_string(),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, LoggerError::Io(_)));
        assert!(logger().is_none());

        let cfg = LoggerConfig {
            level: "error".into(),
            ..Default::default()
        };
        let first = init_logger(&cfg).unwrap();
        assert_eq!(first.level(), Some(LoggerLevel::Error));

        assert!(
            init_logger(&LoggerConfig {
                level: "bogus".into(),
                ..Default::default()
            })
            .is_err()
        );
        assert_eq!(logger().unwrap().level(), Some(LoggerLevel::Error));

        let again = init_logger(&LoggerConfig {
            level: "warn".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(std::ptr::eq(first, again));
        assert_eq!(again.level(), Some(LoggerLevel::Warn));
    }
}
