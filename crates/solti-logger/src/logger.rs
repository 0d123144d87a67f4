use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use time::{format_description::BorrowedFormatItem, macros::format_description};
use tracing::debug;
use tracing_subscriber::{
    Layer, Registry,
    fmt::{
        self,
        time::OffsetTime,
        writer::{BoxMakeWriter, MakeWriterExt},
    },
    layer::{Identity, Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};

use crate::{
    config::LoggerConfig,
    error::LoggerError,
    filter::SeverityFilter,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
    resolve::{Output, Settings},
    rolling::{self, SharedFile},
    writer::Console,
};

/// `YYYY-MM-DD HH:MM:SS`, used by both formats.
pub(crate) const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

type Base = Layered<reload::Layer<SeverityFilter, Registry>, Registry>;
type OutputLayer = Box<dyn Layer<Base> + Send + Sync + 'static>;

/// Subscriber whose level and output are driven by a [`Logger`].
pub type LoggerSubscriber = Layered<reload::Layer<OutputLayer, Base>, Base>;

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Default)]
struct State {
    settings: Option<Settings>,
    file: Option<SharedFile>,
}

/// Configuration handle of a logging subscriber.
///
/// The level filter and the formatting layer sit behind reload handles,
/// so [`Logger::apply`] swaps them in place while other threads keep logging.
/// Until the first successful `apply` the subscriber drops every event.
pub struct Logger {
    filter: reload::Handle<SeverityFilter, Registry>,
    output: reload::Handle<OutputLayer, Base>,
    console: Console,
    state: Mutex<State>,
}

impl Logger {
    /// Creates an unconfigured logger and the subscriber it controls.
    ///
    /// The subscriber can be installed globally or scoped with `tracing::subscriber::with_default`.
    pub fn new(console: Console) -> (Self, LoggerSubscriber) {
        let (filter, filter_handle) = reload::Layer::new(SeverityFilter::OFF);
        let (output, output_handle) =
            reload::Layer::new(Box::new(Identity::new()) as OutputLayer);
        let subscriber = tracing_subscriber::registry().with(filter).with(output);

        let logger = Self {
            filter: filter_handle,
            output: output_handle,
            console,
            state: Mutex::default(),
        };
        (logger, subscriber)
    }

    /// Resolves `cfg` and reconfigures the subscriber.
    ///
    /// Nothing changes when resolving fails or the rotation backend cannot be opened.
    pub fn apply(&self, cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let settings = Settings::resolve(cfg)?;
        self.commit(settings)
    }

    fn commit(&self, settings: Settings) -> Result<(), LoggerError> {
        let file = match &settings.output {
            Output::Console => None,
            Output::File(file) => Some(SharedFile::new(rolling::open(file, settings.timezone)?)),
        };
        let writer = match &file {
            Some(file) => BoxMakeWriter::new(file.clone().and(self.console.clone())),
            None => BoxMakeWriter::new(self.console.clone()),
        };

        self.output
            .reload(mk_layer(&settings, writer))
            .map_err(as_error)?;
        self.filter
            .reload(SeverityFilter::new(settings.level))
            .map_err(as_error)?;

        let level = settings.level;
        let format = settings.format;
        let path = file.as_ref().map(SharedFile::current_path);
        {
            let mut state = self.state();
            state.settings = Some(settings);
            state.file = file;
        }

        debug!(target: "solti_logger", %level, ?format, file = ?path, "logger configured");
        Ok(())
    }

    /// Active severity; `None` until configured.
    pub fn level(&self) -> Option<LoggerLevel> {
        self.state().settings.as_ref().map(|s| s.level)
    }

    /// Settings applied by the last successful [`Logger::apply`].
    pub fn settings(&self) -> Option<Settings> {
        self.state().settings.clone()
    }

    /// File currently receiving entries, if file output is enabled.
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.state().file.clone();
        file.map(|f| f.current_path())
    }

    /// Forces the file backend to start a new file. No-op for console-only output.
    pub fn rotate(&self) -> Result<(), LoggerError> {
        let file = self.state().file.clone();
        if let Some(file) = file {
            file.rotate()?;
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Configures the process-wide logger, installing it on first use.
///
/// The first successful call installs a global `tracing` subscriber writing to stdout;
/// later calls reconfigure that same subscriber.
/// A configuration that fails to resolve or to open its file returns an error
/// before anything is installed or changed.
///
/// Call it early from `main()`. Concurrent calls are not coordinated:
/// racing first calls may report [`LoggerError::AlreadyInitialized`].
pub fn init_logger(cfg: &LoggerConfig) -> Result<&'static Logger, LoggerError> {
    let settings = Settings::resolve(cfg)?;
    if let Some(logger) = LOGGER.get() {
        logger.commit(settings)?;
        return Ok(logger);
    }

    let (logger, subscriber) = Logger::new(Console::Stdout);
    logger.commit(settings)?;
    subscriber.try_init().map_err(as_error)?;
    Ok(LOGGER.get_or_init(|| logger))
}

/// The process-wide logger, once [`init_logger`] succeeded.
pub fn logger() -> Option<&'static Logger> {
    LOGGER.get()
}

fn mk_layer(settings: &Settings, writer: BoxMakeWriter) -> OutputLayer {
    let timer = mk_timer(settings.timezone);
    let report = settings.report_caller;

    match settings.format {
        LoggerFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_ansi(false)
            .with_timer(timer)
            .with_target(report)
            .with_file(report)
            .with_line_number(report)
            .with_writer(writer)
            .boxed(),
        LoggerFormat::Text { color } => fmt::layer()
            .with_ansi(color)
            .with_timer(timer)
            .with_target(report)
            .with_file(report)
            .with_line_number(report)
            .with_writer(writer)
            .boxed(),
    }
}

fn mk_timer(tz: LoggerTimeZone) -> OffsetTime<&'static [BorrowedFormatItem<'static>]> {
    OffsetTime::new(tz.offset(), TIMESTAMP_FORMAT)
}

fn as_error(e: impl std::fmt::Display) -> LoggerError {
    let s = e.to_string();
    if s.contains("global default") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(s)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;
    use time::PrimitiveDateTime;

    use super::*;
    use crate::{resolve::Rotation, writer::MemorySink};

    fn setup(cfg: &LoggerConfig) -> (Logger, LoggerSubscriber, MemorySink) {
        let (console, sink) = Console::memory();
        let (logger, subscriber) = Logger::new(console);
        logger.apply(cfg).unwrap();
        (logger, subscriber, sink)
    }

    fn json_lines(sink: &MemorySink) -> Vec<Value> {
        sink.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn info_console_json_drops_debug() {
        let cfg = LoggerConfig {
            level: "info".into(),
            ..Default::default()
        };
        let (logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::info!(user = "ann", "visible");
        });

        let entries = json_lines(&sink);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["level"], "INFO");
        assert_eq!(entries[0]["message"], "visible");
        assert_eq!(entries[0]["user"], "ann");
        assert!(entries[0].get("filename").is_none());

        let ts = entries[0]["timestamp"].as_str().unwrap();
        assert!(PrimitiveDateTime::parse(ts, TIMESTAMP_FORMAT).is_ok(), "{ts}");

        assert_eq!(logger.level(), Some(LoggerLevel::Info));
        assert!(logger.file_path().is_none());
    }

    #[test]
    fn invalid_level_keeps_previous_configuration() {
        let cfg = LoggerConfig {
            level: "warn".into(),
            ..Default::default()
        };
        let (logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || {
            let err = logger
                .apply(&LoggerConfig {
                    level: "chatty".into(),
                    format_text: true,
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, LoggerError::InvalidLogLevel(_)));

            tracing::info!("dropped");
            tracing::warn!("kept");
        });

        assert_eq!(logger.level(), Some(LoggerLevel::Warn));
        let entries = json_lines(&sink);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["message"], "kept");
    }

    #[test]
    fn first_invalid_level_leaves_logger_unconfigured() {
        let (console, sink) = Console::memory();
        let (logger, subscriber) = Logger::new(console);

        let err = logger
            .apply(&LoggerConfig {
                level: "nope".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLogLevel(_)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("nobody listens");
        });

        assert!(logger.level().is_none());
        assert!(logger.settings().is_none());
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn empty_level_defaults_to_debug() {
        let (logger, subscriber, sink) = setup(&LoggerConfig::default());

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("too low");
            tracing::debug!("debug shows");
        });

        assert_eq!(logger.level(), Some(LoggerLevel::Debug));
        let messages: Vec<_> = json_lines(&sink)
            .into_iter()
            .map(|v| v["message"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(messages, vec!["debug shows"]);
    }

    #[test]
    fn text_format_without_color() {
        let cfg = LoggerConfig {
            level: "info".into(),
            format_text: true,
            ..Default::default()
        };
        let (_logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || tracing::info!("plain text"));

        let out = sink.contents();
        assert!(out.contains("INFO"));
        assert!(out.contains("plain text"));
        assert!(!out.contains('\u{1b}'));
        assert!(serde_json::from_str::<Value>(out.trim()).is_err());

        let stamp = &out[..19];
        assert!(PrimitiveDateTime::parse(stamp, TIMESTAMP_FORMAT).is_ok(), "{out}");
    }

    #[test]
    fn text_format_with_forced_color() {
        let cfg = LoggerConfig {
            format_text: true,
            format_color: true,
            ..Default::default()
        };
        let (_logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || tracing::warn!("colored"));

        assert!(sink.contents().contains('\u{1b}'));
    }

    #[test]
    fn report_caller_adds_location() {
        let cfg = LoggerConfig {
            format_report: true,
            ..Default::default()
        };
        let (_logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || tracing::info!("where"));

        let entries = json_lines(&sink);
        assert_eq!(entries.len(), 1);
        assert!(
            entries[0]["filename"]
                .as_str()
                .unwrap()
                .ends_with("logger.rs")
        );
        assert!(entries[0]["line_number"].as_u64().is_some());
        assert!(entries[0]["target"].as_str().is_some());
    }

    #[test]
    fn size_policy_mirrors_console_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let cfg = LoggerConfig {
            level: "debug".into(),
            file: path.display().to_string(),
            rotate_policy: "size".into(),
            rotate_size: 10,
            max_backup: 3,
            ..Default::default()
        };
        let (logger, subscriber, sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || tracing::debug!("mirrored"));

        let file = fs::read_to_string(&path).unwrap();
        assert!(file.contains("mirrored"));
        assert_eq!(file, sink.contents());
        assert_eq!(logger.file_path(), Some(path));
        assert_eq!(
            logger.settings().unwrap().file().unwrap().rotation,
            Rotation::Size {
                max_size_mb: 10,
                max_backup: 3,
                max_age_days: 0,
            }
        );
    }

    #[test]
    fn daily_policy_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let cfg = LoggerConfig {
            file: path.display().to_string(),
            rotate_policy: "daily".into(),
            max_backup: 5,
            max_age: 10,
            ..Default::default()
        };
        let (logger, subscriber, _sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || tracing::info!("dated"));

        let active = logger.file_path().unwrap();
        let name = active.file_name().unwrap().to_str().unwrap();
        let suffix = name.strip_prefix("app.log.").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        assert!(fs::read_to_string(&active).unwrap().contains("dated"));

        assert!(matches!(
            logger.settings().unwrap().file().unwrap().rotation,
            Rotation::Time {
                interval_hours: 24,
                max_backup: 5,
                max_age_days: 0,
                ..
            }
        ));
    }

    #[test]
    fn failed_backend_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let (logger, subscriber, sink) = setup(&LoggerConfig {
            level: "info".into(),
            ..Default::default()
        });

        let err = logger
            .apply(&LoggerConfig {
                level: "trace".into(),
                file: blocker.join("app.log").display().to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LoggerError::Io(_)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("still filtered");
            tracing::info!("still console");
        });

        assert_eq!(logger.level(), Some(LoggerLevel::Info));
        assert!(logger.file_path().is_none());
        let entries = json_lines(&sink);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["message"], "still console");
    }

    #[test]
    fn reconfigure_switches_format_in_place() {
        let (logger, subscriber, sink) = setup(&LoggerConfig::default());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("as json");
            logger
                .apply(&LoggerConfig {
                    level: "info".into(),
                    format_text: true,
                    ..Default::default()
                })
                .unwrap();
            tracing::info!("as text");
        });

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(serde_json::from_str::<Value>(&lines[0]).is_ok());
        assert!(lines[1].contains("as text"));
        assert!(serde_json::from_str::<Value>(&lines[1]).is_err());
    }

    #[test]
    fn rotate_moves_active_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggerConfig {
            file: dir.path().join("app.log").display().to_string(),
            ..Default::default()
        };
        let (logger, subscriber, _sink) = setup(&cfg);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first");
            logger.rotate().unwrap();
            tracing::info!("second");
        });

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"app.log".to_string()));
        assert!(
            fs::read_to_string(dir.path().join("app.log"))
                .unwrap()
                .contains("second")
        );
    }
}
