//! Rolling log files.
//!
//! Two interchangeable backends implement [`RollingFile`]:
//! - [`SizeRolling`]: renames the active file once it reaches a size limit;
//! - [`TimeRolling`]: writes to a dated file per period and keeps a link name pointing at it.
//!
//! [`open`] builds the backend described by resolved [`FileSettings`].
mod clock;
mod interval;
mod pattern;
mod size;

pub use clock::Clock;
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use interval::TimeRolling;
pub use pattern::Pattern;
pub use size::{DEFAULT_MAX_SIZE, MEGABYTE, SizeRolling};

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing_subscriber::fmt::MakeWriter;

use crate::{
    error::LoggerError,
    resolve::{FileSettings, Rotation},
};

/// A file writer that starts a new file on its own trigger and expires old ones.
pub trait RollingFile: Write + Send + 'static {
    /// Path of the file currently receiving writes.
    fn current_path(&self) -> &Path;

    /// Starts a new file immediately and applies retention.
    fn rotate(&mut self) -> io::Result<()>;
}

/// Opens the rotation backend selected by `settings`.
pub fn open<C: Clock>(
    settings: &FileSettings,
    clock: C,
) -> Result<Box<dyn RollingFile>, LoggerError> {
    match &settings.rotation {
        Rotation::Size {
            max_size_mb,
            max_backup,
            max_age_days,
        } => Ok(Box::new(SizeRolling::new(
            &settings.path,
            max_size_mb.saturating_mul(MEGABYTE),
            *max_backup,
            *max_age_days,
            clock,
        )?)),
        Rotation::Time {
            pattern,
            interval_hours,
            max_backup,
            max_age_days,
        } => Ok(Box::new(TimeRolling::new(
            pattern,
            Some(settings.path.clone()),
            *interval_hours,
            *max_backup,
            *max_age_days,
            clock,
        )?)),
    }
}

pub(crate) fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Rolling file shared between every event writer of a subscriber.
#[derive(Clone)]
pub struct SharedFile(Arc<Mutex<Box<dyn RollingFile>>>);

impl SharedFile {
    pub fn new(file: Box<dyn RollingFile>) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn RollingFile>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_path(&self) -> PathBuf {
        self.lock().current_path().to_path_buf()
    }

    pub fn rotate(&self) -> io::Result<()> {
        self.lock().rotate()
    }
}

impl fmt::Debug for SharedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedFile")
            .field(&self.current_path())
            .finish()
    }
}

/// Per-event handle; each write takes the file lock once.
pub struct SharedFileWriter<'a>(&'a SharedFile);

impl Write for SharedFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = SharedFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileWriter(self)
    }
}
