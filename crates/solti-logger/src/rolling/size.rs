//! Size triggered rolling file.
//!
//! The active file keeps its configured name. When a write would push it past the limit,
//! it is renamed to `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm><.ext>` in the same directory and a fresh file is opened.
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use time::{
    Duration, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::rolling::{Clock, RollingFile, create_parent};

/// Size limit used when none is configured.
pub const DEFAULT_MAX_SIZE: u64 = 100 * MEGABYTE;
pub const MEGABYTE: u64 = 1024 * 1024;

const BACKUP_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]-[minute]-[second].[subsecond digits:3]");

pub struct SizeRolling<C> {
    path: PathBuf,
    max_size: u64,
    max_backup: usize,
    max_age: Option<Duration>,
    clock: C,
    file: Option<File>,
    size: u64,
}

impl<C: Clock> SizeRolling<C> {
    /// Opens (or creates) the file at `path`.
    ///
    /// - `max_size`: bytes per file, `0` means [`DEFAULT_MAX_SIZE`];
    /// - `max_backup`: rotated files to keep, `0` keeps all;
    /// - `max_age_days`: days a rotated file is kept, `0` keeps forever.
    pub fn new(
        path: impl Into<PathBuf>,
        max_size: u64,
        max_backup: usize,
        max_age_days: u32,
        clock: C,
    ) -> io::Result<Self> {
        let mut rolling = Self {
            path: path.into(),
            max_size: if max_size == 0 {
                DEFAULT_MAX_SIZE
            } else {
                max_size
            },
            max_backup,
            max_age: (max_age_days > 0).then(|| Duration::days(i64::from(max_age_days))),
            clock,
            file: None,
            size: 0,
        };
        rolling.open_existing_or_new(0)?;
        Ok(rolling)
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> io::Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() + write_len >= self.max_size => self.rotate_now(),
            Ok(meta) => {
                let file = OpenOptions::new().append(true).open(&self.path)?;
                self.file = Some(file);
                self.size = meta.len();
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.open_new(),
            Err(e) => Err(e),
        }
    }

    /// Moves the current file aside (if any) and starts an empty one.
    fn open_new(&mut self) -> io::Result<()> {
        create_parent(&self.path)?;
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(self.clock.now()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    fn rotate_now(&mut self) -> io::Result<()> {
        self.file.take();
        self.open_new()?;
        self.purge();
        Ok(())
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path(&self, at: OffsetDateTime) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let stamp = at.format(BACKUP_TIME_FORMAT).unwrap_or_default();
        self.dir().join(format!("{stem}-{stamp}{ext}"))
    }

    /// Rotated files of this log, newest first.
    pub fn backups(&self) -> io::Result<Vec<(OffsetDateTime, PathBuf)>> {
        let (stem, ext) = self.name_parts();
        let head = format!("{stem}-");
        let offset = self.clock.now().offset();

        let mut out = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(stamp) = name
                .strip_prefix(head.as_str())
                .and_then(|rest| rest.strip_suffix(ext.as_str()))
            else {
                continue;
            };
            if let Ok(at) = PrimitiveDateTime::parse(stamp, BACKUP_TIME_FORMAT) {
                out.push((at.assume_offset(offset), entry.path()));
            }
        }
        out.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(out)
    }

    /// Best effort retention; a failed removal is retried on the next rotation.
    fn purge(&self) {
        let Ok(mut backups) = self.backups() else {
            return;
        };

        if self.max_backup > 0 && backups.len() > self.max_backup {
            for (_, path) in backups.drain(self.max_backup..) {
                let _ = fs::remove_file(path);
            }
        }

        if let Some(max_age) = self.max_age {
            let cutoff = self.clock.now() - max_age;
            for (_, path) in backups.iter().filter(|(at, _)| *at < cutoff) {
                let _ = fs::remove_file(path);
            }
        }
    }
}

impl<C: Clock> Write for SizeRolling<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {len} exceeds maximum file size {}",
                    self.max_size
                ),
            ));
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        } else if self.size + len > self.max_size {
            self.rotate_now()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))?;
        file.write_all(buf)?;
        self.size += len;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<C: Clock> RollingFile for SizeRolling<C> {
    fn current_path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.rotate_now()
    }
}
