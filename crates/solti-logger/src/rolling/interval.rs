//! Time triggered rolling file.
//!
//! Every write computes the file name for the current period from a [`Pattern`].
//! When the name changes, the new file is opened, the link name is pointed at it and old files are expired.
use std::{
    cmp::Ordering,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use time::{Duration, OffsetDateTime};

use crate::{
    error::LoggerError,
    rolling::{Clock, RollingFile, create_parent, pattern::Pattern},
};

pub struct TimeRolling<C> {
    pattern: Pattern,
    link: Option<PathBuf>,
    interval: Option<Duration>,
    max_backup: usize,
    max_age: Option<Duration>,
    clock: C,
    /// File name of the current period.
    period: PathBuf,
    /// Active file: the period name, plus `.N` after forced rotations.
    current: PathBuf,
    generation: u32,
    file: Option<File>,
}

impl<C: Clock> TimeRolling<C> {
    /// Opens the file for the current period.
    ///
    /// - `interval_hours = 0` disables periodic rotation, the first file stays active;
    /// - `max_backup`: files to keep, the active one included, `0` keeps all;
    /// - `max_age_days`: days a rotated file is kept, `0` keeps forever.
    ///
    /// `max_backup` and `max_age_days` are mutually exclusive, both set is an error.
    pub fn new(
        pattern: &str,
        link: Option<PathBuf>,
        interval_hours: u32,
        max_backup: usize,
        max_age_days: u32,
        clock: C,
    ) -> Result<Self, LoggerError> {
        let pattern = Pattern::parse(pattern)?;
        if max_backup > 0 && max_age_days > 0 {
            return Err(LoggerError::ConflictingRetention);
        }

        let interval = (interval_hours > 0).then(|| Duration::hours(i64::from(interval_hours)));
        let period = pattern.path_for(period_start(clock.now(), interval));

        let mut rolling = Self {
            pattern,
            link,
            interval,
            max_backup,
            max_age: (max_age_days > 0).then(|| Duration::days(i64::from(max_age_days))),
            clock,
            period: period.clone(),
            current: period.clone(),
            generation: 0,
            file: None,
        };
        rolling.switch_to(period)?;
        Ok(rolling)
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn link(&self) -> Option<&Path> {
        self.link.as_deref()
    }

    /// Name for the current period when it differs from the active one.
    fn due(&self) -> Option<PathBuf> {
        let interval = self.interval?;
        let next = self
            .pattern
            .path_for(period_start(self.clock.now(), Some(interval)));
        (next != self.period).then_some(next)
    }

    fn switch_to(&mut self, path: PathBuf) -> io::Result<()> {
        create_parent(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.file = Some(file);
        self.current = path;
        if let Some(link) = &self.link {
            relink(&self.current, link)?;
        }
        self.purge();
        Ok(())
    }

    /// Files produced by this pattern other than the active one, newest first.
    pub fn rotated(&self) -> Vec<PathBuf> {
        let Ok(paths) = glob::glob(&self.pattern.glob()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p != &self.current && Some(p) != self.link.as_ref())
            .filter(|p| fs::symlink_metadata(p).is_ok_and(|m| m.is_file()))
            .collect();
        files.sort_by(|a, b| natural_cmp(&b.to_string_lossy(), &a.to_string_lossy()));
        files
    }

    /// Best effort retention; a failed removal is retried on the next rotation.
    fn purge(&self) {
        let mut files = self.rotated();

        // The active file takes one of the `max_backup` slots.
        let keep = self.max_backup.saturating_sub(1);
        if self.max_backup > 0 && files.len() > keep {
            for path in files.drain(keep..) {
                let _ = fs::remove_file(path);
            }
        }

        if let Some(max_age) = self.max_age {
            let cutoff = self.clock.now() - max_age;
            for path in &files {
                let expired = fs::metadata(path)
                    .and_then(|m| m.modified())
                    .is_ok_and(|modified| OffsetDateTime::from(modified) < cutoff);
                if expired {
                    let _ = fs::remove_file(path);
                }
            }
        }
    }
}

impl<C: Clock> Write for TimeRolling<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(next) = self.due() {
            self.period = next.clone();
            self.generation = 0;
            self.switch_to(next)?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<C: Clock> RollingFile for TimeRolling<C> {
    fn current_path(&self) -> &Path {
        &self.current
    }

    /// Starts a new file right away. Within the same period a `.N` generation suffix is added.
    fn rotate(&mut self) -> io::Result<()> {
        let period = self
            .pattern
            .path_for(period_start(self.clock.now(), self.interval));
        if self.interval.is_some() && period != self.period {
            self.period = period.clone();
            self.generation = 0;
            return self.switch_to(period);
        }

        self.generation += 1;
        let mut next = self.period.clone().into_os_string();
        next.push(format!(".{}", self.generation));
        self.switch_to(PathBuf::from(next))
    }
}

/// Compares names with digit runs ordered by value, so `x.10` sorts after `x.9`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                let (na, nb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ord != Ordering::Equal {
                    return ord;
                }
                (a, b) = (ra, rb);
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                (a, b) = (&a[x.len_utf8()..], &b[y.len_utf8()..]);
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Start of the period containing `now`, aligned on wall clock time.
fn period_start(now: OffsetDateTime, interval: Option<Duration>) -> OffsetDateTime {
    let Some(interval) = interval else {
        return now;
    };
    let step = interval.whole_seconds();
    if step <= 0 {
        return now;
    }
    let wall = now.unix_timestamp() + i64::from(now.offset().whole_seconds());
    now - Duration::seconds(wall.rem_euclid(step))
}

#[cfg(unix)]
fn relink(target: &Path, link: &Path) -> io::Result<()> {
    let dest = match (target.parent(), link.parent()) {
        (Some(a), Some(b)) if a == b => target
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| target.to_path_buf()),
        _ => target.to_path_buf(),
    };

    let mut tmp = link.as_os_str().to_owned();
    tmp.push("_symlink");
    let tmp = PathBuf::from(tmp);

    let _ = fs::remove_file(&tmp);
    std::os::unix::fs::symlink(&dest, &tmp)?;
    fs::rename(&tmp, link)
}

#[cfg(not(unix))]
fn relink(_target: &Path, _link: &Path) -> io::Result<()> {
    Ok(())
}
