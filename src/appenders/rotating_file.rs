//! Size-bounded log file with numbered backups
//!
//! [`RotatingFileSink`] appends already formatted lines to a file. When the
//! next line would push the file past [`RotationPolicy::max_bytes`], the file
//! is moved to `<path>.1` (older backups shift to `<path>.2`, ... and the
//! oldest is discarded) and a fresh file is opened at `<path>`.

use crate::core::error::{LoggerError, Result};
use serde::Deserialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default rotation threshold in bytes
pub const DEFAULT_MAX_BYTES: u64 = 6000;

/// Default number of rotated files kept next to the active one
pub const DEFAULT_MAX_BACKUPS: usize = 1;

/// Configuration for the rotating file sink
///
/// # Examples
///
/// ```
/// use customlog::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(1024 * 1024)
///     .with_max_backups(3)
///     .with_buffered(false);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationPolicy {
    /// Size threshold in bytes; `0` disables rotation
    pub max_bytes: u64,
    /// Number of backups kept (`<path>.1` ..= `<path>.N`)
    pub max_backups: usize,
    /// Hold writes in memory until `flush` or rotation
    pub buffered: bool,
    /// Keep existing content on open instead of truncating
    pub append: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_backups: DEFAULT_MAX_BACKUPS,
            buffered: true,
            append: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// # Errors
    ///
    /// Fails when fewer than one backup is requested.
    pub fn validate(&self) -> Result<()> {
        if self.max_backups == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_backups must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Advisory `<path>.lck` lock held while a sink owns `<path>`
#[cfg(feature = "file")]
struct LockFile {
    file: File,
    path: PathBuf,
}

#[cfg(feature = "file")]
impl LockFile {
    fn acquire(log_path: &Path) -> Result<Self> {
        use fs2::FileExt;

        let mut path = log_path.as_os_str().to_owned();
        path.push(".lck");
        let path = PathBuf::from(path);

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "create lock file",
                    format!("Failed to open '{}'", path.display()),
                    e,
                )
            })?;
        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        Ok(Self { file, path })
    }
}

#[cfg(feature = "file")]
impl Drop for LockFile {
    fn drop(&mut self) {
        use fs2::FileExt;

        // Unlink while still locked so no other sink can lock the old inode
        let _ = fs::remove_file(&self.path);
        let _ = FileExt::unlock(&self.file);
    }
}

/// Append-only log file with size-based rotation
///
/// # Examples
///
/// ```no_run
/// use customlog::appenders::{RotatingFileSink, RotationPolicy};
///
/// let mut sink = RotatingFileSink::open("logs/app.log", RotationPolicy::default()).unwrap();
/// sink.append("[2025-01-08 10:30:45.123] [INFO] started\n").unwrap();
/// sink.close().unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    rotations: u64,
    closed: bool,
    #[cfg(feature = "file")]
    _lock: Option<LockFile>,
}

impl RotatingFileSink {
    /// Open (or create) the log file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid, the directory or file
    /// cannot be created, or another sink already holds the file.
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        #[cfg(feature = "file")]
        let lock = LockFile::acquire(&base_path)?;

        let mut options = OpenOptions::new();
        options.create(true);
        if policy.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&base_path).map_err(|e| {
            LoggerError::file_appender(
                base_path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })?;

        let current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    base_path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            rotations: 0,
            closed: false,
            #[cfg(feature = "file")]
            _lock: Some(lock),
        })
    }

    /// Append one formatted line, rotating first if it would not fit
    ///
    /// The line is either written whole or not at all: when rotation fails
    /// the line is rejected with a rotation error and the current file keeps
    /// receiving later appends.
    pub fn append(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(LoggerError::writer(format!(
                "Sink for '{}' is closed",
                self.base_path.display()
            )));
        }

        let bytes = line.as_bytes();
        let incoming = bytes.len() as u64;
        if self.should_rotate(incoming) {
            self.rotate()?;
        }
        if self.writer.is_none() {
            self.reopen_current()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(bytes).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += incoming;

        if !self.policy.buffered {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    /// Flush, release the file handle and the lock. Later appends fail.
    pub fn close(&mut self) -> Result<()> {
        let flushed = self.flush();
        self.writer = None;
        self.closed = true;
        #[cfg(feature = "file")]
        {
            self._lock = None;
        }
        flushed
    }

    /// Switch between buffered and write-through mode
    pub fn set_buffered(&mut self, buffered: bool) -> Result<()> {
        self.policy.buffered = buffered;
        if !buffered {
            self.flush()?;
        }
        Ok(())
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        // An empty file always takes the line, even one larger than the limit.
        self.policy.max_bytes > 0
            && self.current_size > 0
            && self.current_size + incoming > self.policy.max_bytes
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }
        // The handle is released before renaming; Windows refuses to move open files.
        self.writer = None;

        if let Err(e) = self.shift_backups() {
            if let Err(reopen_err) = self.reopen_current() {
                eprintln!(
                    "[LOGGER ERROR] Failed to reopen '{}' after rotation failure: {}",
                    self.base_path.display(),
                    reopen_err
                );
            }
            return Err(e);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        self.rotations += 1;
        Ok(())
    }

    fn shift_backups(&self) -> Result<()> {
        let oldest = self.backup_path(self.policy.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest).map_err(|e| {
                LoggerError::file_rotation(
                    oldest.display().to_string(),
                    format!("Failed to remove oldest backup: {}", e),
                )
            })?;
        }

        for i in (1..self.policy.max_backups).rev() {
            let from = self.backup_path(i);
            if from.exists() {
                let to = self.backup_path(i + 1);
                fs::rename(&from, &to).map_err(|e| {
                    LoggerError::file_rotation(
                        from.display().to_string(),
                        format!("Failed to rotate backup files: {}", e),
                    )
                })?;
            }
        }

        if self.base_path.exists() {
            fs::rename(&self.base_path, self.backup_path(1)).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn reopen_current(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to reopen: {}", e),
                )
            })?;
        self.current_size = file.metadata().map(|m| m.len()).unwrap_or(self.current_size);
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Path of the `index`-th backup (`<path>.<index>`)
    #[must_use]
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.as_os_str().to_owned();
        path.push(format!(".{}", index));
        PathBuf::from(path)
    }

    /// Bytes written to the active file, including buffered ones
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Rotations performed since the sink was opened
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotations
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn line(i: usize) -> String {
        format!("[2025-01-08 10:30:45.123] [INFO] message number {:04}\n", i)
    }

    #[test]
    fn test_rotation_policy_defaults() {
        let policy = RotationPolicy::default();
        assert_eq!(policy.max_bytes, 6000);
        assert_eq!(policy.max_backups, 1);
        assert!(policy.buffered);
        assert!(policy.append);
    }

    #[test]
    fn test_rotation_policy_rejects_zero_backups() {
        let err = RotationPolicy::new().with_max_backups(0).validate().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.log");

        let sink = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        assert!(log_path.exists());
        assert_eq!(sink.path(), log_path);
        assert_eq!(sink.current_size(), 0);
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, "previous run\n").unwrap();

        let mut sink = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        sink.append("this run\n").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "previous run\nthis run\n");
    }

    #[test]
    fn test_open_truncates_when_configured() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, "previous run\n").unwrap();

        let policy = RotationPolicy::new().with_append(false);
        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        sink.append("this run\n").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "this run\n");
    }

    #[test]
    fn test_single_rotation_when_threshold_exceeded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let line_len = line(0).len() as u64;
        let policy = RotationPolicy::new().with_max_size(line_len * 10);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        for i in 0..10 {
            sink.append(&line(i)).unwrap();
        }
        assert_eq!(sink.rotation_count(), 0);

        sink.append(&line(10)).unwrap();
        sink.append(&line(11)).unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.rotation_count(), 1);
        let backup = fs::read_to_string(sink.backup_path(1)).unwrap();
        assert_eq!(backup.lines().count(), 10);
        assert!(backup.contains("message number 0009"));

        let active = fs::read_to_string(&log_path).unwrap();
        assert_eq!(active, format!("{}{}", line(10), line(11)));
    }

    #[test]
    fn test_backups_are_bounded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_size(200).with_max_backups(2);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        for i in 0..100 {
            sink.append(&line(i)).unwrap();
        }
        sink.close().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("multi.log"))
            .count();
        assert_eq!(log_files, 3);
        assert!(!dir.path().join("multi.log.3").exists());
    }

    #[test]
    fn test_total_size_stays_bounded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("bounded.log");
        let max = 300;
        let policy = RotationPolicy::new().with_max_size(max);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        for i in 0..200 {
            sink.append(&line(i)).unwrap();
        }
        sink.flush().unwrap();

        let active = fs::metadata(&log_path).unwrap().len();
        let backup = fs::metadata(sink.backup_path(1)).unwrap().len();
        assert!(active <= max);
        assert!(backup <= max);
        assert!(active + backup <= 2 * max + line(0).len() as u64);
    }

    #[test]
    fn test_oversized_line_goes_to_empty_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");
        let policy = RotationPolicy::new().with_max_size(16);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        sink.append(&"x".repeat(64)).unwrap();
        assert_eq!(sink.rotation_count(), 0);
        sink.append("next\n").unwrap();
        assert_eq!(sink.rotation_count(), 1);
    }

    #[test]
    fn test_zero_max_bytes_never_rotates() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("never.log");
        let policy = RotationPolicy::new().with_max_size(0);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        for i in 0..500 {
            sink.append(&line(i)).unwrap();
        }
        sink.flush().unwrap();
        assert_eq!(sink.rotation_count(), 0);
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_unbuffered_writes_are_visible_immediately() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("direct.log");
        let policy = RotationPolicy::new().with_buffered(false);

        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        sink.append("durable\n").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "durable\n");
    }

    #[test]
    fn test_buffered_writes_visible_after_flush() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("buffered.log");

        let mut sink = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        sink.append("held\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "held\n");
    }

    #[test]
    fn test_failed_rotation_rejects_line() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("stuck.log");
        // A non-empty directory where the backup should go cannot be removed.
        let blocker = dir.path().join("stuck.log.1");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let policy = RotationPolicy::new().with_max_size(40);
        let mut sink = RotatingFileSink::open(&log_path, policy).unwrap();
        sink.append("first line that fills the file\n").unwrap();

        let err = sink.append("second line\n").unwrap_err();
        assert!(matches!(err, LoggerError::FileRotationError { .. }));
        assert_eq!(sink.rotation_count(), 0);
        sink.flush().unwrap();
        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "first line that fills the file\n"
        );
    }

    #[test]
    fn test_append_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut sink =
            RotatingFileSink::open(dir.path().join("closed.log"), RotationPolicy::default())
                .unwrap();
        sink.close().unwrap();
        assert!(!sink.is_open());
        assert!(matches!(
            sink.append("late\n").unwrap_err(),
            LoggerError::WriterError(_)
        ));
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_second_sink_on_same_path_is_locked_out() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("locked.log");

        let mut first = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        let err = RotatingFileSink::open(&log_path, RotationPolicy::default())
            .err()
            .unwrap();
        assert!(matches!(err, LoggerError::FileLockError { .. }));

        first.close().unwrap();
        assert!(!dir.path().join("locked.log.lck").exists());
        assert!(RotatingFileSink::open(&log_path, RotationPolicy::default()).is_ok());
    }

    #[cfg(all(feature = "file", unix))]
    #[test]
    fn test_stale_lock_handle_does_not_block_next_owner() {
        use fs2::FileExt;

        let dir = tempdir().unwrap();
        let log_path = dir.path().join("handoff.log");
        let lock_path = dir.path().join("handoff.log.lck");

        let mut first = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        let stale = File::open(&lock_path).unwrap();
        assert!(stale.try_lock_exclusive().is_err());

        first.close().unwrap();
        assert!(!lock_path.exists());

        // A handle to the unlinked lock file may lock it, but that no longer
        // guards the log path.
        stale.try_lock_exclusive().unwrap();
        let mut second = RotatingFileSink::open(&log_path, RotationPolicy::default()).unwrap();
        assert!(lock_path.exists());
        second.close().unwrap();
    }
}
