//! # Store Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). Two pipeline processes writing the same ledger file would
//! silently lose each other's payments, so the data directory is guarded
//! by an exclusive lock for the process lifetime.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

/// Default lock timeout for waiting operations.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum time a lock should be held before considering it stale.
pub const MAX_LOCK_AGE: Duration = Duration::from_secs(86400); // 24 hours

/// Errors from store locking
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),

    #[error("Ledger store already in use (pid {pid:?}, {path})", path = .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

/// Exclusive lock on the ledger data directory.
///
/// Acquired on service startup, released on drop (RAII).
///
/// # Example
///
/// ```ignore
/// let lock = StoreLock::acquire(Path::new("/var/lib/apura/ledger"))?;
/// // Lock is held until `lock` goes out of scope
/// ```
pub struct StoreLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
    /// PID of this process
    pid: u32,
}

impl StoreLock {
    /// Lock file name
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on the data directory.
    ///
    /// Retries with exponential backoff up to [`DEFAULT_LOCK_TIMEOUT`].
    /// Detects and cleans up stale locks from crashed processes.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another process holds the lock
    /// and the timeout expires.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let deadline = Instant::now() + DEFAULT_LOCK_TIMEOUT;
        let lock_path = data_dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(50);

        loop {
            // Check for stale lock before attempting acquisition
            if Self::is_lock_stale(&lock_path, MAX_LOCK_AGE) {
                let _ = std::fs::remove_file(&lock_path);
            }

            // Create or open lock file
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&lock_path)
                .map_err(LockError::CreateFailed)?;

            // Try to acquire exclusive lock (non-blocking)
            match file.try_lock_exclusive() {
                Ok(()) => {
                    // Success - write our PID to the lock file
                    let pid = std::process::id();
                    let mut locked_file = file;
                    writeln!(locked_file, "{}", pid).map_err(LockError::WriteFailed)?;
                    locked_file.sync_all().map_err(LockError::WriteFailed)?;

                    return Ok(Self {
                        file: locked_file,
                        path: lock_path,
                        pid,
                    });
                }
                Err(_) => {
                    // Try to read existing PID for better error message
                    let existing_pid = Self::read_existing_pid(&lock_path);

                    // Check if the process holding the lock is still running
                    if let Some(pid) = existing_pid {
                        if !is_process_running(pid) {
                            // Stale lock from crashed process - remove and retry immediately
                            drop(file);
                            let _ = std::fs::remove_file(&lock_path);
                            continue;
                        }
                    }

                    // Check timeout
                    if Instant::now() >= deadline {
                        return Err(LockError::AlreadyLocked {
                            pid: existing_pid,
                            path: lock_path,
                        });
                    }

                    // Retry with exponential backoff (capped at 500ms)
                    drop(file);
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(Duration::from_millis(500));
                }
            }
        }
    }

    /// Check if a lock file is stale based on modification time.
    fn is_lock_stale(lock_path: &Path, max_age: Duration) -> bool {
        lock_path
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.elapsed().ok())
            .map(|age| age > max_age)
            .unwrap_or(false)
    }

    /// Get the PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read PID from existing lock file (for error messages)
    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Release the flock; removing the file is best effort
        #[allow(clippy::incompatible_msrv)]
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Checks if a process with the given PID is still running.
///
/// Used to detect stale locks from crashed processes.
fn is_process_running(pid: u32) -> bool {
    #[cfg(unix)]
    {
        // Check if /proc/<pid> exists (Linux-specific but safer than libc)
        std::path::Path::new(&format!("/proc/{}", pid)).exists()
    }

    #[cfg(not(unix))]
    {
        // On Windows, assume process is running (conservative approach)
        let _ = pid;
        true
    }
}
