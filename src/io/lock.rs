use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory write lock over a deck/ directory.
///
/// CLI invocations and the TUI serialize their saves through an exclusive
/// flock on deck/.lock. On acquire the holder writes its pid into the
/// file, so a process that gives up waiting can report who is in the way.
/// The file itself is never removed: the flock dies with the holding
/// process anyway, and unlinking a locked file would let a third process
/// lock a fresh inode while the old one is still held.
#[derive(Debug)]
pub struct DeckLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("deck is locked by {holder} ({path})")]
    Busy { path: PathBuf, holder: String },
    #[error("lock error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeckLock {
    /// Acquire the write lock, waiting up to `timeout` with backing-off
    /// retries. The lock is released when the returned guard drops.
    pub fn acquire(deck_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = deck_dir.join(".lock");
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::Create {
                path: lock_path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + timeout;
        let mut backoff = Duration::from_millis(5);
        loop {
            if try_lock(&file).is_ok() {
                // Lock held: record this process for contenders to report
                file.set_len(0)?;
                file.seek(SeekFrom::Start(0))?;
                writeln!(file, "pid {}", std::process::id())?;
                file.flush()?;
                return Ok(DeckLock { _file: file });
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Busy {
                    holder: read_holder(&mut file),
                    path: lock_path,
                });
            }
            std::thread::sleep(backoff.min(deadline - now));
            backoff = (backoff * 2).min(Duration::from_millis(100));
        }
    }

    /// Acquire with the default timeout (5 seconds)
    pub fn acquire_default(deck_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(deck_dir, Duration::from_secs(5))
    }
}

/// Whatever the current holder wrote on acquire, for the Busy error
fn read_holder(file: &mut File) -> String {
    let mut text = String::new();
    if file.seek(SeekFrom::Start(0)).is_ok() && file.read_to_string(&mut text).is_ok() {
        let line = text.lines().next().unwrap_or("").trim();
        if !line.is_empty() {
            return line.to_string();
        }
    }
    "another taskdeck process".to_string()
}

/// Try to take an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    // Advisory only on non-Unix platforms
    Ok(())
}
