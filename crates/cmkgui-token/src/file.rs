//! Locked file primitive backing the token store.
//!
//! - Writers take an exclusive `flock(2)` on a companion `<file>.lock`.
//! - Lock acquisition polls with `LOCK_NB` and gives up after the configured timeout.
//! - The document is replaced atomically (temp file + rename), so readers that
//!   skip the lock see either the old or the new content, never a partial write.
//!
//! The lock lives on a companion file because a rename swaps the inode of the
//! data file; a lock taken on the old inode would not exclude the next writer.

use crate::error::TokenError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A file holding one serialized document, with cross-process write locking.
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl StoreFile {
    /// Create a handle for `path`. Nothing is touched on disk until first use.
    pub fn new(path: impl Into<PathBuf>, lock_timeout: Duration) -> Self {
        let path = path.into();
        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        Self {
            path,
            lock_path: PathBuf::from(lock_path),
            lock_timeout,
        }
    }

    /// Path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the companion lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Read the whole document. Returns `None` if the file does not exist.
    pub fn read(&self) -> Result<Option<Vec<u8>>, TokenError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the document. The caller proves it holds the lock by passing the guard.
    pub fn write(&self, _lock: &FileLock, data: &[u8]) -> Result<(), TokenError> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent)?;

        let temp = tempfile::NamedTempFile::new_in(parent)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o660);
            if let Err(e) = fs::set_permissions(temp.path(), perms) {
                tracing::warn!(path = %temp.path().display(), error = %e, "failed to set token file permissions");
            }
        }

        let mut file = temp.as_file();
        file.write_all(data)?;
        file.sync_all()?;

        temp.persist(&self.path).map_err(|e| TokenError::IoError(e.error))?;
        Ok(())
    }

    /// Acquire the exclusive lock, waiting at most the configured timeout.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn locked(&self) -> Result<FileLock, TokenError> {
        fs::create_dir_all(self.parent_dir())?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;

        let started = Instant::now();
        loop {
            if try_flock_exclusive(&file)? {
                return Ok(FileLock { file });
            }

            let waited = started.elapsed();
            if waited >= self.lock_timeout {
                return Err(TokenError::LockTimeout {
                    path: self.lock_path.clone(),
                    waited,
                });
            }
            thread::sleep(LOCK_POLL_INTERVAL.min(self.lock_timeout - waited));
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Guard for the exclusive lock of a [`StoreFile`].
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        unlock(&self.file);
    }
}

/// Try to acquire an exclusive flock on a file (non-blocking).
///
/// Returns `Ok(true)` if the lock was acquired, `Ok(false)` if the file is
/// already locked by another process or descriptor. Platforms without
/// `flock(2)` get `ErrorKind::Unsupported`.
fn try_flock_exclusive(file: &File) -> io::Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let fd = file.as_raw_fd();
        // SAFETY: flock is a standard POSIX call. fd is a valid file descriptor
        // owned by `file`. LOCK_EX | LOCK_NB is a non-blocking exclusive lock.
        let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
        if result == 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(libc::EWOULDBLOCK)
        {
            return Ok(false);
        }
        Err(err)
    }
    #[cfg(not(unix))]
    {
        let _ = file;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "exclusive file locking requires flock(2)",
        ))
    }
}

fn unlock(file: &File) {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        // SAFETY: fd is valid for the lifetime of `file`; LOCK_UN never blocks.
        unsafe {
            libc::flock(file.as_raw_fd(), libc::LOCK_UN);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = file;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = StoreFile::new(dir.path().join("token.store"), Duration::from_secs(1));
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let file = StoreFile::new(dir.path().join("web/token.store"), Duration::from_secs(1));

        let lock = file.locked().unwrap();
        file.write(&lock, b"{}").unwrap();
        drop(lock);

        assert_eq!(file.read().unwrap().as_deref(), Some(&b"{}"[..]));
        assert!(file.lock_path().ends_with("token.store.lock"));
    }

    #[test]
    fn test_second_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let file = StoreFile::new(dir.path().join("token.store"), Duration::from_millis(100));

        let _held = file.locked().unwrap();
        let err = file.locked().unwrap_err();
        assert!(matches!(err, TokenError::LockTimeout { .. }));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let file = StoreFile::new(dir.path().join("token.store"), Duration::from_millis(100));

        drop(file.locked().unwrap());
        assert!(file.locked().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_flock_excludes_other_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.store.lock");
        let first = File::create(&path).unwrap();
        let second = OpenOptions::new().write(true).open(&path).unwrap();

        assert!(try_flock_exclusive(&first).unwrap());
        assert!(!try_flock_exclusive(&second).unwrap());
        unlock(&first);
        assert!(try_flock_exclusive(&second).unwrap());
    }

    #[cfg(not(unix))]
    #[test]
    fn test_lock_unsupported_without_flock() {
        let dir = TempDir::new().unwrap();
        let file = StoreFile::new(dir.path().join("token.store"), Duration::from_millis(100));

        let err = file.locked().unwrap_err();
        assert!(matches!(err, TokenError::IoError(ref e) if e.kind() == io::ErrorKind::Unsupported));
    }
}
