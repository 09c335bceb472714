//! Process-wide registry of writable database handles
//!
//! libnotmuch is not safe for concurrent mutation of one database. Xapian's
//! own write lock catches writers in other processes; this registry rejects a
//! second read-write handle on the same canonical path inside this process
//! before the native library is even asked. Read-only handles never register.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

lazy_static! {
    static ref WRITERS: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());
}

fn writers() -> MutexGuard<'static, HashSet<PathBuf>> {
    // The set stays consistent even if a holder panicked
    WRITERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exclusive claim on a database path, released on drop
#[derive(Debug)]
pub(crate) struct WriterLock {
    path: PathBuf,
}

impl WriterLock {
    /// Claim `path` (already canonical) for writing
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let mut writers = writers();
        if !writers.insert(path.to_path_buf()) {
            tracing::debug!(path = %path.display(), "Write claim denied");
            return Err(Error::Locked(path.to_path_buf()));
        }
        tracing::trace!(path = %path.display(), "Write claim acquired");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub(crate) fn is_held(path: &Path) -> bool {
        writers().contains(path)
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        writers().remove(&self.path);
        tracing::trace!(path = %self.path.display(), "Write claim released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let path = Path::new("/locks-test/acquire-release");
        {
            let _lock = WriterLock::acquire(path).unwrap();
            assert!(WriterLock::is_held(path));
        }
        assert!(!WriterLock::is_held(path));
    }

    #[test]
    fn test_second_writer_denied() {
        let path = Path::new("/locks-test/second-writer");
        let _first = WriterLock::acquire(path).unwrap();

        match WriterLock::acquire(path) {
            Err(Error::Locked(locked)) => assert_eq!(locked, path),
            other => panic!("expected Locked, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_paths_independent() {
        let _a = WriterLock::acquire(Path::new("/locks-test/a")).unwrap();
        let _b = WriterLock::acquire(Path::new("/locks-test/b")).unwrap();
    }

    #[test]
    fn test_reacquire_after_drop() {
        let path = Path::new("/locks-test/reacquire");
        drop(WriterLock::acquire(path).unwrap());
        assert!(WriterLock::acquire(path).is_ok());
    }
}
