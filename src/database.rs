//! Database handle
//!
//! A [`Database`] owns one native `notmuch_database_t`. Queries, threads,
//! messages and tag lists borrow it, so none of them can outlive the handle,
//! and [`Database::close`] consumes the handle so it cannot be used (or closed)
//! again afterwards. Dropping a handle that was never closed closes it.

use crate::error::{Error, Result, Status};
use crate::locks::WriterLock;
use crate::message::Message;
use crate::query::Query;
use crate::tags::Tags;
use crate::utils;
use libc::{c_char, c_double, c_void};
use notmuch_sys as ffi;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;

/// Access mode for an opened database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    ReadOnly,
    ReadWrite,
}

impl Mode {
    fn as_raw(self) -> ffi::notmuch_database_mode_t {
        match self {
            Mode::ReadOnly => ffi::NOTMUCH_DATABASE_MODE_READ_ONLY,
            Mode::ReadWrite => ffi::NOTMUCH_DATABASE_MODE_READ_WRITE,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::ReadOnly => write!(f, "read_only"),
            Mode::ReadWrite => write!(f, "read_write"),
        }
    }
}

/// An open notmuch mail index
///
/// # Example
///
/// ```no_run
/// use notmuch::{Database, Mode};
///
/// let db = Database::open("/home/me/mail", Mode::ReadOnly)?;
/// let query = db.create_query("tag:inbox")?;
/// for thread in query.threads()? {
///     println!("{} {}", thread.id(), thread.subject());
/// }
/// db.close()?;
/// # Ok::<(), notmuch::Error>(())
/// ```
#[derive(Debug)]
pub struct Database {
    ptr: *mut ffi::notmuch_database_t,
    path: PathBuf,
    mode: Mode,
    // Declared last so the claim outlives the native close in Drop
    _writer: Option<WriterLock>,
}

impl Database {
    /// Open the database of the mail root at `path`
    ///
    /// Fails with [`Error::NotFound`] when the path cannot be resolved or holds
    /// no index, with
    /// [`Error::Locked`] when this process already holds a writable handle on
    /// the same database and `mode` is [`Mode::ReadWrite`].
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Self> {
        let requested = path.as_ref();
        // Any unresolvable path (missing, or a file used as a directory) has no index
        let path = match requested.canonicalize() {
            Ok(p) => p,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => return Err(e.into()),
            Err(_) => return Err(Error::NotFound(requested.to_path_buf())),
        };

        let writer = match mode {
            Mode::ReadWrite => Some(WriterLock::acquire(&path)?),
            Mode::ReadOnly => None,
        };

        let c_path = utils::path_to_cstring(&path)?;
        let mut db = ptr::null_mut();
        let mut error_message: *mut c_char = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_open_verbose(
                c_path.as_ptr(),
                mode.as_raw(),
                &mut db,
                &mut error_message,
            )
        });
        let message = unsafe { utils::take_error_message(error_message) };

        if !status.is_success() || db.is_null() {
            tracing::debug!(path = %path.display(), %status, ?message, "Failed to open database");
            return Err(match status {
                Status::FileError | Status::NoDatabase | Status::PathError => {
                    Error::NotFound(path)
                }
                Status::Success => Error::Open {
                    path,
                    status: Status::NullPointer,
                    message,
                },
                status => Error::Open {
                    path,
                    status,
                    message,
                },
            });
        }

        tracing::debug!(path = %path.display(), %mode, "Opened notmuch database");
        Ok(Self::from_raw(db, path, mode, writer))
    }

    /// Create a new, empty database for the mail root at `path`
    ///
    /// The directory must already exist. The returned handle is writable.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let requested = path.as_ref();
        let path = requested.canonicalize().map_err(|e| Error::Create {
            path: requested.to_path_buf(),
            status: Status::PathError,
            message: Some(e.to_string()),
        })?;

        let writer = WriterLock::acquire(&path)?;

        let c_path = utils::path_to_cstring(&path)?;
        let mut db = ptr::null_mut();
        let mut error_message: *mut c_char = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_create_verbose(c_path.as_ptr(), &mut db, &mut error_message)
        });
        let message = unsafe { utils::take_error_message(error_message) };

        if !status.is_success() || db.is_null() {
            tracing::debug!(path = %path.display(), %status, ?message, "Failed to create database");
            let status = if status.is_success() {
                Status::NullPointer
            } else {
                status
            };
            return Err(Error::Create {
                path,
                status,
                message,
            });
        }

        tracing::debug!(path = %path.display(), "Created notmuch database");
        Ok(Self::from_raw(db, path, Mode::ReadWrite, Some(writer)))
    }

    fn from_raw(
        db: *mut ffi::notmuch_database_t,
        requested: PathBuf,
        mode: Mode,
        writer: Option<WriterLock>,
    ) -> Self {
        let native = unsafe { utils::to_path(ffi::notmuch_database_get_path(db)) };
        let path = if native.as_os_str().is_empty() {
            requested
        } else {
            native
        };
        Self {
            ptr: db,
            path,
            mode,
            _writer: writer,
        }
    }

    /// Close the database and release the native handle
    ///
    /// Pending changes are flushed. Every handle derived from this database
    /// borrows it, so they are all gone by the time this can be called.
    pub fn close(mut self) -> Result<()> {
        let db = std::mem::replace(&mut self.ptr, ptr::null_mut());
        let status = Status::from_raw(unsafe { ffi::notmuch_database_destroy(db) });
        tracing::debug!(path = %self.path.display(), %status, "Closed notmuch database");
        status.check("close database")
    }

    pub(crate) fn as_ptr(&self) -> *mut ffi::notmuch_database_t {
        self.ptr
    }

    /// Absolute path of the mail root backing this database
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// On-disk format version, at least 1 for any valid index
    pub fn version(&self) -> u32 {
        unsafe { ffi::notmuch_database_get_version(self.ptr) }
    }

    /// Whether the on-disk format predates what libnotmuch expects
    pub fn needs_upgrade(&self) -> bool {
        unsafe { ffi::notmuch_database_needs_upgrade(self.ptr) != ffi::FALSE }
    }

    /// Upgrade the on-disk format; a no-op when none is needed
    ///
    /// Always fails with [`Error::ReadOnly`] on a read-only handle.
    pub fn upgrade(&self) -> Result<()> {
        self.require_writable()?;
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_upgrade(self.ptr, None, ptr::null_mut())
        });
        tracing::debug!(path = %self.path.display(), %status, "Upgraded database");
        status.check("upgrade database")
    }

    /// Like [`upgrade`](Self::upgrade), reporting progress in `0.0..=1.0`
    pub fn upgrade_with_progress<F>(&self, progress: F) -> Result<()>
    where
        F: FnMut(f64),
    {
        self.require_writable()?;

        let mut state = ProgressState {
            callback: progress,
            panic: None,
        };
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_upgrade(
                self.ptr,
                Some(progress_trampoline::<F>),
                (&mut state as *mut ProgressState<F>).cast(),
            )
        });
        if let Some(payload) = state.panic.take() {
            panic::resume_unwind(payload);
        }
        tracing::debug!(path = %self.path.display(), %status, "Upgraded database");
        status.check("upgrade database")
    }

    /// The native library's most recent diagnostic, `""` when there is none
    pub fn last_status(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_database_status_string(self.ptr)) }
    }

    /// Build a query; `query_string` is passed to libnotmuch untouched
    pub fn create_query(&self, query_string: &str) -> Result<Query<'_>> {
        Query::create(self, query_string)
    }

    /// Index the mail file at `path` (absolute, or relative to the mail root)
    ///
    /// Fails with [`Error::DuplicateMessage`] when the file's Message-ID is
    /// already indexed; libnotmuch still records `path` as another file name
    /// of the existing message in that case.
    pub fn add_message(&self, path: impl AsRef<Path>) -> Result<Message<'_>> {
        self.require_writable()?;
        let path = path.as_ref();
        let c_path = utils::path_to_cstring(path)?;
        let mut message = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_index_file(
                self.ptr,
                c_path.as_ptr(),
                ptr::null_mut(),
                &mut message,
            )
        });
        tracing::debug!(path = %path.display(), %status, "Indexed message file");

        match status {
            Status::Success if !message.is_null() => Ok(unsafe { Message::from_database(message) }),
            Status::DuplicateMessageId if !message.is_null() => {
                let existing = unsafe { Message::from_database(message) };
                Err(Error::DuplicateMessage {
                    path: path.to_path_buf(),
                    message_id: existing.id(),
                })
            }
            Status::ReadOnlyDatabase => Err(Error::ReadOnly),
            Status::Success | Status::DuplicateMessageId => Err(Error::AddMessage {
                path: path.to_path_buf(),
                status: Status::NullPointer,
            }),
            status => Err(Error::AddMessage {
                path: path.to_path_buf(),
                status,
            }),
        }
    }

    /// Drop the file at `path` from the index
    ///
    /// The message itself goes away once its last file name is removed. A
    /// path that is not indexed is a successful no-op. Nothing is retried.
    pub fn remove_message(&self, path: impl AsRef<Path>) -> Result<()> {
        self.require_writable()?;
        let path = path.as_ref();
        let c_path = utils::path_to_cstring(path)?;
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_remove_message(self.ptr, c_path.as_ptr())
        });
        tracing::debug!(path = %path.display(), %status, "Removed message file");

        match status {
            // Other files still carry the message
            Status::DuplicateMessageId => Ok(()),
            status => status.check("remove message"),
        }
    }

    /// Look a message up by its Message-ID (without angle brackets)
    pub fn find_message(&self, message_id: &str) -> Result<Option<Message<'_>>> {
        let c_id = utils::str_to_cstring(message_id)?;
        let mut message = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_find_message(self.ptr, c_id.as_ptr(), &mut message)
        });
        status.check("find message")?;
        Ok(unsafe { Message::from_database_opt(message) })
    }

    /// Look a message up by one of its file names
    pub fn find_message_by_filename(&self, path: impl AsRef<Path>) -> Result<Option<Message<'_>>> {
        let c_path = utils::path_to_cstring(path.as_ref())?;
        let mut message = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_database_find_message_by_filename(self.ptr, c_path.as_ptr(), &mut message)
        });
        status.check("find message by filename")?;
        Ok(unsafe { Message::from_database_opt(message) })
    }

    /// Every tag used anywhere in the database
    pub fn all_tags(&self) -> Result<Tags<'_>> {
        let tags = unsafe { ffi::notmuch_database_get_all_tags(self.ptr) };
        if tags.is_null() {
            return Err(utils::null_result("list all tags"));
        }
        Ok(unsafe { Tags::from_raw(tags) })
    }

    /// Start an atomic section; changes become visible together on commit
    pub fn begin_atomic(&self) -> Result<AtomicSection<'_>> {
        let status = Status::from_raw(unsafe { ffi::notmuch_database_begin_atomic(self.ptr) });
        status.check("begin atomic section")?;
        Ok(AtomicSection {
            db: self.ptr,
            active: true,
            _db: PhantomData,
        })
    }

    fn require_writable(&self) -> Result<()> {
        match self.mode {
            Mode::ReadWrite => Ok(()),
            Mode::ReadOnly => Err(Error::ReadOnly),
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        let status = Status::from_raw(unsafe { ffi::notmuch_database_destroy(self.ptr) });
        if !status.is_success() {
            tracing::warn!(
                path = %self.path.display(),
                %status,
                "Failed to close database on drop"
            );
        }
        self.ptr = ptr::null_mut();
    }
}

struct ProgressState<F> {
    callback: F,
    panic: Option<Box<dyn Any + Send>>,
}

extern "C" fn progress_trampoline<F: FnMut(f64)>(closure: *mut c_void, progress: c_double) {
    let state = unsafe { &mut *closure.cast::<ProgressState<F>>() };
    if state.panic.is_some() {
        return;
    }
    // Unwinding must not cross the C frames of the upgrade
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (state.callback)(progress))) {
        state.panic = Some(payload);
    }
}

/// Open atomic section on a database
///
/// Ends the section on drop; use [`commit`](Self::commit) to observe errors.
#[derive(Debug)]
pub struct AtomicSection<'db> {
    db: *mut ffi::notmuch_database_t,
    active: bool,
    _db: PhantomData<&'db Database>,
}

impl AtomicSection<'_> {
    pub fn commit(mut self) -> Result<()> {
        self.active = false;
        let status = Status::from_raw(unsafe { ffi::notmuch_database_end_atomic(self.db) });
        status.check("end atomic section")
    }
}

impl Drop for AtomicSection<'_> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        let status = Status::from_raw(unsafe { ffi::notmuch_database_end_atomic(self.db) });
        if !status.is_success() {
            tracing::warn!(%status, "Failed to end atomic section on drop");
        }
    }
}
