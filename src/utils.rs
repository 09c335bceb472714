//! Marshaling helpers for data crossing the libnotmuch boundary
//!
//! Strings handed out by libnotmuch belong to the object that produced them,
//! so everything is copied into owned Rust values before returning.

use crate::error::{Error, Result, Status};
use chrono::{DateTime, TimeZone, Utc};
use libc::{c_char, time_t};
use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Copy a native string, `""` for NULL. Invalid UTF-8 is replaced.
///
/// # Safety
/// `ptr` must be NULL or point at a NUL-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// Copy a native file name byte for byte.
///
/// # Safety
/// Same contract as [`to_string`].
pub(crate) unsafe fn to_path(ptr: *const c_char) -> PathBuf {
    if ptr.is_null() {
        return PathBuf::new();
    }
    PathBuf::from(OsStr::from_bytes(CStr::from_ptr(ptr).to_bytes()))
}

/// Copy and release an error message allocated with malloc by libnotmuch.
///
/// # Safety
/// `ptr` must be NULL or a malloc'd NUL-terminated string owned by the caller.
pub(crate) unsafe fn take_error_message(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let message = to_string(ptr);
    libc::free(ptr.cast());
    Some(message)
}

pub(crate) fn str_to_cstring(s: &str) -> Result<CString> {
    Ok(CString::new(s)?)
}

pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

/// Seconds since the epoch as a UTC timestamp (the epoch itself if out of range)
pub(crate) fn timestamp(secs: time_t) -> DateTime<Utc> {
    Utc.timestamp_opt(secs as i64, 0)
        .single()
        .unwrap_or_default()
}

/// Error for a getter that returned NULL where an object was expected
pub(crate) fn null_result(operation: &'static str) -> Error {
    Error::Native {
        operation,
        status: Status::NullPointer,
    }
}
