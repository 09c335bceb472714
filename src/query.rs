//! Queries against a database
//!
//! The query string is handed to libnotmuch verbatim; its grammar (free text,
//! `subject:`, `from:`, `tag:`, boolean operators, ...) is entirely the
//! native engine's business.

use crate::database::Database;
use crate::error::{Result, Status};
use crate::message::Messages;
use crate::thread::Threads;
use crate::utils;
use libc::c_uint;
use notmuch_sys as ffi;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ptr;

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    OldestFirst,
    /// libnotmuch's default
    #[default]
    NewestFirst,
    MessageId,
    Unsorted,
}

impl Sort {
    fn as_raw(self) -> ffi::notmuch_sort_t {
        match self {
            Sort::OldestFirst => ffi::NOTMUCH_SORT_OLDEST_FIRST,
            Sort::NewestFirst => ffi::NOTMUCH_SORT_NEWEST_FIRST,
            Sort::MessageId => ffi::NOTMUCH_SORT_MESSAGE_ID,
            Sort::Unsorted => ffi::NOTMUCH_SORT_UNSORTED,
        }
    }

    fn from_raw(raw: ffi::notmuch_sort_t) -> Self {
        match raw {
            ffi::NOTMUCH_SORT_OLDEST_FIRST => Sort::OldestFirst,
            ffi::NOTMUCH_SORT_MESSAGE_ID => Sort::MessageId,
            ffi::NOTMUCH_SORT_UNSORTED => Sort::Unsorted,
            _ => Sort::NewestFirst,
        }
    }
}

/// How messages carrying an excluded tag are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclude {
    /// Keep them, only flag them as excluded
    Flag,
    /// Omit them from results (libnotmuch's default)
    #[default]
    Omit,
    /// Keep them unflagged
    Include,
    /// Omit them, and omit threads made up only of them
    All,
}

impl Exclude {
    fn as_raw(self) -> ffi::notmuch_exclude_t {
        match self {
            Exclude::Flag => ffi::NOTMUCH_EXCLUDE_FLAG,
            Exclude::Omit => ffi::NOTMUCH_EXCLUDE_TRUE,
            Exclude::Include => ffi::NOTMUCH_EXCLUDE_FALSE,
            Exclude::All => ffi::NOTMUCH_EXCLUDE_ALL,
        }
    }
}

/// A search bound to a database
///
/// Running the same query twice against an unmodified database yields the
/// same items in the same order.
#[derive(Debug)]
pub struct Query<'db> {
    ptr: *mut ffi::notmuch_query_t,
    _db: PhantomData<&'db Database>,
}

impl<'db> Query<'db> {
    pub(crate) fn create(db: &'db Database, query_string: &str) -> Result<Self> {
        let c_query = utils::str_to_cstring(query_string)?;
        let ptr = unsafe { ffi::notmuch_query_create(db.as_ptr(), c_query.as_ptr()) };
        if ptr.is_null() {
            return Err(utils::null_result("create query"));
        }
        tracing::debug!(query = query_string, "Created query");
        Ok(Self {
            ptr,
            _db: PhantomData,
        })
    }

    pub fn query_string(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_query_get_query_string(self.ptr)) }
    }

    pub fn sort(&self) -> Sort {
        Sort::from_raw(unsafe { ffi::notmuch_query_get_sort(self.ptr) })
    }

    pub fn set_sort(&mut self, sort: Sort) {
        unsafe { ffi::notmuch_query_set_sort(self.ptr, sort.as_raw()) }
    }

    pub fn set_omit_excluded(&mut self, exclude: Exclude) {
        unsafe { ffi::notmuch_query_set_omit_excluded(self.ptr, exclude.as_raw()) }
    }

    /// Exclude messages tagged `tag`
    ///
    /// Ignored by libnotmuch when the query string names the tag explicitly.
    pub fn add_tag_exclude(&mut self, tag: &str) -> Result<()> {
        let c_tag = utils::str_to_cstring(tag)?;
        let status = Status::from_raw(unsafe {
            ffi::notmuch_query_add_tag_exclude(self.ptr, c_tag.as_ptr())
        });
        match status {
            Status::Ignored => {
                tracing::debug!(tag, "Tag exclusion ignored, tag is part of the query");
                Ok(())
            }
            status => status.check("add tag exclude"),
        }
    }

    /// Matching threads, lazily, in this query's sort order
    pub fn threads(&self) -> Result<Threads<'_>> {
        let mut threads = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_query_search_threads(self.ptr, &mut threads)
        });
        status.check("search threads")?;
        if threads.is_null() {
            return Err(utils::null_result("search threads"));
        }
        Ok(unsafe { Threads::from_raw(threads) })
    }

    /// Matching messages, lazily, not grouped by thread
    pub fn messages(&self) -> Result<Messages<'_>> {
        let mut messages = ptr::null_mut();
        let status = Status::from_raw(unsafe {
            ffi::notmuch_query_search_messages(self.ptr, &mut messages)
        });
        status.check("search messages")?;
        if messages.is_null() {
            return Err(utils::null_result("search messages"));
        }
        Ok(unsafe { Messages::from_search(messages) })
    }

    pub fn count_messages(&self) -> Result<u32> {
        let mut count: c_uint = 0;
        let status = Status::from_raw(unsafe {
            ffi::notmuch_query_count_messages(self.ptr, &mut count)
        });
        status.check("count messages")?;
        Ok(count)
    }

    pub fn count_threads(&self) -> Result<u32> {
        let mut count: c_uint = 0;
        let status = Status::from_raw(unsafe {
            ffi::notmuch_query_count_threads(self.ptr, &mut count)
        });
        status.check("count threads")?;
        Ok(count)
    }
}

impl Drop for Query<'_> {
    fn drop(&mut self) {
        unsafe { ffi::notmuch_query_destroy(self.ptr) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_raw_round_trip() {
        for sort in [Sort::OldestFirst, Sort::NewestFirst, Sort::MessageId, Sort::Unsorted] {
            assert_eq!(Sort::from_raw(sort.as_raw()), sort);
        }
    }

    #[test]
    fn test_defaults_match_native() {
        assert_eq!(Sort::default().as_raw(), ffi::NOTMUCH_SORT_NEWEST_FIRST);
        assert_eq!(Exclude::default().as_raw(), ffi::NOTMUCH_EXCLUDE_TRUE);
    }

    #[test]
    fn test_exclude_raw_values() {
        assert_eq!(Exclude::Flag.as_raw(), 0);
        assert_eq!(Exclude::Include.as_raw(), 2);
        assert_eq!(Exclude::All.as_raw(), 3);
    }

    #[test]
    fn test_sort_serde() {
        let sort: Sort = serde_yaml::from_str("oldest_first").unwrap();
        assert_eq!(sort, Sort::OldestFirst);
        assert_eq!(
            serde_yaml::to_string(&Sort::MessageId).unwrap().trim(),
            "message_id"
        );
    }

    #[test]
    fn test_exclude_serde() {
        let exclude: Exclude = serde_yaml::from_str("include").unwrap();
        assert_eq!(exclude, Exclude::Include);
        assert_eq!(serde_yaml::to_string(&Exclude::Omit).unwrap().trim(), "omit");
    }
}
