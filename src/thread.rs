//! Threads and thread cursors

use crate::message::Messages;
use crate::tags::Tags;
use crate::utils;
use chrono::{DateTime, Utc};
use notmuch_sys as ffi;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Single-pass cursor over the threads matching a query
///
/// Yields `None` once exhausted, including when nothing matched.
#[derive(Debug)]
pub struct Threads<'q> {
    ptr: *mut ffi::notmuch_threads_t,
    done: bool,
    _query: PhantomData<&'q ()>,
}

impl Threads<'_> {
    /// # Safety
    /// `ptr` must be a live threads object owned by the borrowed query.
    pub(crate) unsafe fn from_raw(ptr: *mut ffi::notmuch_threads_t) -> Self {
        Self {
            ptr,
            done: false,
            _query: PhantomData,
        }
    }
}

impl<'q> Iterator for Threads<'q> {
    type Item = Thread<'q>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        unsafe {
            if ffi::notmuch_threads_valid(self.ptr) == ffi::FALSE {
                self.done = true;
                return None;
            }
            let thread = ffi::notmuch_threads_get(self.ptr);
            ffi::notmuch_threads_move_to_next(self.ptr);
            if thread.is_null() {
                tracing::warn!("Thread cursor returned no thread, stopping");
                self.done = true;
                return None;
            }
            Some(Thread::from_raw(thread))
        }
    }
}

impl FusedIterator for Threads<'_> {}

impl Drop for Threads<'_> {
    fn drop(&mut self) {
        unsafe { ffi::notmuch_threads_destroy(self.ptr) }
    }
}

/// Display names of a thread's authors, split by whether their messages matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authors {
    pub matched: Vec<String>,
    pub unmatched: Vec<String>,
}

impl Authors {
    /// Split libnotmuch's author string, `"A, B| C, D"`
    ///
    /// Names before the `|` belong to matched messages, names after it to the
    /// rest. Without a `|` every author matched.
    pub fn parse(authors: &str) -> Self {
        let (matched, unmatched) = match authors.split_once('|') {
            Some((matched, unmatched)) => (matched, unmatched),
            None => (authors, ""),
        };
        Self {
            matched: split_names(matched),
            unmatched: split_names(unmatched),
        }
    }

    /// All names, matched first
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.matched
            .iter()
            .chain(self.unmatched.iter())
            .map(String::as_str)
    }
}

fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// A conversation as grouped by libnotmuch
#[derive(Debug)]
pub struct Thread<'q> {
    ptr: *mut ffi::notmuch_thread_t,
    _query: PhantomData<&'q ()>,
}

impl Thread<'_> {
    unsafe fn from_raw(ptr: *mut ffi::notmuch_thread_t) -> Self {
        Self {
            ptr,
            _query: PhantomData,
        }
    }

    /// Opaque, stable thread id
    pub fn id(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_thread_get_thread_id(self.ptr)) }
    }

    /// Number of messages in the thread
    pub fn total_messages(&self) -> u32 {
        let count = unsafe { ffi::notmuch_thread_get_total_messages(self.ptr) };
        u32::try_from(count).unwrap_or(0)
    }

    /// Number of messages in the thread that matched the query
    pub fn matched_messages(&self) -> u32 {
        let count = unsafe { ffi::notmuch_thread_get_matched_messages(self.ptr) };
        u32::try_from(count).unwrap_or(0)
    }

    pub fn subject(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_thread_get_subject(self.ptr)) }
    }

    /// Authors in libnotmuch's order, matched and unmatched
    pub fn authors(&self) -> Authors {
        let authors = unsafe { utils::to_string(ffi::notmuch_thread_get_authors(self.ptr)) };
        Authors::parse(&authors)
    }

    pub fn oldest_date(&self) -> DateTime<Utc> {
        utils::timestamp(unsafe { ffi::notmuch_thread_get_oldest_date(self.ptr) })
    }

    pub fn newest_date(&self) -> DateTime<Utc> {
        utils::timestamp(unsafe { ffi::notmuch_thread_get_newest_date(self.ptr) })
    }

    /// Messages that start the thread (no parent within it)
    pub fn toplevel_messages(&self) -> Messages<'_> {
        unsafe { Messages::from_list(ffi::notmuch_thread_get_toplevel_messages(self.ptr)) }
    }

    /// Every message of the thread, flattened, oldest first
    pub fn messages(&self) -> Messages<'_> {
        unsafe { Messages::from_list(ffi::notmuch_thread_get_messages(self.ptr)) }
    }

    /// Union of the tags of the thread's messages
    pub fn tags(&self) -> Tags<'_> {
        unsafe { Tags::from_raw(ffi::notmuch_thread_get_tags(self.ptr)) }
    }
}

impl Drop for Thread<'_> {
    fn drop(&mut self) {
        unsafe { ffi::notmuch_thread_destroy(self.ptr) }
    }
}
