//! Messages and message cursors
//!
//! libnotmuch hands out messages with two ownership shapes:
//!
//! - query results, lookups and freshly indexed files: each message is a new
//!   native object the caller may release early. Query results are children
//!   of their cursor, so every such message keeps the cursor alive.
//! - thread and reply lists: the messages belong to the thread and must never
//!   be released on their own.

use crate::error::{Result, Status};
use crate::tags::Tags;
use crate::utils;
use chrono::{DateTime, Utc};
use notmuch_sys as ffi;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::rc::Rc;

/// Owned native messages cursor
#[derive(Debug)]
struct Cursor(*mut ffi::notmuch_messages_t);

impl Drop for Cursor {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { ffi::notmuch_messages_destroy(self.0) }
        }
    }
}

/// Single-pass cursor over messages
///
/// Yields `None` once exhausted, including when there was nothing to yield.
#[derive(Debug)]
pub struct Messages<'a> {
    cursor: Rc<Cursor>,
    owns_items: bool,
    done: bool,
    _owner: PhantomData<&'a ()>,
}

impl Messages<'_> {
    /// # Safety
    /// `ptr` must come from a query search on a query outliving `'a`.
    pub(crate) unsafe fn from_search(ptr: *mut ffi::notmuch_messages_t) -> Self {
        Self {
            cursor: Rc::new(Cursor(ptr)),
            owns_items: true,
            done: false,
            _owner: PhantomData,
        }
    }

    /// # Safety
    /// `ptr` must be NULL or a thread/reply list whose owner outlives `'a`.
    pub(crate) unsafe fn from_list(ptr: *mut ffi::notmuch_messages_t) -> Self {
        Self {
            cursor: Rc::new(Cursor(ptr)),
            owns_items: false,
            done: false,
            _owner: PhantomData,
        }
    }

    /// Union of the tags of the messages not yet visited
    ///
    /// Consumes the cursor: libnotmuch walks it to the end.
    pub fn collect_tags(self) -> Vec<String> {
        if self.cursor.0.is_null() {
            return Vec::new();
        }
        unsafe { Tags::from_raw(ffi::notmuch_messages_collect_tags(self.cursor.0)) }.into_vec()
    }
}

impl<'a> Iterator for Messages<'a> {
    type Item = Message<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let ptr = self.cursor.0;
        if self.done || ptr.is_null() {
            return None;
        }
        unsafe {
            if ffi::notmuch_messages_valid(ptr) == ffi::FALSE {
                self.done = true;
                return None;
            }
            let message = ffi::notmuch_messages_get(ptr);
            ffi::notmuch_messages_move_to_next(ptr);
            if message.is_null() {
                tracing::warn!("Message cursor returned no message, stopping");
                self.done = true;
                return None;
            }
            Some(if self.owns_items {
                Message::from_raw(message, true, Some(Rc::clone(&self.cursor)))
            } else {
                Message::from_raw(message, false, None)
            })
        }
    }
}

impl FusedIterator for Messages<'_> {}

/// A single indexed mail
#[derive(Debug)]
pub struct Message<'a> {
    ptr: *mut ffi::notmuch_message_t,
    /// False for messages owned by a thread
    release: bool,
    // Query results are children of their cursor
    _cursor: Option<Rc<Cursor>>,
    _owner: PhantomData<&'a ()>,
}

impl Message<'_> {
    unsafe fn from_raw(
        ptr: *mut ffi::notmuch_message_t,
        release: bool,
        cursor: Option<Rc<Cursor>>,
    ) -> Self {
        Self {
            ptr,
            release,
            _cursor: cursor,
            _owner: PhantomData,
        }
    }

    /// # Safety
    /// `ptr` must be a message returned to the caller by a database call.
    pub(crate) unsafe fn from_database(ptr: *mut ffi::notmuch_message_t) -> Self {
        Self::from_raw(ptr, true, None)
    }

    /// # Safety
    /// Same contract as [`from_database`](Self::from_database); NULL is `None`.
    pub(crate) unsafe fn from_database_opt(ptr: *mut ffi::notmuch_message_t) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self::from_database(ptr))
        }
    }

    /// Message-ID without angle brackets
    pub fn id(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_message_get_message_id(self.ptr)) }
    }

    /// Id of the thread this message belongs to
    pub fn thread_id(&self) -> String {
        unsafe { utils::to_string(ffi::notmuch_message_get_thread_id(self.ptr)) }
    }

    /// Absolute path of one file holding this message
    pub fn filename(&self) -> PathBuf {
        unsafe { utils::to_path(ffi::notmuch_message_get_filename(self.ptr)) }
    }

    /// Every file holding this message (duplicates share a Message-ID)
    pub fn filenames(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        unsafe {
            let filenames = ffi::notmuch_message_get_filenames(self.ptr);
            if filenames.is_null() {
                return paths;
            }
            while ffi::notmuch_filenames_valid(filenames) != ffi::FALSE {
                paths.push(utils::to_path(ffi::notmuch_filenames_get(filenames)));
                ffi::notmuch_filenames_move_to_next(filenames);
            }
            ffi::notmuch_filenames_destroy(filenames);
        }
        paths
    }

    /// Date from the message's Date header
    pub fn date(&self) -> DateTime<Utc> {
        utils::timestamp(unsafe { ffi::notmuch_message_get_date(self.ptr) })
    }

    /// Decoded value of header `name` (case-insensitive), `None` if absent
    ///
    /// Structured headers such as addresses are returned as text.
    pub fn header(&self, name: &str) -> Result<Option<String>> {
        let c_name = utils::str_to_cstring(name)?;
        let value = unsafe { ffi::notmuch_message_get_header(self.ptr, c_name.as_ptr()) };
        if value.is_null() {
            return Err(utils::null_result("read header"));
        }
        let value = unsafe { utils::to_string(value) };
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    pub fn tags(&self) -> Tags<'_> {
        unsafe { Tags::from_raw(ffi::notmuch_message_get_tags(self.ptr)) }
    }

    /// Direct replies to this message
    ///
    /// Only populated for messages reached through a thread; empty otherwise.
    pub fn replies(&self) -> Messages<'_> {
        unsafe { Messages::from_list(ffi::notmuch_message_get_replies(self.ptr)) }
    }

    pub fn add_tag(&self, tag: &str) -> Result<()> {
        let c_tag = utils::str_to_cstring(tag)?;
        Status::from_raw(unsafe { ffi::notmuch_message_add_tag(self.ptr, c_tag.as_ptr()) })
            .check("add tag")
    }

    pub fn remove_tag(&self, tag: &str) -> Result<()> {
        let c_tag = utils::str_to_cstring(tag)?;
        Status::from_raw(unsafe { ffi::notmuch_message_remove_tag(self.ptr, c_tag.as_ptr()) })
            .check("remove tag")
    }

    pub fn remove_all_tags(&self) -> Result<()> {
        Status::from_raw(unsafe { ffi::notmuch_message_remove_all_tags(self.ptr) })
            .check("remove all tags")
    }

    /// Rename the message's files so their maildir flags reflect its tags
    pub fn tags_to_maildir_flags(&self) -> Result<()> {
        Status::from_raw(unsafe { ffi::notmuch_message_tags_to_maildir_flags(self.ptr) })
            .check("sync tags to maildir flags")
    }

    /// Set tags from the maildir flags of the message's files
    pub fn maildir_flags_to_tags(&self) -> Result<()> {
        Status::from_raw(unsafe { ffi::notmuch_message_maildir_flags_to_tags(self.ptr) })
            .check("sync maildir flags to tags")
    }

    /// Hold back tag changes until the returned guard is thawed or dropped
    ///
    /// Lets a tag set be replaced (remove all, then add) without the
    /// database ever seeing the message untagged.
    pub fn freeze(&self) -> Result<FrozenMessage<'_>> {
        Status::from_raw(unsafe { ffi::notmuch_message_freeze(self.ptr) }).check("freeze message")?;
        Ok(FrozenMessage {
            ptr: self.ptr,
            thawed: false,
            _message: PhantomData,
        })
    }
}

impl Drop for Message<'_> {
    fn drop(&mut self) {
        if self.release {
            unsafe { ffi::notmuch_message_destroy(self.ptr) }
        }
    }
}

/// Frozen tag state of a message, see [`Message::freeze`]
#[derive(Debug)]
pub struct FrozenMessage<'m> {
    ptr: *mut ffi::notmuch_message_t,
    thawed: bool,
    _message: PhantomData<&'m ()>,
}

impl FrozenMessage<'_> {
    /// Write the pending tag changes
    pub fn thaw(mut self) -> Result<()> {
        self.thawed = true;
        Status::from_raw(unsafe { ffi::notmuch_message_thaw(self.ptr) }).check("thaw message")
    }
}

impl Drop for FrozenMessage<'_> {
    fn drop(&mut self) {
        if self.thawed {
            return;
        }
        let status = Status::from_raw(unsafe { ffi::notmuch_message_thaw(self.ptr) });
        if !status.is_success() {
            tracing::warn!(%status, "Failed to thaw message on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_null_list_is_empty() {
        let mut messages = unsafe { Messages::from_list(ptr::null_mut()) };
        assert!(messages.next().is_none());
        assert!(messages.next().is_none());
    }

    #[test]
    fn test_null_list_collects_no_tags() {
        let messages = unsafe { Messages::from_list(ptr::null_mut()) };
        assert!(messages.collect_tags().is_empty());
    }

    #[test]
    fn test_stopped_cursor_stays_exhausted() {
        // Never dereferenced: a stopped cursor must not touch the native side
        let mut messages = Messages {
            cursor: Rc::new(Cursor(ptr::NonNull::dangling().as_ptr())),
            owns_items: true,
            done: true,
            _owner: PhantomData,
        };
        assert!(messages.next().is_none());
        assert!(messages.next().is_none());
        std::mem::forget(messages);
    }
}
