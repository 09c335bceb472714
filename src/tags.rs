//! Tag cursors

use crate::utils;
use notmuch_sys as ffi;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Single-pass cursor over the tags of a database, thread or message
///
/// Tags come out in libnotmuch's order as owned strings. A NULL list (the
/// owner failed to produce one) behaves as an empty cursor.
#[derive(Debug)]
pub struct Tags<'a> {
    ptr: *mut ffi::notmuch_tags_t,
    _owner: PhantomData<&'a ()>,
}

impl Tags<'_> {
    /// # Safety
    /// `ptr` must be NULL or a tags object whose owner outlives `'a`.
    pub(crate) unsafe fn from_raw(ptr: *mut ffi::notmuch_tags_t) -> Self {
        Self {
            ptr,
            _owner: PhantomData,
        }
    }

    /// Drain the remaining tags, preserving their order
    pub fn into_vec(self) -> Vec<String> {
        self.collect()
    }
}

impl Iterator for Tags<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ptr.is_null() {
            return None;
        }
        unsafe {
            if ffi::notmuch_tags_valid(self.ptr) == ffi::FALSE {
                return None;
            }
            let tag = utils::to_string(ffi::notmuch_tags_get(self.ptr));
            ffi::notmuch_tags_move_to_next(self.ptr);
            Some(tag)
        }
    }
}

impl FusedIterator for Tags<'_> {}

impl Drop for Tags<'_> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { ffi::notmuch_tags_destroy(self.ptr) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_null_tags_are_empty() {
        let mut tags = unsafe { Tags::from_raw(ptr::null_mut()) };
        assert_eq!(tags.next(), None);
        assert_eq!(tags.next(), None);
    }

    #[test]
    fn test_null_tags_into_vec() {
        let tags = unsafe { Tags::from_raw(ptr::null_mut()) };
        assert!(tags.into_vec().is_empty());
    }
}
