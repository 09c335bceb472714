//! Raw bindings to libnotmuch
//!
//! Declarations mirror `notmuch.h` for libnotmuch 5.1 and newer. Everything in
//! here is `unsafe` and carries the native library's ownership rules: objects
//! are talloc-allocated and released together with their parent, strings
//! returned by getters belong to the object that produced them.
//!
//! The safe API lives in the `notmuch` crate; this crate contains no logic.

#![allow(non_camel_case_types)]

use libc::{c_char, c_double, c_int, c_uint, c_void, time_t};

/// Opaque native types. Only ever handled behind raw pointers.
macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque!(
    notmuch_database_t,
    notmuch_query_t,
    notmuch_threads_t,
    notmuch_thread_t,
    notmuch_messages_t,
    notmuch_message_t,
    notmuch_tags_t,
    notmuch_filenames_t,
    notmuch_indexopts_t,
);

pub type notmuch_bool_t = c_int;

pub const FALSE: notmuch_bool_t = 0;
pub const TRUE: notmuch_bool_t = 1;

// --- notmuch_status_t ---

pub type notmuch_status_t = c_int;

pub const NOTMUCH_STATUS_SUCCESS: notmuch_status_t = 0;
pub const NOTMUCH_STATUS_OUT_OF_MEMORY: notmuch_status_t = 1;
pub const NOTMUCH_STATUS_READ_ONLY_DATABASE: notmuch_status_t = 2;
pub const NOTMUCH_STATUS_XAPIAN_EXCEPTION: notmuch_status_t = 3;
pub const NOTMUCH_STATUS_FILE_ERROR: notmuch_status_t = 4;
pub const NOTMUCH_STATUS_FILE_NOT_EMAIL: notmuch_status_t = 5;
pub const NOTMUCH_STATUS_DUPLICATE_MESSAGE_ID: notmuch_status_t = 6;
pub const NOTMUCH_STATUS_NULL_POINTER: notmuch_status_t = 7;
pub const NOTMUCH_STATUS_TAG_TOO_LONG: notmuch_status_t = 8;
pub const NOTMUCH_STATUS_UNBALANCED_FREEZE_THAW: notmuch_status_t = 9;
pub const NOTMUCH_STATUS_UNBALANCED_ATOMIC: notmuch_status_t = 10;
pub const NOTMUCH_STATUS_UNSUPPORTED_OPERATION: notmuch_status_t = 11;
pub const NOTMUCH_STATUS_UPGRADE_REQUIRED: notmuch_status_t = 12;
pub const NOTMUCH_STATUS_PATH_ERROR: notmuch_status_t = 13;
pub const NOTMUCH_STATUS_IGNORED: notmuch_status_t = 14;
pub const NOTMUCH_STATUS_ILLEGAL_ARGUMENT: notmuch_status_t = 15;
pub const NOTMUCH_STATUS_MALFORMED_CRYPTO_PROTOCOL: notmuch_status_t = 16;
pub const NOTMUCH_STATUS_FAILED_CRYPTO_CONTEXT_CREATION: notmuch_status_t = 17;
pub const NOTMUCH_STATUS_UNKNOWN_CRYPTO_PROTOCOL: notmuch_status_t = 18;
pub const NOTMUCH_STATUS_NO_CONFIG: notmuch_status_t = 19;
pub const NOTMUCH_STATUS_NO_DATABASE: notmuch_status_t = 20;
pub const NOTMUCH_STATUS_DATABASE_EXISTS: notmuch_status_t = 21;
pub const NOTMUCH_STATUS_BAD_QUERY_SYNTAX: notmuch_status_t = 22;
pub const NOTMUCH_STATUS_NO_MAIL_ROOT: notmuch_status_t = 23;
pub const NOTMUCH_STATUS_CLOSED_DATABASE: notmuch_status_t = 24;

// --- notmuch_database_mode_t ---

pub type notmuch_database_mode_t = c_int;

pub const NOTMUCH_DATABASE_MODE_READ_ONLY: notmuch_database_mode_t = 0;
pub const NOTMUCH_DATABASE_MODE_READ_WRITE: notmuch_database_mode_t = 1;

// --- notmuch_sort_t ---

pub type notmuch_sort_t = c_int;

pub const NOTMUCH_SORT_OLDEST_FIRST: notmuch_sort_t = 0;
pub const NOTMUCH_SORT_NEWEST_FIRST: notmuch_sort_t = 1;
pub const NOTMUCH_SORT_MESSAGE_ID: notmuch_sort_t = 2;
pub const NOTMUCH_SORT_UNSORTED: notmuch_sort_t = 3;

// --- notmuch_exclude_t ---

pub type notmuch_exclude_t = c_int;

pub const NOTMUCH_EXCLUDE_FLAG: notmuch_exclude_t = 0;
pub const NOTMUCH_EXCLUDE_TRUE: notmuch_exclude_t = 1;
pub const NOTMUCH_EXCLUDE_FALSE: notmuch_exclude_t = 2;
pub const NOTMUCH_EXCLUDE_ALL: notmuch_exclude_t = 3;

/// Progress callback handed to `notmuch_database_upgrade`.
pub type notmuch_progress_notify_t =
    Option<extern "C" fn(closure: *mut c_void, progress: c_double)>;

#[link(name = "notmuch")]
extern "C" {
    pub fn notmuch_status_to_string(status: notmuch_status_t) -> *const c_char;

    // --- database ---

    pub fn notmuch_database_create_verbose(
        path: *const c_char,
        database: *mut *mut notmuch_database_t,
        error_message: *mut *mut c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_database_open_verbose(
        path: *const c_char,
        mode: notmuch_database_mode_t,
        database: *mut *mut notmuch_database_t,
        error_message: *mut *mut c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_database_status_string(database: *const notmuch_database_t) -> *const c_char;

    pub fn notmuch_database_close(database: *mut notmuch_database_t) -> notmuch_status_t;

    pub fn notmuch_database_destroy(database: *mut notmuch_database_t) -> notmuch_status_t;

    pub fn notmuch_database_get_path(database: *mut notmuch_database_t) -> *const c_char;

    pub fn notmuch_database_get_version(database: *mut notmuch_database_t) -> c_uint;

    pub fn notmuch_database_needs_upgrade(database: *mut notmuch_database_t) -> notmuch_bool_t;

    pub fn notmuch_database_upgrade(
        database: *mut notmuch_database_t,
        progress_notify: notmuch_progress_notify_t,
        closure: *mut c_void,
    ) -> notmuch_status_t;

    pub fn notmuch_database_begin_atomic(database: *mut notmuch_database_t) -> notmuch_status_t;

    pub fn notmuch_database_end_atomic(database: *mut notmuch_database_t) -> notmuch_status_t;

    pub fn notmuch_database_index_file(
        database: *mut notmuch_database_t,
        filename: *const c_char,
        indexopts: *mut notmuch_indexopts_t,
        message: *mut *mut notmuch_message_t,
    ) -> notmuch_status_t;

    pub fn notmuch_database_remove_message(
        database: *mut notmuch_database_t,
        filename: *const c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_database_find_message(
        database: *mut notmuch_database_t,
        message_id: *const c_char,
        message: *mut *mut notmuch_message_t,
    ) -> notmuch_status_t;

    pub fn notmuch_database_find_message_by_filename(
        database: *mut notmuch_database_t,
        filename: *const c_char,
        message: *mut *mut notmuch_message_t,
    ) -> notmuch_status_t;

    pub fn notmuch_database_get_all_tags(database: *mut notmuch_database_t) -> *mut notmuch_tags_t;

    // --- query ---

    pub fn notmuch_query_create(
        database: *mut notmuch_database_t,
        query_string: *const c_char,
    ) -> *mut notmuch_query_t;

    pub fn notmuch_query_get_query_string(query: *const notmuch_query_t) -> *const c_char;

    pub fn notmuch_query_set_omit_excluded(
        query: *mut notmuch_query_t,
        omit_excluded: notmuch_exclude_t,
    );

    pub fn notmuch_query_set_sort(query: *mut notmuch_query_t, sort: notmuch_sort_t);

    pub fn notmuch_query_get_sort(query: *const notmuch_query_t) -> notmuch_sort_t;

    pub fn notmuch_query_add_tag_exclude(
        query: *mut notmuch_query_t,
        tag: *const c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_query_search_threads(
        query: *mut notmuch_query_t,
        out: *mut *mut notmuch_threads_t,
    ) -> notmuch_status_t;

    pub fn notmuch_query_search_messages(
        query: *mut notmuch_query_t,
        out: *mut *mut notmuch_messages_t,
    ) -> notmuch_status_t;

    pub fn notmuch_query_count_messages(
        query: *mut notmuch_query_t,
        count: *mut c_uint,
    ) -> notmuch_status_t;

    pub fn notmuch_query_count_threads(
        query: *mut notmuch_query_t,
        count: *mut c_uint,
    ) -> notmuch_status_t;

    pub fn notmuch_query_destroy(query: *mut notmuch_query_t);

    // --- threads ---

    pub fn notmuch_threads_valid(threads: *mut notmuch_threads_t) -> notmuch_bool_t;

    pub fn notmuch_threads_get(threads: *mut notmuch_threads_t) -> *mut notmuch_thread_t;

    pub fn notmuch_threads_move_to_next(threads: *mut notmuch_threads_t);

    pub fn notmuch_threads_destroy(threads: *mut notmuch_threads_t);

    // --- thread ---

    pub fn notmuch_thread_get_thread_id(thread: *mut notmuch_thread_t) -> *const c_char;

    pub fn notmuch_thread_get_total_messages(thread: *mut notmuch_thread_t) -> c_int;

    pub fn notmuch_thread_get_matched_messages(thread: *mut notmuch_thread_t) -> c_int;

    pub fn notmuch_thread_get_toplevel_messages(
        thread: *mut notmuch_thread_t,
    ) -> *mut notmuch_messages_t;

    pub fn notmuch_thread_get_messages(thread: *mut notmuch_thread_t) -> *mut notmuch_messages_t;

    pub fn notmuch_thread_get_authors(thread: *mut notmuch_thread_t) -> *const c_char;

    pub fn notmuch_thread_get_subject(thread: *mut notmuch_thread_t) -> *const c_char;

    pub fn notmuch_thread_get_oldest_date(thread: *mut notmuch_thread_t) -> time_t;

    pub fn notmuch_thread_get_newest_date(thread: *mut notmuch_thread_t) -> time_t;

    pub fn notmuch_thread_get_tags(thread: *mut notmuch_thread_t) -> *mut notmuch_tags_t;

    pub fn notmuch_thread_destroy(thread: *mut notmuch_thread_t);

    // --- messages ---

    pub fn notmuch_messages_valid(messages: *mut notmuch_messages_t) -> notmuch_bool_t;

    pub fn notmuch_messages_get(messages: *mut notmuch_messages_t) -> *mut notmuch_message_t;

    pub fn notmuch_messages_move_to_next(messages: *mut notmuch_messages_t);

    pub fn notmuch_messages_destroy(messages: *mut notmuch_messages_t);

    pub fn notmuch_messages_collect_tags(messages: *mut notmuch_messages_t) -> *mut notmuch_tags_t;

    // --- message ---

    pub fn notmuch_message_get_message_id(message: *mut notmuch_message_t) -> *const c_char;

    pub fn notmuch_message_get_thread_id(message: *mut notmuch_message_t) -> *const c_char;

    pub fn notmuch_message_get_replies(message: *mut notmuch_message_t) -> *mut notmuch_messages_t;

    pub fn notmuch_message_get_filename(message: *mut notmuch_message_t) -> *const c_char;

    pub fn notmuch_message_get_filenames(
        message: *mut notmuch_message_t,
    ) -> *mut notmuch_filenames_t;

    pub fn notmuch_message_get_date(message: *mut notmuch_message_t) -> time_t;

    pub fn notmuch_message_get_header(
        message: *mut notmuch_message_t,
        header: *const c_char,
    ) -> *const c_char;

    pub fn notmuch_message_get_tags(message: *mut notmuch_message_t) -> *mut notmuch_tags_t;

    pub fn notmuch_message_add_tag(
        message: *mut notmuch_message_t,
        tag: *const c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_message_remove_tag(
        message: *mut notmuch_message_t,
        tag: *const c_char,
    ) -> notmuch_status_t;

    pub fn notmuch_message_remove_all_tags(message: *mut notmuch_message_t) -> notmuch_status_t;

    pub fn notmuch_message_maildir_flags_to_tags(
        message: *mut notmuch_message_t,
    ) -> notmuch_status_t;

    pub fn notmuch_message_tags_to_maildir_flags(
        message: *mut notmuch_message_t,
    ) -> notmuch_status_t;

    pub fn notmuch_message_freeze(message: *mut notmuch_message_t) -> notmuch_status_t;

    pub fn notmuch_message_thaw(message: *mut notmuch_message_t) -> notmuch_status_t;

    pub fn notmuch_message_destroy(message: *mut notmuch_message_t);

    // --- tags ---

    pub fn notmuch_tags_valid(tags: *mut notmuch_tags_t) -> notmuch_bool_t;

    pub fn notmuch_tags_get(tags: *mut notmuch_tags_t) -> *const c_char;

    pub fn notmuch_tags_move_to_next(tags: *mut notmuch_tags_t);

    pub fn notmuch_tags_destroy(tags: *mut notmuch_tags_t);

    // --- filenames ---

    pub fn notmuch_filenames_valid(filenames: *mut notmuch_filenames_t) -> notmuch_bool_t;

    pub fn notmuch_filenames_get(filenames: *mut notmuch_filenames_t) -> *const c_char;

    pub fn notmuch_filenames_move_to_next(filenames: *mut notmuch_filenames_t);

    pub fn notmuch_filenames_destroy(filenames: *mut notmuch_filenames_t);
}
