//! Shared fixtures for integration tests
//!
//! Builds a throwaway mail root from the emails in `tests/fixtures/emails`
//! and indexes them into a fresh notmuch database.

#![allow(dead_code)]

use notmuch::{Database, Mode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INTRO_FILES: [&str; 3] = ["intro-1:2,", "intro-2:2,", "intro-3:2,"];
pub const ACCENT_FILE: &str = "accent-1:2,";
pub const JANAK_FILES: [&str; 2] = ["janak-1:2,F", "janak-2:2,"];

pub const INTRO_ID: &str = "20091117232059.GA4001@igalia.com";
pub const JANAK_ID: &str = "1258509249-25567-1-git-send-email-jan@ryngle.com";

pub const INTRO_OLDEST: i64 = 1258500059;
pub const INTRO_NEWEST: i64 = 1258542931;

/// Temporary mail root with an indexed database
pub struct MailRoot {
    dir: TempDir,
}

impl MailRoot {
    /// Create a mail root and index every fixture email
    ///
    /// Fixture messages are tagged `inbox` and `unread` the way a fresh
    /// delivery would be. The database is closed again before returning.
    pub fn new() -> Self {
        notmuch::logging::init_test();

        let root = Self::empty();
        let db = Database::create(root.path()).unwrap();
        for name in Self::fixture_names() {
            let message = db.add_message(root.file(name)).unwrap();
            message.add_tag("inbox").unwrap();
            message.add_tag("unread").unwrap();
        }
        db.close().unwrap();
        root
    }

    /// Mail root holding the fixture files in `cur/`, nothing indexed
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let cur = dir.path().join("cur");
        fs::create_dir_all(&cur).unwrap();
        for name in Self::fixture_names() {
            fs::copy(fixtures_dir().join(name), cur.join(name)).unwrap();
        }
        Self { dir }
    }

    fn fixture_names() -> impl Iterator<Item = &'static str> {
        INTRO_FILES
            .into_iter()
            .chain(std::iter::once(ACCENT_FILE))
            .chain(JANAK_FILES)
    }

    /// Canonical path of the mail root
    pub fn path(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    /// Path of a fixture file inside the mail root
    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join("cur").join(name)
    }

    pub fn open(&self, mode: Mode) -> Database {
        Database::open(self.path(), mode).unwrap()
    }
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("emails")
}

pub const FIXTURE_COUNT: u32 = 6;
