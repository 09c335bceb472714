//! Error types for notmuch
//!
//! Every native call returns a `notmuch_status_t`; it is checked right after
//! the call and turned into an [`Error`]. Running out of items while iterating
//! is not an error and never shows up here.

use notmuch_sys as ffi;
use std::ffi::NulError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for notmuch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Native status codes reported by libnotmuch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    OutOfMemory,
    ReadOnlyDatabase,
    XapianException,
    FileError,
    FileNotEmail,
    DuplicateMessageId,
    NullPointer,
    TagTooLong,
    UnbalancedFreezeThaw,
    UnbalancedAtomic,
    UnsupportedOperation,
    UpgradeRequired,
    PathError,
    Ignored,
    IllegalArgument,
    MalformedCryptoProtocol,
    FailedCryptoContextCreation,
    UnknownCryptoProtocol,
    NoConfig,
    NoDatabase,
    DatabaseExists,
    BadQuerySyntax,
    NoMailRoot,
    ClosedDatabase,
    /// A status newer than these bindings
    Unknown(i32),
}

impl Status {
    /// Map a raw `notmuch_status_t`
    pub fn from_raw(raw: ffi::notmuch_status_t) -> Self {
        match raw {
            ffi::NOTMUCH_STATUS_SUCCESS => Status::Success,
            ffi::NOTMUCH_STATUS_OUT_OF_MEMORY => Status::OutOfMemory,
            ffi::NOTMUCH_STATUS_READ_ONLY_DATABASE => Status::ReadOnlyDatabase,
            ffi::NOTMUCH_STATUS_XAPIAN_EXCEPTION => Status::XapianException,
            ffi::NOTMUCH_STATUS_FILE_ERROR => Status::FileError,
            ffi::NOTMUCH_STATUS_FILE_NOT_EMAIL => Status::FileNotEmail,
            ffi::NOTMUCH_STATUS_DUPLICATE_MESSAGE_ID => Status::DuplicateMessageId,
            ffi::NOTMUCH_STATUS_NULL_POINTER => Status::NullPointer,
            ffi::NOTMUCH_STATUS_TAG_TOO_LONG => Status::TagTooLong,
            ffi::NOTMUCH_STATUS_UNBALANCED_FREEZE_THAW => Status::UnbalancedFreezeThaw,
            ffi::NOTMUCH_STATUS_UNBALANCED_ATOMIC => Status::UnbalancedAtomic,
            ffi::NOTMUCH_STATUS_UNSUPPORTED_OPERATION => Status::UnsupportedOperation,
            ffi::NOTMUCH_STATUS_UPGRADE_REQUIRED => Status::UpgradeRequired,
            ffi::NOTMUCH_STATUS_PATH_ERROR => Status::PathError,
            ffi::NOTMUCH_STATUS_IGNORED => Status::Ignored,
            ffi::NOTMUCH_STATUS_ILLEGAL_ARGUMENT => Status::IllegalArgument,
            ffi::NOTMUCH_STATUS_MALFORMED_CRYPTO_PROTOCOL => Status::MalformedCryptoProtocol,
            ffi::NOTMUCH_STATUS_FAILED_CRYPTO_CONTEXT_CREATION => {
                Status::FailedCryptoContextCreation
            }
            ffi::NOTMUCH_STATUS_UNKNOWN_CRYPTO_PROTOCOL => Status::UnknownCryptoProtocol,
            ffi::NOTMUCH_STATUS_NO_CONFIG => Status::NoConfig,
            ffi::NOTMUCH_STATUS_NO_DATABASE => Status::NoDatabase,
            ffi::NOTMUCH_STATUS_DATABASE_EXISTS => Status::DatabaseExists,
            ffi::NOTMUCH_STATUS_BAD_QUERY_SYNTAX => Status::BadQuerySyntax,
            ffi::NOTMUCH_STATUS_NO_MAIL_ROOT => Status::NoMailRoot,
            ffi::NOTMUCH_STATUS_CLOSED_DATABASE => Status::ClosedDatabase,
            other => Status::Unknown(other),
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Turn a status into `Ok(())` or a typed error for `operation`
    pub(crate) fn check(self, operation: &'static str) -> Result<()> {
        match self {
            Status::Success => Ok(()),
            Status::ReadOnlyDatabase => Err(Error::ReadOnly),
            status => Err(Error::Native { operation, status }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "no error occurred"),
            Status::OutOfMemory => write!(f, "out of memory"),
            Status::ReadOnlyDatabase => write!(f, "attempt to write to a read-only database"),
            Status::XapianException => write!(f, "a Xapian exception occurred"),
            Status::FileError => write!(f, "something went wrong trying to read or write a file"),
            Status::FileNotEmail => write!(f, "file is not an email"),
            Status::DuplicateMessageId => {
                write!(f, "message ID is identical to a message in database")
            }
            Status::NullPointer => write!(f, "erroneous NULL pointer"),
            Status::TagTooLong => write!(f, "tag value is too long"),
            Status::UnbalancedFreezeThaw => write!(f, "unbalanced number of freeze/thaw calls"),
            Status::UnbalancedAtomic => {
                write!(f, "unbalanced number of begin_atomic/end_atomic calls")
            }
            Status::UnsupportedOperation => write!(f, "unsupported operation"),
            Status::UpgradeRequired => write!(f, "operation requires a database upgrade"),
            Status::PathError => write!(f, "path supplied is illegal for this function"),
            Status::Ignored => write!(f, "argument was ignored"),
            Status::IllegalArgument => write!(f, "illegal argument for function"),
            Status::MalformedCryptoProtocol => {
                write!(f, "crypto protocol missing, malformed, or unintelligible")
            }
            Status::FailedCryptoContextCreation => write!(f, "failed to create crypto context"),
            Status::UnknownCryptoProtocol => write!(f, "unknown crypto protocol"),
            Status::NoConfig => write!(f, "no configuration file found"),
            Status::NoDatabase => write!(f, "no database found"),
            Status::DatabaseExists => write!(f, "database exists, not recreated"),
            Status::BadQuerySyntax => write!(f, "syntax error in query"),
            Status::NoMailRoot => write!(f, "no mail root found"),
            Status::ClosedDatabase => write!(f, "database is closed"),
            Status::Unknown(raw) => write!(f, "unknown notmuch status {}", raw),
        }
    }
}

/// Errors that can occur when talking to a notmuch database
#[derive(Error, Debug)]
pub enum Error {
    /// No database exists at the given path
    #[error("No notmuch database found at {}", .0.display())]
    NotFound(PathBuf),

    /// Opening an existing database failed
    #[error("Failed to open database at {}: {status}{}", .path.display(), detail(.message))]
    Open {
        path: PathBuf,
        status: Status,
        message: Option<String>,
    },

    /// Creating a new database failed
    #[error("Failed to create database at {}: {status}{}", .path.display(), detail(.message))]
    Create {
        path: PathBuf,
        status: Status,
        message: Option<String>,
    },

    /// A mutating operation was attempted on a read-only handle
    #[error("Database is opened read-only")]
    ReadOnly,

    /// Another read-write handle on the same database is alive in this process
    #[error("Database at {} is already open for writing", .0.display())]
    Locked(PathBuf),

    /// The file holds a message whose Message-ID is already indexed
    #[error("Message {message_id} from {} is already indexed", .path.display())]
    DuplicateMessage { path: PathBuf, message_id: String },

    /// Indexing a file failed
    #[error("Failed to add message {}: {status}", .path.display())]
    AddMessage { path: PathBuf, status: Status },

    /// Generic native failure
    #[error("{operation} failed: {status}")]
    Native {
        operation: &'static str,
        status: Status,
    },

    /// A string argument contained an interior NUL byte
    #[error("Invalid string argument: {0}")]
    InvalidString(#[from] NulError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Native status behind this error, if there is one
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Open { status, .. }
            | Error::Create { status, .. }
            | Error::AddMessage { status, .. }
            | Error::Native { status, .. } => Some(*status),
            Error::ReadOnly => Some(Status::ReadOnlyDatabase),
            Error::DuplicateMessage { .. } => Some(Status::DuplicateMessageId),
            _ => None,
        }
    }
}

fn detail(message: &Option<String>) -> String {
    match message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => format!(" ({})", m),
        _ => String::new(),
    }
}
