//! notmuch - Safe bindings to the notmuch mail index
//!
//! Opens a notmuch database (a mail root with a `.notmuch` Xapian index),
//! runs search queries against it and walks the resulting threads, messages
//! and tags. Mail files can be added to and removed from the index.
//!
//! Every handle borrows the object it was derived from, so a query cannot
//! outlive its database and a message cannot outlive its thread or cursor.
//!
//! # Architecture
//!
//! - **database**: Open/create/close, indexing, lookups, atomic sections
//! - **query**: Search expressions, sorting, tag exclusion, counts
//! - **thread**: Threads and author lists
//! - **message**: Messages, headers, tags, maildir flag sync
//! - **tags**: Tag cursors
//! - **config**: YAML configuration for applications
//! - **logging**: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use notmuch::{Database, Mode};
//!
//! # fn main() -> notmuch::Result<()> {
//! let db = Database::open("/home/me/mail", Mode::ReadOnly)?;
//! let query = db.create_query("tag:inbox")?;
//! for thread in query.threads()? {
//!     println!("{} {}", thread.id(), thread.subject());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod message;
pub mod query;
pub mod tags;
pub mod thread;

mod locks;
mod utils;

// Re-exports
pub use config::Config;
pub use database::{AtomicSection, Database, Mode};
pub use error::{Error, Result, Status};
pub use message::{FrozenMessage, Message, Messages};
pub use query::{Exclude, Query, Sort};
pub use tags::Tags;
pub use thread::{Authors, Thread, Threads};
