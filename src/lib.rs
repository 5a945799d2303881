//! Reading progress tracker core.
//!
//! A mobile shell links this crate, opens a [`Library`] over a
//! [`SqliteStore`] in its application data directory and forwards the
//! user's add/edit/delete/toggle intents to it. Everything the list and
//! detail screens display is derived from [`Book`] on demand.

pub mod config;
pub mod cover;
pub mod db;
pub mod error;
pub mod library;
pub mod models;
pub mod store;
pub mod validation;

pub use config::StoreConfig;
pub use error::{LibraryError, StoreError, ValidationError};
pub use library::{CompletedSummary, Library};
pub use models::{Book, ReadingRecord, Shelf};
pub use store::{BookStore, MemoryStore, SqliteStore};
pub use validation::{BookForm, RecordForm};

/// Opens the on-device library, creating the database on first run.
pub fn open_library(config: &StoreConfig) -> Result<Library<SqliteStore>, StoreError> {
    let store = SqliteStore::open(config)?;
    Ok(Library::open(store))
}
