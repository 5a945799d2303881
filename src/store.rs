use std::collections::HashMap;

use rusqlite::Connection;

use crate::config::{StoreConfig, DEFAULT_STORAGE_KEY};
use crate::db;
use crate::error::StoreError;
use crate::models::Book;

/// Persistence for the whole collection, written as one unit.
pub trait BookStore {
    /// Never fails: a missing or unreadable entry is an empty collection.
    fn load(&mut self) -> Vec<Book>;

    fn save(&mut self, books: &[Book]) -> Result<(), StoreError>;
}

pub fn encode_books(books: &[Book]) -> Result<String, StoreError> {
    let json = serde_json::to_string(books).map_err(StoreError::Encode)?;
    log::debug!("encoded {} books ({} bytes)", books.len(), json.len());
    Ok(json)
}

pub fn decode_books(json: &str) -> Result<Vec<Book>, StoreError> {
    serde_json::from_str(json).map_err(StoreError::Decode)
}

fn decode_or_empty(raw: Option<String>, key: &str) -> Vec<Book> {
    let raw = match raw {
        Some(value) => value,
        None => return vec![],
    };
    match decode_books(&raw) {
        Ok(books) => books,
        Err(err) => {
            log::warn!("discarding unreadable entry {}: {}", key, err);
            vec![]
        }
    }
}

/// Key-value table in a local SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    key: String,
}

impl SqliteStore {
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = db::init_db(config)?;
        Ok(Self {
            conn,
            key: config.storage_key.clone(),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: db::init_in_memory()?,
            key: DEFAULT_STORAGE_KEY.to_string(),
        })
    }
}

impl BookStore for SqliteStore {
    fn load(&mut self) -> Vec<Book> {
        match db::get_value(&self.conn, &self.key) {
            Ok(raw) => decode_or_empty(raw, &self.key),
            Err(err) => {
                log::warn!("failed to read entry {}: {}", self.key, err);
                vec![]
            }
        }
    }

    fn save(&mut self, books: &[Book]) -> Result<(), StoreError> {
        let json = encode_books(books)?;
        db::put_value(&self.conn, &self.key, &json)?;
        Ok(())
    }
}

/// In-process key-value map; nothing outlives the value.
#[derive(Debug)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    key: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Raw encoded entry, as a host would see it in device storage.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }

    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.entries.insert(self.key.clone(), value.into());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore for MemoryStore {
    fn load(&mut self) -> Vec<Book> {
        decode_or_empty(self.entries.get(&self.key).cloned(), &self.key)
    }

    fn save(&mut self, books: &[Book]) -> Result<(), StoreError> {
        let json = encode_books(books)?;
        self.entries.insert(self.key.clone(), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_books, encode_books, BookStore, MemoryStore, SqliteStore};
    use crate::cover::normalize_cover;
    use crate::cover::sample_png;
    use crate::models::{Book, ReadingRecord};
    use chrono::NaiveDate;

    fn sample_books() -> Vec<Book> {
        let mut dune = Book::new("Dune".to_string(), "Frank Herbert".to_string(), 412);
        dune.reading_records.push(ReadingRecord::new(
            NaiveDate::from_ymd_opt(2025, 8, 24).expect("valid date"),
            1,
            50,
        ));
        dune.cover_image_data = Some(normalize_cover(&sample_png(4, 6)).expect("cover"));
        let mut emma = Book::new("Emma".to_string(), "Jane Austen".to_string(), 474);
        emma.is_completed = true;
        vec![dune, emma]
    }

    #[test]
    fn encoded_collection_decodes_to_the_same_books() {
        let books = sample_books();
        let json = encode_books(&books).expect("encode");
        assert_eq!(decode_books(&json).expect("decode"), books);
    }

    #[test]
    fn wire_format_uses_camel_case_names() {
        let json = encode_books(&sample_books()).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        let first = &value[0];

        for field in [
            "id",
            "title",
            "author",
            "totalPages",
            "isCompleted",
            "readingRecords",
            "coverImageData",
            "dateAdded",
        ] {
            assert!(first.get(field).is_some(), "missing {field}");
        }
        assert!(first["coverImageData"].is_string());
        let record = &first["readingRecords"][0];
        assert_eq!(record["date"], "2025-08-24");
        assert_eq!(record["startPage"], 1);
        assert_eq!(record["endPage"], 50);
        assert!(value[1].get("coverImageData").is_none());
    }

    #[test]
    fn unreadable_entry_loads_as_empty() {
        let mut store = MemoryStore::new();
        assert!(store.load().is_empty());

        store.set_raw("{not json");
        assert!(store.load().is_empty());

        store.set_raw(r#"[{"title": "missing most fields"}]"#);
        assert!(store.load().is_empty());
    }

    #[test]
    fn sqlite_store_keeps_the_latest_save() {
        let mut store = SqliteStore::in_memory().expect("store");
        assert!(store.load().is_empty());

        let books = sample_books();
        store.save(&books).expect("save all");
        store.save(&books[..1]).expect("save one");

        assert_eq!(store.load(), books[..1].to_vec());
    }
}
