use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "readlog.db";
pub const DEFAULT_STORAGE_KEY: &str = "books";

/// Where the collection lives on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Application data directory handed over by the host.
    pub data_dir: PathBuf,
    pub db_file_name: String,
    /// Key of the single entry holding the encoded collection.
    pub storage_key: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Like [`StoreConfig::new`], honouring `READLOG_DB_FILE` and
    /// `READLOG_STORAGE_KEY` when they are set to something non-empty.
    pub fn from_env(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(data_dir);
        if let Some(name) = env_override("READLOG_DB_FILE") {
            config.db_file_name = name;
        }
        if let Some(key) = env_override("READLOG_STORAGE_KEY") {
            config.storage_key = key;
        }
        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
