use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub reading_records: Vec<ReadingRecord>,
    #[serde(default, with = "cover_bytes", skip_serializing_if = "Option::is_none")]
    pub cover_image_data: Option<Vec<u8>>, // JPEG
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_page: u32,
    pub end_page: u32,
}

/// The list a book shows up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shelf {
    /// Started but not finished.
    Reading,
    /// Nothing logged yet.
    Unread,
    Completed,
}

impl Book {
    pub fn new(title: String, author: String, total_pages: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            author,
            total_pages,
            is_completed: false,
            reading_records: vec![],
            cover_image_data: None,
            date_added: Utc::now(),
        }
    }

    pub fn total_pages_read(&self) -> u64 {
        self.reading_records
            .iter()
            .map(|record| u64::from(record.pages_read()))
            .sum()
    }

    /// A book without pages reports 0 even when completed; otherwise
    /// completed books report 100. The ratio is left unclamped, so
    /// overlapping records can push it past 100.
    pub fn progress_percentage(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        if self.is_completed {
            return 100.0;
        }
        self.total_pages_read() as f64 / f64::from(self.total_pages) * 100.0
    }

    pub fn remaining_pages(&self) -> u64 {
        if self.is_completed {
            return 0;
        }
        u64::from(self.total_pages).saturating_sub(self.total_pages_read())
    }

    pub fn last_read_on(&self) -> Option<NaiveDate> {
        self.reading_records.iter().map(|record| record.date).max()
    }

    /// Records ordered by date, most recent first. Same-day records keep
    /// their insertion order.
    pub fn records_newest_first(&self) -> Vec<&ReadingRecord> {
        let mut records: Vec<&ReadingRecord> = self.reading_records.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    pub fn record(&self, record_id: Uuid) -> Option<&ReadingRecord> {
        self.reading_records
            .iter()
            .find(|record| record.id == record_id)
    }

    pub fn shelf(&self) -> Shelf {
        if self.is_completed {
            Shelf::Completed
        } else if self.total_pages_read() > 0 {
            Shelf::Reading
        } else {
            Shelf::Unread
        }
    }

    /// Decodes the stored cover, if there is one and it is still readable.
    pub fn cover_image(&self) -> Option<image::DynamicImage> {
        let bytes = self.cover_image_data.as_deref()?;
        match image::load_from_memory(bytes) {
            Ok(img) => Some(img),
            Err(err) => {
                log::warn!("stored cover for book {} is unreadable: {}", self.id, err);
                None
            }
        }
    }
}

impl ReadingRecord {
    pub fn new(date: NaiveDate, start_page: u32, end_page: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            start_page,
            end_page,
        }
    }

    /// Inclusive page count; zero when the range is inverted.
    pub fn pages_read(&self) -> u32 {
        if self.end_page < self.start_page {
            return 0;
        }
        (self.end_page - self.start_page).saturating_add(1)
    }
}

/// Cover bytes travel as base64 text inside the JSON document.
mod cover_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
