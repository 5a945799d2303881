//! Checks raw form input before anything touches the collection.
//!
//! Text comes in exactly as typed. Nothing is trimmed, so a title made of
//! spaces counts as present while `" 12"` is not a page number.

use chrono::NaiveDate;

use crate::cover::normalize_cover;
use crate::error::ValidationError;

/// Add/edit book form.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub total_pages: String,
    /// Raw bytes of the picked cover in any format the image crate reads.
    pub cover: Option<Vec<u8>>,
}

/// Add/edit reading record form.
#[derive(Debug, Clone)]
pub struct RecordForm {
    pub date: NaiveDate,
    pub start_page: String,
    pub end_page: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidBook {
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    /// Already normalized to JPEG.
    pub cover: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    pub date: NaiveDate,
    pub start_page: u32,
    pub end_page: u32,
}

pub fn validate_book(form: &BookForm) -> Result<ValidBook, ValidationError> {
    if form.title.is_empty() || form.author.is_empty() {
        return Err(ValidationError::MissingTitleOrAuthor);
    }
    let total_pages = parse_number(&form.total_pages)
        .filter(|pages| *pages > 0)
        .and_then(|pages| u32::try_from(pages).ok())
        .ok_or(ValidationError::InvalidPageCount)?;
    let cover = form
        .cover
        .as_deref()
        .map(normalize_cover)
        .transpose()?;

    Ok(ValidBook {
        title: form.title.clone(),
        author: form.author.clone(),
        total_pages,
        cover,
    })
}

/// `total_pages` is the owning book's page count at the time of entry.
pub fn validate_record(
    form: &RecordForm,
    total_pages: u32,
) -> Result<ValidRange, ValidationError> {
    let (start, end) = match (parse_number(&form.start_page), parse_number(&form.end_page)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ValidationError::InvalidPageNumbers),
    };
    // zero and negative pages share the ordering message
    if start <= 0 || end <= 0 || start > end {
        return Err(ValidationError::StartAfterEnd);
    }
    if end > i64::from(total_pages) {
        return Err(ValidationError::EndBeyondBook { total_pages });
    }
    // 0 < start <= end <= total_pages, so both fit
    let too_far = ValidationError::EndBeyondBook { total_pages };
    let start_page = u32::try_from(start).map_err(|_| too_far.clone())?;
    let end_page = u32::try_from(end).map_err(|_| too_far)?;

    Ok(ValidRange {
        date: form.date,
        start_page,
        end_page,
    })
}

fn parse_number(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{validate_book, validate_record, BookForm, RecordForm, ValidRange};
    use crate::cover::sample_png;
    use crate::error::ValidationError;
    use chrono::NaiveDate;

    fn book_form(title: &str, author: &str, total_pages: &str) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.to_string(),
            total_pages: total_pages.to_string(),
            ..BookForm::default()
        }
    }

    fn record_form(start: &str, end: &str) -> RecordForm {
        RecordForm {
            date: NaiveDate::from_ymd_opt(2025, 8, 24).expect("valid date"),
            start_page: start.to_string(),
            end_page: end.to_string(),
        }
    }

    #[test]
    fn accepts_a_complete_book() {
        let valid = validate_book(&book_form("Dune", "Frank Herbert", "412")).expect("valid book");
        assert_eq!(valid.title, "Dune");
        assert_eq!(valid.total_pages, 412);
        assert!(valid.cover.is_none());
    }

    #[test]
    fn rejects_missing_title_or_author() {
        assert_eq!(
            validate_book(&book_form("", "Frank Herbert", "412")),
            Err(ValidationError::MissingTitleOrAuthor)
        );
        assert_eq!(
            validate_book(&book_form("Dune", "", "412")),
            Err(ValidationError::MissingTitleOrAuthor)
        );
    }

    #[test]
    fn rejects_bad_page_counts() {
        for raw in ["0", "abc", "", "-5", "12.5", " 12", "4294967296", "5000000000"] {
            assert_eq!(
                validate_book(&book_form("Dune", "Frank Herbert", raw)),
                Err(ValidationError::InvalidPageCount),
                "page count {raw:?}"
            );
        }
    }

    #[test]
    fn page_count_tops_out_at_u32_max() {
        let valid = validate_book(&book_form("Dune", "Frank Herbert", "4294967295"))
            .expect("largest page count");
        assert_eq!(valid.total_pages, u32::MAX);
    }

    #[test]
    fn normalizes_the_picked_cover() {
        let mut form = book_form("Dune", "Frank Herbert", "412");
        form.cover = Some(sample_png(8, 12));
        let valid = validate_book(&form).expect("valid book");
        let cover = valid.cover.expect("cover kept");
        assert_eq!(
            image::guess_format(&cover).expect("known format"),
            image::ImageFormat::Jpeg
        );

        form.cover = Some(vec![0, 1, 2]);
        assert_eq!(validate_book(&form), Err(ValidationError::UnreadableCover));
    }

    #[test]
    fn accepts_a_range_inside_the_book() {
        let range = validate_record(&record_form("51", "120"), 200).expect("valid range");
        assert_eq!(
            range,
            ValidRange {
                date: NaiveDate::from_ymd_opt(2025, 8, 24).expect("valid date"),
                start_page: 51,
                end_page: 120,
            }
        );
        assert!(validate_record(&record_form("200", "200"), 200).is_ok());
    }

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(
            validate_record(&record_form("5", "3"), 200),
            Err(ValidationError::StartAfterEnd)
        );
        assert_eq!(
            validate_record(&record_form("150", "201"), 200),
            Err(ValidationError::EndBeyondBook { total_pages: 200 })
        );
        assert_eq!(
            validate_record(&record_form("1", "ten"), 200),
            Err(ValidationError::InvalidPageNumbers)
        );
        assert_eq!(
            validate_record(&record_form("", "10"), 200),
            Err(ValidationError::InvalidPageNumbers)
        );
        assert_eq!(
            validate_record(&record_form("5", "5000000000"), 200),
            Err(ValidationError::EndBeyondBook { total_pages: 200 })
        );
    }

    #[test]
    fn zero_or_negative_pages_get_the_ordering_message() {
        for (start, end) in [("0", "10"), ("1", "0"), ("-3", "10"), ("0", "0")] {
            assert_eq!(
                validate_record(&record_form(start, end), 200),
                Err(ValidationError::StartAfterEnd),
                "range {start:?}..{end:?}"
            );
        }
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            ValidationError::EndBeyondBook { total_pages: 200 }.to_string(),
            "The end page cannot exceed the book's total page count (200)."
        );
    }
}
