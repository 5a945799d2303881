use uuid::Uuid;

/// Rejected form input. The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter the book title and author.")]
    MissingTitleOrAuthor,
    #[error("Please enter a valid page count.")]
    InvalidPageCount,
    #[error("Please enter valid page numbers.")]
    InvalidPageNumbers,
    #[error("The start page must be less than or equal to the end page.")]
    StartAfterEnd,
    #[error("The end page cannot exceed the book's total page count ({total_pages}).")]
    EndBeyondBook { total_pages: u32 },
    #[error("The selected cover image could not be read.")]
    UnreadableCover,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to encode books: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode books: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("book not found: {0}")]
    BookNotFound(Uuid),
    #[error("reading record not found: {0}")]
    RecordNotFound(Uuid),
}
