//! Owner of the in-memory collection.
//!
//! Every mutation validates its input, commits to the collection and then
//! writes the whole collection back through the store. A rejected input
//! leaves the collection untouched. A failed write does not roll back the
//! in-memory change; it is logged and kept in [`Library::last_persist_error`].

use uuid::Uuid;

use crate::error::{LibraryError, StoreError};
use crate::models::{Book, ReadingRecord, Shelf};
use crate::store::BookStore;
use crate::validation::{validate_book, validate_record, BookForm, RecordForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletedSummary {
    pub books: usize,
    pub pages: u64,
}

#[derive(Debug)]
pub struct Library<S: BookStore> {
    books: Vec<Book>,
    store: S,
    last_persist_error: Option<StoreError>,
}

impl<S: BookStore> Library<S> {
    pub fn open(mut store: S) -> Self {
        let books = store.load();
        log::info!("library loaded with {} books", books.len());
        Self {
            books,
            store,
            last_persist_error: None,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Error from the most recent write, cleared by the next successful one.
    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.last_persist_error.as_ref()
    }

    /// Started, unfinished books; furthest along first.
    pub fn reading(&self) -> Vec<&Book> {
        let mut books = self.on_shelf(Shelf::Reading);
        books.sort_by(|a, b| b.progress_percentage().total_cmp(&a.progress_percentage()));
        books
    }

    /// Untouched books, oldest addition first.
    pub fn unread(&self) -> Vec<&Book> {
        let mut books = self.on_shelf(Shelf::Unread);
        books.sort_by_key(|book| book.date_added);
        books
    }

    pub fn completed(&self) -> Vec<&Book> {
        self.on_shelf(Shelf::Completed)
    }

    pub fn completed_summary(&self) -> CompletedSummary {
        self.completed()
            .iter()
            .fold(CompletedSummary::default(), |summary, book| CompletedSummary {
                books: summary.books + 1,
                pages: summary.pages + u64::from(book.total_pages),
            })
    }

    fn on_shelf(&self, shelf: Shelf) -> Vec<&Book> {
        self.books.iter().filter(|book| book.shelf() == shelf).collect()
    }

    pub fn add_book(&mut self, form: &BookForm) -> Result<Uuid, LibraryError> {
        let valid = validate_book(form)?;
        let mut book = Book::new(valid.title, valid.author, valid.total_pages);
        book.cover_image_data = valid.cover;
        let id = book.id;

        log::info!("adding book {} ({:?})", id, book.title);
        self.books.push(book);
        self.persist();
        Ok(id)
    }

    /// Replaces the editable fields. An absent cover in the form clears the
    /// stored one. New books always start unfinished; completion is only
    /// set here or through [`Library::set_completed`].
    pub fn update_book(
        &mut self,
        id: Uuid,
        form: &BookForm,
        is_completed: bool,
    ) -> Result<(), LibraryError> {
        let index = self.book_index(id)?;
        let valid = validate_book(form)?;
        let book = &mut self.books[index];
        book.title = valid.title;
        book.author = valid.author;
        book.total_pages = valid.total_pages;
        book.is_completed = is_completed;
        book.cover_image_data = valid.cover;

        log::info!("updated book {}", id);
        self.persist();
        Ok(())
    }

    pub fn delete_book(&mut self, id: Uuid) -> Result<Book, LibraryError> {
        let index = self.book_index(id)?;
        let removed = self.books.remove(index);

        log::info!("deleted book {} with {} records", id, removed.reading_records.len());
        self.persist();
        Ok(removed)
    }

    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> Result<(), LibraryError> {
        let index = self.book_index(id)?;
        self.books[index].is_completed = completed;

        log::info!("book {} completed={}", id, completed);
        self.persist();
        Ok(())
    }

    /// Returns the new completion flag.
    pub fn toggle_completed(&mut self, id: Uuid) -> Result<bool, LibraryError> {
        let completed = !self.book(id).ok_or(LibraryError::BookNotFound(id))?.is_completed;
        self.set_completed(id, completed)?;
        Ok(completed)
    }

    pub fn add_record(&mut self, book_id: Uuid, form: &RecordForm) -> Result<Uuid, LibraryError> {
        let index = self.book_index(book_id)?;
        let book = &mut self.books[index];
        let range = validate_record(form, book.total_pages)?;
        let record = ReadingRecord::new(range.date, range.start_page, range.end_page);
        let record_id = record.id;
        book.reading_records.push(record);

        log::info!(
            "book {} record added: pages {}-{} on {}",
            book_id,
            range.start_page,
            range.end_page,
            range.date
        );
        self.persist();
        Ok(record_id)
    }

    pub fn update_record(
        &mut self,
        book_id: Uuid,
        record_id: Uuid,
        form: &RecordForm,
    ) -> Result<(), LibraryError> {
        let index = self.book_index(book_id)?;
        let book = &mut self.books[index];
        let total_pages = book.total_pages;
        let record = book
            .reading_records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or(LibraryError::RecordNotFound(record_id))?;
        let range = validate_record(form, total_pages)?;
        record.date = range.date;
        record.start_page = range.start_page;
        record.end_page = range.end_page;

        log::info!("book {} record {} updated", book_id, record_id);
        self.persist();
        Ok(())
    }

    pub fn delete_record(
        &mut self,
        book_id: Uuid,
        record_id: Uuid,
    ) -> Result<ReadingRecord, LibraryError> {
        let index = self.book_index(book_id)?;
        let records = &mut self.books[index].reading_records;
        let position = records
            .iter()
            .position(|record| record.id == record_id)
            .ok_or(LibraryError::RecordNotFound(record_id))?;
        let removed = records.remove(position);

        log::info!("book {} record {} deleted", book_id, record_id);
        self.persist();
        Ok(removed)
    }

    fn book_index(&self, id: Uuid) -> Result<usize, LibraryError> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or(LibraryError::BookNotFound(id))
    }

    fn persist(&mut self) {
        match self.store.save(&self.books) {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                log::error!("failed to save {} books: {}", self.books.len(), err);
                self.last_persist_error = Some(err);
            }
        }
    }
}
