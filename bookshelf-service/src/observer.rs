//! Change notification for presentation code.
//!
//! Observers are called synchronously, on the caller's stack, in the order
//! they were registered.

use bookshelf_catalog::types::Book;

use crate::state::FilterState;

/// Receives catalog service events. Every method defaults to a no-op.
pub trait CatalogObserver {
    /// The active book list was recomputed.
    fn on_books_changed(&mut self, _books: &[Book]) {}

    /// Category, subject, or search selection changed.
    fn on_filter_changed(&mut self, _state: &FilterState) {}

    /// A book was handed to the viewer.
    fn on_book_opened(&mut self, _book: &Book) {}
}

/// An observer that discards all events.
pub struct SilentObserver;

impl CatalogObserver for SilentObserver {}

/// An observer that logs events to the `log` crate.
pub struct LogObserver;

impl CatalogObserver for LogObserver {
    fn on_books_changed(&mut self, books: &[Book]) {
        log::debug!("Book list changed: {} books", books.len());
    }

    fn on_filter_changed(&mut self, state: &FilterState) {
        log::debug!("Filter changed: {}", state.summary());
    }

    fn on_book_opened(&mut self, book: &Book) {
        log::info!("Opened '{}'", book.display_title());
    }
}

type BooksHandler = Box<dyn FnMut(&[Book])>;
type FilterHandler = Box<dyn FnMut(&FilterState)>;
type OpenedHandler = Box<dyn FnMut(&Book)>;

/// Closure-based observer. Handlers left unset ignore their event.
///
/// ```
/// use bookshelf_service::EventHandlers;
///
/// let handlers = EventHandlers::new()
///     .on_books_changed(|books| println!("{} books", books.len()))
///     .on_book_opened(|book| println!("opened {}", book.title));
/// # drop(handlers);
/// ```
#[derive(Default)]
pub struct EventHandlers {
    books_changed: Option<BooksHandler>,
    filter_changed: Option<FilterHandler>,
    book_opened: Option<OpenedHandler>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_books_changed(mut self, handler: impl FnMut(&[Book]) + 'static) -> Self {
        self.books_changed = Some(Box::new(handler));
        self
    }

    pub fn on_filter_changed(mut self, handler: impl FnMut(&FilterState) + 'static) -> Self {
        self.filter_changed = Some(Box::new(handler));
        self
    }

    pub fn on_book_opened(mut self, handler: impl FnMut(&Book) + 'static) -> Self {
        self.book_opened = Some(Box::new(handler));
        self
    }
}

impl CatalogObserver for EventHandlers {
    fn on_books_changed(&mut self, books: &[Book]) {
        if let Some(handler) = self.books_changed.as_mut() {
            handler(books);
        }
    }

    fn on_filter_changed(&mut self, state: &FilterState) {
        if let Some(handler) = self.filter_changed.as_mut() {
            handler(state);
        }
    }

    fn on_book_opened(&mut self, book: &Book) {
        if let Some(handler) = self.book_opened.as_mut() {
            handler(book);
        }
    }
}
