//! The catalog service: filter state, caches, and book opening.
//!
//! The active book list is recomputed after every filter change with a fixed
//! precedence:
//!
//! 1. an active search term (its results stand until the search is cleared)
//! 2. category and subject
//! 3. category alone, the union of every subject under it
//! 4. nothing selected, an empty list

use std::collections::HashSet;
use std::path::PathBuf;

use bookshelf_catalog::normalize::{normalize_key, normalize_text};
use bookshelf_catalog::types::{
    Book, Category, LibraryStatistics, SearchCriteria, SearchResult, Subject, UNCATEGORIZED,
};
use bookshelf_catalog::{resolve_cover, LibraryPaths};
use bookshelf_db::CatalogDb;

use crate::cache::CatalogCache;
use crate::observer::{CatalogObserver, EventHandlers};
use crate::opener::{BookOpener, SystemOpener};
use crate::state::{FileValidation, FilterState, MissingFile};

/// Search terms this short clear the list instead of querying.
const MIN_SEARCH_LEN: usize = 2;

pub struct CatalogService {
    db: CatalogDb,
    paths: LibraryPaths,
    opener: Box<dyn BookOpener>,
    observers: Vec<Box<dyn CatalogObserver>>,
    cache: CatalogCache,

    current_category: Option<String>,
    current_subject: Option<String>,
    search_term: String,
    current_books: Vec<Book>,
}

impl CatalogService {
    /// A service over `db` that opens books with the platform launcher.
    pub fn new(db: CatalogDb, paths: LibraryPaths) -> Self {
        log::info!("Catalog service initialized");
        Self {
            db,
            paths,
            opener: Box::new(SystemOpener),
            observers: Vec::new(),
            cache: CatalogCache::default(),
            current_category: None,
            current_subject: None,
            search_term: String::new(),
            current_books: Vec::new(),
        }
    }

    /// Replace the book opener.
    pub fn with_opener(mut self, opener: impl BookOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn db(&self) -> &CatalogDb {
        &self.db
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    // ── Observers ───────────────────────────────────────────────────────────

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: impl CatalogObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Register closure handlers as one more observer.
    pub fn set_event_handlers(&mut self, handlers: EventHandlers) {
        self.add_observer(handlers);
        log::info!("Event handlers configured");
    }

    fn notify_books_changed(&mut self) {
        for observer in &mut self.observers {
            observer.on_books_changed(&self.current_books);
        }
    }

    fn notify_filter_changed(&mut self) {
        let state = self.get_filter_state();
        for observer in &mut self.observers {
            observer.on_filter_changed(&state);
        }
    }

    // ── Cache ───────────────────────────────────────────────────────────────

    /// Drop every cache and reload it from the database.
    pub fn refresh_cache(&mut self) {
        self.cache.clear();
        let categories = self.cache.categories(&self.db).len();
        let books = self.cache.all_books(&self.db).len();
        if let Some(category) = self.current_category.clone() {
            self.cache.subjects_for(&self.db, &category);
        }
        log::info!("Cache refreshed: {} categories, {} books", categories, books);
    }

    /// Drop every cache; entries reload on next use.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        log::debug!("Cache cleared");
    }

    // ── Categories / Subjects ───────────────────────────────────────────────

    pub fn get_all_categories(&mut self) -> Vec<Category> {
        self.cache.categories(&self.db).to_vec()
    }

    pub fn get_category_names(&mut self) -> Vec<String> {
        self.cache
            .categories(&self.db)
            .iter()
            .filter(|c| c.is_valid())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Select a category (or none). Always clears the subject.
    pub fn set_current_category(&mut self, category: Option<&str>) {
        self.current_category = non_blank(category);
        self.current_subject = None;
        log::info!(
            "Category set to {}",
            self.current_category.as_deref().unwrap_or("<none>")
        );
        self.update_current_books();
        self.notify_filter_changed();
    }

    pub fn get_subjects_for_current_category(&mut self) -> Vec<Subject> {
        match &self.current_category {
            Some(category) => self.cache.subjects_for(&self.db, category).to_vec(),
            None => Vec::new(),
        }
    }

    pub fn get_subject_names_for_current_category(&mut self) -> Vec<String> {
        self.get_subjects_for_current_category()
            .into_iter()
            .filter(|s| s.is_valid())
            .map(|s| s.name)
            .collect()
    }

    /// Select a subject (or none, meaning every subject of the category).
    pub fn set_current_subject(&mut self, subject: Option<&str>) {
        self.current_subject = non_blank(subject);
        log::info!(
            "Subject set to {}",
            self.current_subject.as_deref().unwrap_or("<all>")
        );
        self.update_current_books();
        self.notify_filter_changed();
    }

    // ── Books ───────────────────────────────────────────────────────────────

    pub fn get_current_books(&self) -> &[Book] {
        &self.current_books
    }

    /// Title search that replaces the active list until cleared.
    ///
    /// A trimmed term shorter than two characters empties the list without
    /// touching the database.
    pub fn search_books(&mut self, term: &str) -> &[Book] {
        self.search_term = term.trim().to_string();
        if self.search_term.chars().count() < MIN_SEARCH_LEN {
            self.current_books.clear();
        } else {
            self.current_books = self.db.search_books(&self.search_term);
            log::info!(
                "Search for '{}' returned {} books",
                self.search_term,
                self.current_books.len()
            );
        }
        self.notify_books_changed();
        &self.current_books
    }

    /// Drop the search term and fall back to the category/subject view.
    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.update_current_books();
    }

    pub fn clear_all_filters(&mut self) {
        self.current_category = None;
        self.current_subject = None;
        self.search_term.clear();
        self.current_books.clear();
        self.notify_filter_changed();
        self.notify_books_changed();
    }

    /// Books in a category across all its subjects, ignoring the current filters.
    pub fn get_books_by_category(&mut self, category: &str) -> Vec<Book> {
        let category = normalize_text(category);
        self.books_in_category(&category)
    }

    /// A book from the current list, or from the database if it isn't listed.
    pub fn get_book_by_title(&self, title: &str) -> Option<Book> {
        let title = title.trim();
        self.current_books
            .iter()
            .find(|b| b.title == title)
            .cloned()
            .or_else(|| self.db.get_book_by_title(title))
    }

    /// Composite search. Leaves the active list and filters untouched.
    pub fn search_with_criteria(&mut self, criteria: &SearchCriteria) -> SearchResult {
        if criteria.min_rating > criteria.max_rating {
            return SearchResult::failed(format!(
                "Minimum rating {} exceeds maximum rating {}",
                criteria.min_rating, criteria.max_rating
            ));
        }
        let books = self.db.search_books_with_criteria(criteria);
        let total = self.cache.all_books(&self.db).len();
        let filtered = books.len();
        log::info!("Criteria search ({}) returned {} books", criteria.summary(), filtered);
        SearchResult::with_counts(books, Some(total.max(filtered)), Some(filtered))
    }

    fn update_current_books(&mut self) {
        if !self.search_term.is_empty() {
            return;
        }

        let category = self.current_category.clone();
        let subject = self.current_subject.clone();
        self.current_books = match (category, subject) {
            (Some(category), Some(subject)) => {
                self.db.get_books_by_category_subject(&category, &subject)
            }
            (None, Some(subject)) => self.db.get_books_by_subject(&subject),
            (Some(category), None) => self.books_in_category(&category),
            (None, None) => Vec::new(),
        };
        log::info!("Filter produced {} books", self.current_books.len());
        self.notify_books_changed();
    }

    /// Union of every subject's books, one query per subject, without duplicates.
    fn books_in_category(&mut self, category: &str) -> Vec<Book> {
        let subjects: Vec<String> = self
            .cache
            .subjects_for(&self.db, category)
            .iter()
            .map(|s| s.name.clone())
            .collect();

        let mut seen = HashSet::new();
        let mut books = Vec::new();
        for subject in &subjects {
            for book in self.db.get_books_by_category_subject(category, subject) {
                if seen.insert(book.identity_key()) {
                    books.push(book);
                }
            }
        }
        books
    }

    // ── Files ───────────────────────────────────────────────────────────────

    /// Open a book in the system viewer.
    ///
    /// Returns false if the title is unknown, its file is missing from both
    /// the primary and fallback locations, or the viewer fails to launch.
    pub fn open_book(&mut self, title: &str) -> bool {
        let Some(book) = self.get_book_by_title(title) else {
            log::warn!("Book not found: '{}'", title.trim());
            return false;
        };

        let Some(path) = self.locate_file(&book) else {
            log::warn!(
                "File not found for '{}' (looked in {} and {})",
                book.title,
                self.paths.books_dir.display(),
                self.paths.fallback_dir.display()
            );
            return false;
        };

        if let Err(e) = self.opener.open(&path) {
            log::error!("Failed to open book '{}': {}", book.title, e);
            return false;
        }

        self.db.update_last_opened(&book.title);
        for observer in &mut self.observers {
            observer.on_book_opened(&book);
        }
        log::info!("Opened book: {}", book.title);
        true
    }

    /// First existing location of a book's file: its own path, then the fallback.
    pub fn locate_file(&self, book: &Book) -> Option<PathBuf> {
        if let Some(path) = book.full_path(&self.paths.books_dir) {
            if path.is_file() {
                return Some(path);
            }
        }
        let fallback = self.paths.fallback_path(&book.title);
        fallback.is_file().then_some(fallback)
    }

    pub fn resolve_cover(&self, book: &Book) -> Option<PathBuf> {
        resolve_cover(book, &self.paths)
    }

    /// Check that every book in the current list has a file on disk.
    pub fn validate_book_files(&self) -> FileValidation {
        let mut result = FileValidation {
            total_books: self.current_books.len(),
            ..FileValidation::default()
        };
        for book in &self.current_books {
            if self.locate_file(book).is_some() {
                result.valid_files += 1;
            } else {
                result.missing.push(MissingFile {
                    title: book.display_title(),
                    expected_path: book
                        .full_path(&self.paths.books_dir)
                        .unwrap_or_else(|| self.paths.fallback_path(&book.title)),
                });
            }
        }
        log::info!(
            "File validation: {} valid, {} missing out of {} books",
            result.valid_files,
            result.missing_files(),
            result.total_books
        );
        result
    }

    // ── State / Statistics ──────────────────────────────────────────────────

    pub fn get_filter_state(&self) -> FilterState {
        FilterState {
            category: self.current_category.clone(),
            subject: self.current_subject.clone(),
            search_term: self.search_term.clone(),
            book_count: self.current_books.len(),
            has_active_filters: self.current_category.is_some()
                || self.current_subject.is_some()
                || !self.search_term.is_empty(),
        }
    }

    pub fn get_library_statistics(&mut self) -> LibraryStatistics {
        let total_categories = self.cache.categories(&self.db).len();
        let total_subjects = usize::try_from(self.db.get_database_stats().subjects).unwrap_or(0);
        let current_book_count = self.current_books.len();
        let books = self.cache.all_books(&self.db);

        let mut stats = LibraryStatistics {
            total_books: books.len(),
            total_categories,
            total_subjects,
            current_book_count,
            ..LibraryStatistics::default()
        };

        let mut authors = HashSet::new();
        let mut rating_sum = 0i64;
        let mut rated = 0i64;
        for book in books {
            let category = if book.category_name.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                book.category_name.clone()
            };
            *stats.category_distribution.entry(category).or_insert(0) += 1;

            if !book.author.is_empty() {
                authors.insert(normalize_key(&book.author));
            }
            if let Some(rating) = book.rating.filter(|r| *r > 0) {
                rating_sum += rating;
                rated += 1;
            }
            if !book.thumbnail_path.is_empty() {
                stats.books_with_thumbnails += 1;
            }
        }

        stats.total_authors = authors.len();
        stats.average_rating = (rated > 0).then(|| rating_sum as f64 / rated as f64);
        stats.largest_category = stats
            .category_distribution
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, count)| (name.clone(), *count));
        stats
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|v| !v.is_empty())
}
