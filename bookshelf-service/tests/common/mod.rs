#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bookshelf_catalog::types::Book;
use bookshelf_catalog::LibraryPaths;
use bookshelf_db::{open_memory, CatalogDb};
use bookshelf_service::*;

/// Two categories, three subjects, five books (one uncategorized).
pub fn library_db() -> CatalogDb {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO categories (id, category) VALUES (1, 'Programming'), (2, 'Science');
         INSERT INTO subjects (id, category_id, subject) VALUES
            (1, 1, 'Python'), (2, 1, 'Rust'), (3, 2, 'Physics');
         INSERT INTO books (id, title, author, category_id, subject_id, FileName, rating, ThumbnailPath) VALUES
            (1, 'Learning Python', 'Mark Lutz', 1, 1, 'learning_python.pdf', 5, NULL),
            (2, 'The Rust Book', 'Steve Klabnik', 1, 2, 'rust_book.pdf', 4, '/covers/rust.png'),
            (3, 'Python Tricks', 'Guido van Rossum', 1, 1, 'python_tricks.pdf', 0, NULL),
            (4, 'Feynman Lectures', 'Richard Feynman', 2, 3, 'feynman.pdf', 3, NULL),
            (5, 'Loose Notes', NULL, NULL, NULL, 'notes.pdf', NULL, NULL);",
    )
    .unwrap();
    CatalogDb::from_connection(conn).unwrap()
}

pub fn service(db: CatalogDb, root: &Path) -> CatalogService {
    CatalogService::new(db, LibraryPaths::rooted_at(root)).with_opener(RecordingOpener::default())
}

pub fn titles(books: &[Book]) -> Vec<String> {
    books.iter().map(|b| b.title.clone()).collect()
}

/// Records every path it is asked to open.
#[derive(Clone, Default)]
pub struct RecordingOpener {
    pub opened: Rc<RefCell<Vec<PathBuf>>>,
    pub fail: bool,
}

impl BookOpener for RecordingOpener {
    fn open(&mut self, path: &Path) -> Result<(), OpenError> {
        if self.fail {
            return Err(OpenError::Launch {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no viewer"),
            });
        }
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Appends `<name>:<event>:<detail>` to a shared log.
#[derive(Clone)]
pub struct Recorder {
    pub name: &'static str,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl CatalogObserver for Recorder {
    fn on_books_changed(&mut self, books: &[Book]) {
        self.log
            .borrow_mut()
            .push(format!("{}:books:{}", self.name, books.len()));
    }

    fn on_filter_changed(&mut self, state: &FilterState) {
        self.log.borrow_mut().push(format!(
            "{}:filter:{}",
            self.name,
            state.category.clone().unwrap_or_default()
        ));
    }

    fn on_book_opened(&mut self, book: &Book) {
        self.log
            .borrow_mut()
            .push(format!("{}:opened:{}", self.name, book.title));
    }
}
