//! Lazily filled read caches.
//!
//! Nothing here expires on its own. Entries are filled on first use and
//! stay until [`CatalogCache::clear`] is called.

use std::collections::BTreeMap;

use bookshelf_catalog::normalize::normalize_key;
use bookshelf_catalog::types::{Book, Category, Subject};
use bookshelf_db::CatalogDb;

#[derive(Debug, Default)]
pub struct CatalogCache {
    categories: Option<Vec<Category>>,
    all_books: Option<Vec<Book>>,
    /// Keyed by lower-cased category name.
    category_subjects: Option<BTreeMap<String, Vec<Subject>>>,
}

impl CatalogCache {
    pub fn clear(&mut self) {
        self.categories = None;
        self.all_books = None;
        self.category_subjects = None;
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_none() && self.all_books.is_none() && self.category_subjects.is_none()
    }

    pub fn categories(&mut self, db: &CatalogDb) -> &[Category] {
        self.categories.get_or_insert_with(|| {
            let categories = db.get_all_categories();
            log::debug!("Cached {} categories", categories.len());
            categories
        })
    }

    pub fn all_books(&mut self, db: &CatalogDb) -> &[Book] {
        self.all_books.get_or_insert_with(|| {
            let books = db.get_all_books();
            log::debug!("Cached {} books", books.len());
            books
        })
    }

    /// Subjects of `category` from the single grouped category/subject query.
    pub fn subjects_for(&mut self, db: &CatalogDb, category: &str) -> &[Subject] {
        let map = self.category_subjects.get_or_insert_with(|| {
            let map = db.get_category_subject_map();
            log::debug!("Cached subjects for {} categories", map.len());
            map
        });
        map.get(&normalize_key(category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
