//! Library catalog data model, text normalization, validation, and seed I/O.
//!
//! This crate defines the book/category/subject model without any database
//! dependencies. Consumers can use these types directly for display, or pass
//! them to `bookshelf-db` for persistence and querying.

pub mod files;
pub mod normalize;
pub mod types;
pub mod validate;
pub mod yaml;

pub use files::{LibraryPaths, resolve_cover, COVER_EXTENSIONS};
pub use normalize::{normalize_key, normalize_text};
pub use types::*;
pub use validate::{
    has_document_extension, validate_book, validate_category, validate_subject,
    DOCUMENT_EXTENSIONS,
};
pub use yaml::{load_seed, load_seed_dir, LibrarySeed, SeedBook, SeedCategory, SeedSubject, YamlError};
