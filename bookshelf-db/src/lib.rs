//! SQLite persistence layer for the library catalog.
//!
//! Provides schema creation and probing, tolerant row mapping, read queries,
//! the composite criteria search, and the [`CatalogDb`] facade that the
//! service layer talks to. Backed by rusqlite with the bundled feature.

pub mod diagnostics;
pub mod flat;
pub mod operations;
pub mod queries;
pub mod row;
pub mod schema;
pub mod search;
pub mod store;

pub use diagnostics::{database_stats, validate_database, DatabaseStats};
pub use flat::{normalize_flat_schema, FlatImportStats};
pub use operations::{
    insert_book, insert_category, insert_subject, seed_from_library, touch_last_opened, SeedStats,
};
pub use queries::QueryError;
pub use row::{RowColumns, RowMapper};
pub use schema::{
    create_database, create_schema, ensure_optional_columns, open_database, open_memory,
    BookSchema, SchemaError,
};
pub use search::{build_search_query, search_with_criteria, SearchQuery};
pub use store::{CatalogDb, DbError};
