mod common;

use std::path::Path;

use bookshelf_db::*;
use common::setup_db;

#[test]
fn healthy_database_has_no_issues() {
    let db = CatalogDb::from_connection(setup_db()).unwrap();
    assert!(db.validate_database().is_empty());
}

#[test]
fn orphaned_subject_is_reported() {
    let conn = setup_db();
    conn.execute("DELETE FROM categories WHERE id = 2", []).unwrap();
    let db = CatalogDb::from_connection(conn).unwrap();

    let issues = db.validate_database();
    assert_eq!(issues, vec!["Found 1 orphaned subjects".to_string()]);
    // Validation never blocks reads.
    assert_eq!(db.get_all_categories().len(), 2);
}

#[test]
fn missing_tables_are_reported() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT);")
        .unwrap();
    let issues = validate_database(&conn);
    assert_eq!(
        issues,
        vec![
            "Missing required table: categories".to_string(),
            "Missing required table: subjects".to_string()
        ]
    );
}

#[test]
fn flat_layout_is_flagged() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, category TEXT);
         CREATE TABLE subjects (id INTEGER PRIMARY KEY, category_id INTEGER, subject TEXT);
         CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT, category TEXT, subject TEXT);",
    )
    .unwrap();
    let issues = validate_database(&conn);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].contains("normalize-flat"));
}

#[test]
fn stats_count_rows() {
    let db = CatalogDb::from_connection(setup_db()).unwrap();
    let stats = db.get_database_stats();
    assert_eq!(
        stats,
        DatabaseStats {
            categories: 3,
            subjects: 3,
            books: 5
        }
    );
}

#[test]
fn query_failures_degrade_to_empty() {
    let db = CatalogDb::from_connection(setup_db()).unwrap();
    db.connection().execute_batch("DROP TABLE books;").unwrap();

    assert!(db.get_all_books().is_empty());
    assert!(db.search_books("python").is_empty());
    assert!(db.get_book_by_title("Learning Python").is_none());
    assert_eq!(db.get_database_stats(), DatabaseStats::default());
    db.update_last_opened("Learning Python");
}

#[test]
fn every_call_is_counted() {
    let db = CatalogDb::from_connection(setup_db()).unwrap();
    assert_eq!(db.query_count(), 0);
    db.get_all_categories();
    db.search_books("rust");
    assert_eq!(db.query_count(), 2);
}

#[test]
fn refresh_schema_sees_new_columns() {
    let mut db = CatalogDb::from_connection(common::legacy_db()).unwrap();
    assert!(db.schema().author.is_none());
    ensure_optional_columns(db.connection()).unwrap();
    db.refresh_schema();
    assert_eq!(db.schema().author.as_deref(), Some("author"));
}

#[test]
fn open_fails_on_missing_file() {
    let result = CatalogDb::open(Path::new("/nonexistent/dir/library.db"));
    assert!(matches!(
        result,
        Err(DbError::Schema(SchemaError::NotFound(_)))
    ));
}

#[test]
fn empty_connection_is_rejected() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(matches!(
        CatalogDb::from_connection(conn),
        Err(DbError::Schema(SchemaError::Empty(_)))
    ));
}
