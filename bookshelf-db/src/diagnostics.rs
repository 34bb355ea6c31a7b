//! Integrity checks and row counts.

use rusqlite::Connection;

use crate::queries::QueryError;
use crate::schema::{table_exists, BookSchema, REQUIRED_TABLES};

/// Row counts of the three catalog tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    pub categories: i64,
    pub subjects: i64,
    pub books: i64,
}

pub fn database_stats(conn: &Connection) -> Result<DatabaseStats, QueryError> {
    let count = |table: &str| -> Result<i64, QueryError> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?)
    };
    Ok(DatabaseStats {
        categories: count("categories")?,
        subjects: count("subjects")?,
        books: count("books")?,
    })
}

/// Check the database for structural problems. An empty list means healthy.
///
/// Never fails: a check that can't run is itself reported as an issue.
pub fn validate_database(conn: &Connection) -> Vec<String> {
    match collect_issues(conn) {
        Ok(issues) => issues,
        Err(e) => vec![format!("Database validation failed: {e}")],
    }
}

fn collect_issues(conn: &Connection) -> Result<Vec<String>, QueryError> {
    let mut issues = Vec::new();

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            issues.push(format!("Missing required table: {table}"));
        }
    }
    if !issues.is_empty() {
        return Ok(issues);
    }

    let orphaned: i64 = conn.query_row(
        "SELECT COUNT(*) FROM subjects s
         LEFT JOIN categories c ON s.category_id = c.id
         WHERE c.id IS NULL",
        [],
        |row| row.get(0),
    )?;
    if orphaned > 0 {
        issues.push(format!("Found {orphaned} orphaned subjects"));
    }

    let schema = BookSchema::probe(conn)?;
    if !schema.is_relational() && schema.flat_category.is_some() {
        issues.push(
            "Books table uses text category/subject columns; run normalize-flat to link them"
                .to_string(),
        );
    }

    Ok(issues)
}
