//! Write operations: inserts, seeding, and the `last_opened` touch.

use bookshelf_catalog::normalize::normalize_text;
use bookshelf_catalog::types::Book;
use bookshelf_catalog::yaml::LibrarySeed;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::queries::QueryError;
use crate::schema::{BookSchema, quote_ident};

// ── Categories / Subjects ───────────────────────────────────────────────────

/// Find a category by name (case-insensitive) or insert it. Returns its id.
pub fn insert_category(conn: &Connection, name: &str) -> Result<i64, QueryError> {
    let name = normalize_text(name);
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE category = ?1 COLLATE NOCASE",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute("INSERT INTO categories (category) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

/// Find a subject of `category_id` by name (case-insensitive) or insert it.
pub fn insert_subject(conn: &Connection, category_id: i64, name: &str) -> Result<i64, QueryError> {
    let name = normalize_text(name);
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM subjects WHERE category_id = ?1 AND subject = ?2 COLLATE NOCASE",
            params![category_id, name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO subjects (category_id, subject) VALUES (?1, ?2)",
        params![category_id, name],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Books ───────────────────────────────────────────────────────────────────

/// Insert a book, writing only the optional columns this database has.
pub fn insert_book(conn: &Connection, schema: &BookSchema, book: &Book) -> Result<i64, QueryError> {
    let mut columns: Vec<String> = vec!["title".to_string()];
    let mut values: Vec<Value> = vec![Value::Text(book.title.clone())];

    let mut push = |column: &Option<String>, value: Value| {
        if let Some(name) = column {
            columns.push(quote_ident(name));
            values.push(value);
        }
    };

    push(&schema.author, text_or_null(&book.author));
    push(&schema.file_name, text_or_null(&book.file_name));
    push(&schema.file_path, text_or_null(&book.file_path));
    push(&schema.thumbnail_path, text_or_null(&book.thumbnail_path));
    push(
        &schema.file_size,
        book.file_size
            .and_then(|n| i64::try_from(n).ok())
            .map_or(Value::Null, Value::Integer),
    );
    push(&schema.rating, book.rating.map_or(Value::Null, Value::Integer));
    push(&schema.category_id, book.category_id.map_or(Value::Null, Value::Integer));
    push(&schema.subject_id, book.subject_id.map_or(Value::Null, Value::Integer));

    let placeholders = vec!["?"; columns.len()].join(", ");
    conn.execute(
        &format!(
            "INSERT INTO books ({}) VALUES ({})",
            columns.join(", "),
            placeholders
        ),
        params_from_iter(values.iter()),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Stamp `last_opened` with the current time for books with this title.
///
/// Returns the number of rows updated; zero when the column doesn't exist.
pub fn touch_last_opened(
    conn: &Connection,
    schema: &BookSchema,
    title: &str,
) -> Result<usize, QueryError> {
    let Some(column) = &schema.last_opened else {
        log::debug!("books has no last_opened column, skipping update");
        return Ok(0);
    };
    let updated = conn.execute(
        &format!(
            "UPDATE books SET {} = datetime('now') WHERE title = ?1",
            quote_ident(column)
        ),
        params![title],
    )?;
    Ok(updated)
}

// ── Seeding ─────────────────────────────────────────────────────────────────

/// Insert every category, subject, and book of a seed.
///
/// Categories and subjects that already exist are reused, so seeding twice
/// only duplicates books.
pub fn seed_from_library(conn: &Connection, seed: &LibrarySeed) -> Result<SeedStats, QueryError> {
    let schema = BookSchema::probe(conn)?;
    let mut stats = SeedStats::default();

    for category in &seed.categories {
        let category_id = insert_category(conn, &category.name)?;
        stats.categories += 1;

        for subject in &category.subjects {
            let subject_id = insert_subject(conn, category_id, &subject.name)?;
            stats.subjects += 1;

            for seed_book in &subject.books {
                let title = normalize_text(&seed_book.title);
                let book = Book {
                    file_name: seed_book
                        .file_name
                        .clone()
                        .unwrap_or_else(|| format!("{title}.pdf")),
                    title,
                    author: seed_book.author.clone().unwrap_or_default(),
                    file_path: seed_book.file_path.clone().unwrap_or_default(),
                    thumbnail_path: seed_book.thumbnail_path.clone().unwrap_or_default(),
                    file_size: seed_book.file_size,
                    rating: seed_book.rating,
                    category_id: Some(category_id),
                    subject_id: Some(subject_id),
                    ..Book::default()
                };
                insert_book(conn, &schema, &book)?;
                stats.books += 1;
            }
        }
    }

    log::info!(
        "Seeded {} categories, {} subjects, {} books",
        stats.categories,
        stats.subjects,
        stats.books
    );
    Ok(stats)
}

/// Statistics from seeding the database.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedStats {
    pub categories: usize,
    pub subjects: usize,
    pub books: usize,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn text_or_null(s: &str) -> Value {
    if s.trim().is_empty() {
        Value::Null
    } else {
        Value::Text(s.to_string())
    }
}
