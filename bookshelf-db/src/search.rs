//! Composite search built from [`SearchCriteria`].
//!
//! The query is an `AND` of optional predicate groups, each of which is an
//! `OR` across fields or values:
//!
//! ```text
//! (title LIKE ? OR author LIKE ? ...)   -- free text
//! AND (category = ? OR ...)             -- categories
//! AND (author = ? OR author LIKE ? ...) -- authors
//! AND (subject = ? OR ...)              -- subjects
//! AND (rating BETWEEN ? AND ?)          -- rating
//! ```
//!
//! Only column names read from the database's own catalog are interpolated.
//! Every user value is a bound parameter.

use bookshelf_catalog::types::{Book, SearchCriteria, SortField};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::queries::{like_pattern, query_books, QueryError};
use crate::schema::{BookSchema, quote_ident};

/// A built query and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Build the composite query for `criteria` against this schema.
///
/// Needs the connection because each requested author is first probed for
/// an exact match; only authors without one fall back to substring matching.
pub fn build_search_query(
    conn: &Connection,
    schema: &BookSchema,
    criteria: &SearchCriteria,
) -> Result<SearchQuery, QueryError> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    // Free text
    let text = criteria.search_text.trim();
    if !text.is_empty() {
        let mut fields: Vec<String> = Vec::new();
        if criteria.search_title {
            fields.push("b.title".to_string());
        }
        if criteria.search_author {
            fields.extend(BookSchema::column_expr(&schema.author));
        }
        if criteria.search_subject {
            fields.extend(schema.subject_name_expr());
        }
        if criteria.search_keywords {
            fields.extend(BookSchema::column_expr(&schema.keywords));
        }
        if criteria.search_description {
            fields.extend(BookSchema::column_expr(&schema.description));
        }

        if !fields.is_empty() {
            let pattern = like_pattern(text);
            let ors: Vec<String> = fields
                .iter()
                .map(|f| format!("{f} LIKE ? ESCAPE '\\'"))
                .collect();
            values.extend(fields.iter().map(|_| Value::Text(pattern.clone())));
            clauses.push(format!("({})", ors.join(" OR ")));
        }
    }

    // Categories
    let categories = non_blank(&criteria.categories);
    if !categories.is_empty() {
        clauses.push(equality_group(
            schema.category_name_expr(),
            &categories,
            &mut values,
        ));
    }

    // Authors
    let authors = non_blank(&criteria.authors);
    if !authors.is_empty() {
        match &schema.author {
            Some(column) => {
                let col = quote_ident(column);
                let mut ors = Vec::with_capacity(authors.len());
                for author in &authors {
                    if author_exists(conn, &col, author)? {
                        ors.push(format!("b.{col} = ?"));
                        values.push(Value::Text(author.to_string()));
                    } else {
                        ors.push(format!("b.{col} LIKE ? ESCAPE '\\'"));
                        values.push(Value::Text(like_pattern(author)));
                    }
                }
                clauses.push(format!("({})", ors.join(" OR ")));
            }
            None => {
                log::debug!("Author filter requested but books has no author column");
                clauses.push("(0)".to_string());
            }
        }
    }

    // Subjects
    let subjects = non_blank(&criteria.subjects);
    if !subjects.is_empty() {
        clauses.push(equality_group(
            schema.subject_name_expr(),
            &subjects,
            &mut values,
        ));
    }

    // Rating
    if criteria.has_rating_filter() {
        if let Some(expr) = BookSchema::column_expr(&schema.rating) {
            clauses.push(format!("({expr} BETWEEN ? AND ?)"));
            values.push(Value::Integer(criteria.min_rating));
            values.push(Value::Integer(criteria.max_rating));
        }
    }

    let mut sql = schema.select_books_sql();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let order = criteria.sort_order.as_sql();
    sql.push_str(&format!(
        " ORDER BY {} COLLATE NOCASE {}",
        sort_column(schema, criteria.sort_by),
        order
    ));
    if criteria.sort_by != SortField::Title {
        sql.push_str(", b.title COLLATE NOCASE ASC");
    }

    if let Some(limit) = criteria.limit.filter(|&l| l > 0) {
        sql.push_str(" LIMIT ?");
        values.push(Value::Integer(i64::from(limit)));
        if criteria.offset > 0 {
            sql.push_str(" OFFSET ?");
            values.push(Value::Integer(i64::from(criteria.offset)));
        }
    }

    Ok(SearchQuery {
        sql,
        params: values,
    })
}

/// Run the composite search.
pub fn search_with_criteria(
    conn: &Connection,
    schema: &BookSchema,
    criteria: &SearchCriteria,
) -> Result<Vec<Book>, QueryError> {
    let query = build_search_query(conn, schema, criteria)?;
    log::debug!("Criteria search: {}", criteria.summary());
    query_books(conn, &query.sql, params_from_iter(query.params.iter()))
}

/// Column expression a sort field orders by.
///
/// Falls back to title when the column is absent.
fn sort_column(schema: &BookSchema, field: SortField) -> String {
    match field {
        SortField::Title => "b.title".to_string(),
        SortField::Author => {
            BookSchema::column_expr(&schema.author).unwrap_or_else(|| "b.title".to_string())
        }
        SortField::Category => schema
            .category_name_expr()
            .unwrap_or_else(|| "b.title".to_string()),
        SortField::Subject => schema
            .subject_name_expr()
            .unwrap_or_else(|| "b.title".to_string()),
    }
}

/// `(expr = ? OR ...)` over `names`; matches nothing when there is no column to compare.
fn equality_group(expr: Option<String>, names: &[&str], values: &mut Vec<Value>) -> String {
    let Some(expr) = expr else {
        return "(0)".to_string();
    };
    let ors = vec![format!("{expr} = ?"); names.len()];
    values.extend(names.iter().map(|n| Value::Text(n.to_string())));
    format!("({})", ors.join(" OR "))
}

fn author_exists(conn: &Connection, quoted_column: &str, author: &str) -> Result<bool, QueryError> {
    let found: Option<i64> = conn
        .query_row(
            &format!("SELECT 1 FROM books WHERE {quoted_column} = ?1 LIMIT 1"),
            params![author],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn non_blank(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}
