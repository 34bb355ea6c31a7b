//! Commands that write to the catalog database.

use std::path::Path;

use bookshelf_catalog::{load_seed, load_seed_dir};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use crate::CliError;
use crate::settings::ResolvedLibrary;

fn open_existing(library: &ResolvedLibrary) -> Result<Connection, CliError> {
    bookshelf_db::open_database(&library.database).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database {}: {}",
            library.database.display(),
            e
        ))
    })
}

/// Load a seed file (or directory of seed files) into the database,
/// creating the database first if it doesn't exist.
pub(crate) fn run_seed(library: &ResolvedLibrary, source: &Path) -> Result<(), CliError> {
    let seed = if source.is_dir() {
        load_seed_dir(source)
    } else {
        load_seed(source)
    }
    .map_err(|e| CliError::seed(e.to_string()))?;

    let db_path = &library.database;
    let conn = if db_path.exists() {
        let conn = open_existing(library)?;
        bookshelf_db::create_schema(&conn)
            .map_err(|e| CliError::database(format!("Failed to create schema: {}", e)))?;
        conn
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("Creating catalog database at {}", db_path.display());
        bookshelf_db::create_database(db_path)
            .map_err(|e| CliError::database(format!("Failed to create database: {}", e)))?
    };

    let stats = bookshelf_db::seed_from_library(&conn, &seed)
        .map_err(|e| CliError::database(format!("Seeding failed: {}", e)))?;

    log::info!(
        "{} {} categories, {} subjects, {} books from {}",
        "Seeded".if_supports_color(Stdout, |t| t.green()),
        stats.categories,
        stats.subjects,
        stats.books,
        source.display(),
    );
    Ok(())
}

/// Link books stored with text category/subject columns to real rows.
pub(crate) fn run_normalize_flat(library: &ResolvedLibrary) -> Result<(), CliError> {
    let conn = open_existing(library)?;
    let stats = bookshelf_db::normalize_flat_schema(&conn)
        .map_err(|e| CliError::database(format!("Normalization failed: {}", e)))?;

    if !stats.flat_layout_found {
        log::info!(
            "{}",
            "Books table has no text category column; nothing to do"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }
    log::info!("{}", "Flat layout normalized".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Categories created: {:>6}", stats.categories_created);
    log::info!("  Subjects created:   {:>6}", stats.subjects_created);
    log::info!("  Books linked:       {:>6}", stats.books_linked);
    Ok(())
}

/// Add any optional `books` columns an older database lacks.
pub(crate) fn run_upgrade(library: &ResolvedLibrary) -> Result<(), CliError> {
    let conn = open_existing(library)?;
    let added = bookshelf_db::ensure_optional_columns(&conn)
        .map_err(|e| CliError::database(format!("Upgrade failed: {}", e)))?;

    if added.is_empty() {
        log::info!(
            "{}",
            "Database already has every optional column".if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else {
        log::info!(
            "{} {}",
            "Added columns:".if_supports_color(Stdout, |t| t.green()),
            added.join(", "),
        );
    }
    Ok(())
}
