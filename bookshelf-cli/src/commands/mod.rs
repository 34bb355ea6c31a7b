pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod maintenance;
pub(crate) mod open;
pub(crate) mod search;
pub(crate) mod stats;
pub(crate) mod validate;

use bookshelf_catalog::{Book, MAX_RATING};
use bookshelf_db::CatalogDb;
use bookshelf_service::{CatalogService, LogObserver};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use crate::CliError;
use crate::settings::ResolvedLibrary;

/// Open the catalog database and wrap it in a service with logging observers.
pub(crate) fn open_service(library: &ResolvedLibrary) -> Result<CatalogService, CliError> {
    let db = CatalogDb::open(&library.database).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database {}: {}",
            library.database.display(),
            e
        ))
    })?;
    let mut service = CatalogService::new(db, library.paths.clone());
    service.add_observer(LogObserver);
    Ok(service)
}

/// Write `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::other(format!("Failed to encode JSON: {}", e)))?;
    println!("{json}");
    Ok(())
}

/// List books either as JSON or as one formatted line each.
pub(crate) fn print_books(books: &[Book], json: bool) -> Result<(), CliError> {
    if json {
        return print_json(books);
    }
    if books.is_empty() {
        log::info!("{}", "No books".if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    }
    for book in books {
        log_book(book);
    }
    Ok(())
}

fn log_book(book: &Book) {
    let author = if book.author.is_empty() {
        String::new()
    } else {
        format!(" by {}", book.author)
    };
    let rating = match book.rating {
        Some(r) if r > 0 => format!(" {}", "*".repeat(r.min(MAX_RATING) as usize)),
        _ => String::new(),
    };
    log::info!(
        "  {}{} [{}]{}",
        book.display_title().if_supports_color(Stdout, |t| t.bold()),
        author,
        book.category_subject_display()
            .if_supports_color(Stdout, |t| t.cyan()),
        rating.if_supports_color(Stdout, |t| t.yellow()),
    );
}
