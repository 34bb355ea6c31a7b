//! Database integrity and book-file presence checks.

use bookshelf_catalog::validate_book;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::ResolvedLibrary;

use super::open_service;

/// Report structural database issues and books whose files are missing.
///
/// With `category` set only that category's books are checked for files.
/// Fails when any issue was found so scripts can test the exit code.
pub(crate) fn run_validate(
    library: &ResolvedLibrary,
    category: Option<&str>,
) -> Result<(), CliError> {
    let mut service = open_service(library)?;

    log::info!("{}", "Database".if_supports_color(Stdout, |t| t.bold()));
    let db_issues = service.db().validate_database();
    if db_issues.is_empty() {
        log::info!("  {}", "OK".if_supports_color(Stdout, |t| t.green()));
    }
    for issue in &db_issues {
        log::info!("  {} {}", "!".if_supports_color(Stdout, |t| t.red()), issue);
    }
    crate::log_blank();

    let books = match category {
        Some(category) => {
            service.set_current_category(Some(category));
            service.get_current_books().to_vec()
        }
        None => service.db().get_all_books(),
    };

    log::info!("{}", "Records".if_supports_color(Stdout, |t| t.bold()));
    let mut record_issues = 0usize;
    for book in &books {
        for issue in validate_book(book) {
            record_issues += 1;
            log::info!(
                "  {} {}: {}",
                "!".if_supports_color(Stdout, |t| t.yellow()),
                book.display_title(),
                issue
            );
        }
    }

    if record_issues == 0 {
        log::info!("  {}", "OK".if_supports_color(Stdout, |t| t.green()));
    }
    crate::log_blank();

    log::info!("{}", "Files".if_supports_color(Stdout, |t| t.bold()));
    let mut missing = 0usize;
    for book in &books {
        if service.locate_file(book).is_none() {
            missing += 1;
            let expected = book
                .full_path(&service.paths().books_dir)
                .unwrap_or_else(|| service.paths().fallback_path(&book.title));
            log::info!(
                "  {} {} ({})",
                "missing".if_supports_color(Stdout, |t| t.red()),
                book.display_title(),
                expected.display().if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    log::info!(
        "  {} of {} book files present",
        books.len() - missing,
        books.len()
    );

    let total = db_issues.len() + record_issues + missing;
    if total > 0 {
        return Err(CliError::other(format!("{} issues found", total)));
    }
    Ok(())
}
