//! Category and subject navigation.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::ResolvedLibrary;

use super::{open_service, print_books, print_json};

pub(crate) fn run_categories(library: &ResolvedLibrary, json: bool) -> Result<(), CliError> {
    let mut service = open_service(library)?;
    let categories = service.get_all_categories();
    if json {
        return print_json(&categories);
    }

    log::info!("{}", "Categories".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    if categories.is_empty() {
        log::info!("{}", "No categories".if_supports_color(Stdout, |t| t.dimmed()));
    }
    for category in &categories {
        log::info!("  {}", category.display_name());
    }
    Ok(())
}

pub(crate) fn run_subjects(
    library: &ResolvedLibrary,
    category: &str,
    json: bool,
) -> Result<(), CliError> {
    let mut service = open_service(library)?;
    if service.db().get_category_by_name(category).is_none() {
        return Err(CliError::not_found(format!("category '{}'", category)));
    }
    service.set_current_category(Some(category));
    let subjects = service.get_subjects_for_current_category();
    if json {
        return print_json(&subjects);
    }

    log::info!(
        "{} {}",
        "Subjects in".if_supports_color(Stdout, |t| t.bold()),
        category.if_supports_color(Stdout, |t| t.cyan()),
    );
    crate::log_blank();
    if subjects.is_empty() {
        log::info!("{}", "No subjects".if_supports_color(Stdout, |t| t.dimmed()));
    }
    for subject in &subjects {
        match subject.book_count {
            Some(count) => log::info!("  {} ({} books)", subject.name, count),
            None => log::info!("  {}", subject.name),
        }
    }
    Ok(())
}

/// Show the book list for a category, optionally narrowed to one subject.
pub(crate) fn run_browse(
    library: &ResolvedLibrary,
    category: &str,
    subject: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let mut service = open_service(library)?;
    if service.db().get_category_by_name(category).is_none() {
        return Err(CliError::not_found(format!("category '{}'", category)));
    }
    service.set_current_category(Some(category));
    if let Some(subject) = subject {
        service.set_current_subject(Some(subject));
    }

    if json {
        return print_books(service.get_current_books(), true);
    }

    log::info!(
        "{}",
        service
            .get_filter_state()
            .summary()
            .if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    print_books(service.get_current_books(), false)
}
