use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::ResolvedLibrary;

use super::open_service;

pub(crate) fn run_open(library: &ResolvedLibrary, title: &str) -> Result<(), CliError> {
    let mut service = open_service(library)?;

    let Some(book) = service.get_book_by_title(title) else {
        return Err(CliError::not_found(format!("book '{}'", title.trim())));
    };
    if !service.open_book(&book.title) {
        return Err(CliError::other(format!(
            "Could not open '{}'",
            book.display_title()
        )));
    }

    log::info!(
        "{} {}",
        "Opened".if_supports_color(Stdout, |t| t.green()),
        book.display_title().if_supports_color(Stdout, |t| t.bold()),
    );
    if let Some(cover) = service.resolve_cover(&book) {
        log::info!("  Cover: {}", cover.display());
    }
    Ok(())
}
