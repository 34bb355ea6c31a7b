use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::ResolvedLibrary;

use super::{open_service, print_json};

pub(crate) fn run_stats(library: &ResolvedLibrary, json: bool) -> Result<(), CliError> {
    let mut service = open_service(library)?;
    let stats = service.get_library_statistics();
    if json {
        return print_json(&stats);
    }

    log::info!(
        "{}",
        "Library Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", library.database.display());
    crate::log_blank();
    log::info!("  Books:          {:>8}", stats.total_books);
    log::info!("  Categories:     {:>8}", stats.total_categories);
    log::info!("  Subjects:       {:>8}", stats.total_subjects);
    log::info!("  Authors:        {:>8}", stats.total_authors);
    log::info!("  With covers:    {:>8}", stats.books_with_thumbnails);
    match stats.average_rating {
        Some(avg) => log::info!("  Avg rating:     {:>8.2}", avg),
        None => log::info!("  Avg rating:     {:>8}", "-"),
    }

    if !stats.category_distribution.is_empty() {
        crate::log_blank();
        log::info!("{}", "By category".if_supports_color(Stdout, |t| t.bold()));
        for (name, count) in &stats.category_distribution {
            log::info!("  {:<24} {:>6}", name, count);
        }
    }
    if let Some((name, count)) = &stats.largest_category {
        crate::log_blank();
        log::info!(
            "  Largest: {} ({} books)",
            name.if_supports_color(Stdout, |t| t.cyan()),
            count
        );
    }
    Ok(())
}
