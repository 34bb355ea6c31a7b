use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{self, LibrarySettings, ResolvedLibrary, Settings};

/// Show the effective library locations and the settings file they came from.
pub(crate) fn run_config_show(library: &ResolvedLibrary) {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "Bookshelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let database_state = if library.database.is_file() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.red()).to_string()
    };
    log::info!(
        "  Database:     {} {}",
        library.database.display(),
        database_state
    );
    log::info!("  Books dir:    {}", library.paths.books_dir.display());
    log::info!("  Fallback dir: {}", library.paths.fallback_dir.display());
    for (i, dir) in library.paths.cover_dirs.iter().enumerate() {
        let label = if i == 0 { "Cover dirs:" } else { "" };
        log::info!("  {:<13} {}", label, dir.display());
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings::settings_path().display());
}

/// Write the effective locations to the settings file unless one exists.
pub(crate) fn run_config_init(library: &ResolvedLibrary, force: bool) -> Result<(), CliError> {
    let path = settings::settings_path();
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let settings = Settings {
        library: LibrarySettings {
            database: Some(library.database.clone()),
            books_dir: Some(library.paths.books_dir.clone()),
            fallback_dir: Some(library.paths.fallback_dir.clone()),
            cover_dirs: Some(library.paths.cover_dirs.clone()),
        },
    };
    settings::save_settings_to(&path, &settings)?;
    log::info!(
        "{} {}",
        "Wrote".if_supports_color(Stdout, |t| t.green()),
        path.display()
    );
    Ok(())
}
