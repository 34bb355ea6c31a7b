use std::path::{Path, PathBuf};

use bookshelf_catalog::LibraryPaths;
use serde::{Deserialize, Serialize};

/// Database locations tried, in order, when neither a flag nor the settings
/// file names one. Relative to the working directory.
pub(crate) const DATABASE_CANDIDATES: &[&str] = &[
    "Assets/my_library.db",
    "Data/Databases/my_library.db",
    "my_library.db",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub(crate) struct Settings {
    #[serde(default)]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub(crate) struct LibrarySettings {
    pub database: Option<PathBuf>,
    pub books_dir: Option<PathBuf>,
    pub fallback_dir: Option<PathBuf>,
    pub cover_dirs: Option<Vec<PathBuf>>,
}

/// Where the catalog lives once flags, settings, and defaults are combined.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedLibrary {
    pub database: PathBuf,
    pub paths: LibraryPaths,
}

impl Settings {
    /// Combine with command-line overrides. Flags win over the file, the file
    /// wins over built-in defaults.
    pub(crate) fn resolve(
        &self,
        database: Option<PathBuf>,
        books_dir: Option<PathBuf>,
        base: &Path,
    ) -> ResolvedLibrary {
        let database = database
            .or_else(|| self.library.database.clone())
            .unwrap_or_else(|| default_database(base));

        let defaults = LibraryPaths::default();
        let paths = LibraryPaths {
            books_dir: books_dir
                .or_else(|| self.library.books_dir.clone())
                .unwrap_or(defaults.books_dir),
            fallback_dir: self
                .library
                .fallback_dir
                .clone()
                .unwrap_or(defaults.fallback_dir),
            cover_dirs: self
                .library
                .cover_dirs
                .clone()
                .unwrap_or(defaults.cover_dirs),
        };

        ResolvedLibrary { database, paths }
    }
}

/// First existing candidate under `base`, or the first candidate if none exist.
pub(crate) fn default_database(base: &Path) -> PathBuf {
    DATABASE_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_file())
        .unwrap_or_else(|| base.join(DATABASE_CANDIDATES[0]))
}

/// Returns `~/.config/bookshelf/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("bookshelf").join("settings.toml")
}

/// Load settings from disk, returning defaults if missing or corrupt.
pub(crate) fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub(crate) fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to disk atomically (write to temp, then rename).
pub(crate) fn save_settings_to(path: &Path, settings: &Settings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(settings).map_err(std::io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
