//! YAML seed files describing a catalog tree.
//!
//! A seed lists categories, their subjects, and the books filed under each
//! subject. It is how a fresh database gets its first contents:
//!
//! ```yaml
//! categories:
//!   - name: Programming
//!     subjects:
//!       - name: Python
//!         books:
//!           - title: Learning Python
//!             author: Mark Lutz
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

/// Root of a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySeed {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<SeedSubject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSubject {
    pub name: String,
    #[serde(default)]
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBook {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Defaults to `<title>.pdf` when omitted.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl LibrarySeed {
    pub fn book_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.subjects)
            .map(|s| s.books.len())
            .sum()
    }

    /// Append another seed's categories after this one's.
    pub fn merge(&mut self, other: LibrarySeed) {
        self.categories.extend(other.categories);
    }
}

/// Load a single seed file.
pub fn load_seed(path: &Path) -> Result<LibrarySeed, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_yml::from_str(&contents).map_err(|e| YamlError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every `.yaml`/`.yml` file in a directory, in file-name order, as one seed.
pub fn load_seed_dir(dir: &Path) -> Result<LibrarySeed, YamlError> {
    if !dir.is_dir() {
        return Err(YamlError::DirNotFound(dir.display().to_string()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| YamlError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut seed = LibrarySeed::default();
    for entry in entries {
        seed.merge(load_seed(&entry.path())?);
    }
    Ok(seed)
}
