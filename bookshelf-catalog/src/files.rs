//! On-disk location of book files and cover images.
//!
//! A book either stores an explicit `file_path`, or lives at
//! `<books_dir>/<file_name>` by convention. Covers work the same way: an
//! explicit `thumbnail_path` wins, otherwise `<cover_dir>/<file_stem>.<ext>` is
//! tried across the configured directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Book;

/// Cover image extensions, in lookup priority order.
pub const COVER_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Filesystem roots used to resolve book and cover paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryPaths {
    /// Directory holding book files addressed by file name only.
    pub books_dir: PathBuf,
    /// Second place to look for `<title>.pdf` when the primary path is missing.
    pub fallback_dir: PathBuf,
    /// Cover directories, in lookup priority order.
    pub cover_dirs: Vec<PathBuf>,
}

impl Default for LibraryPaths {
    fn default() -> Self {
        Self {
            books_dir: PathBuf::from("Books"),
            fallback_dir: PathBuf::from("Assets/Books"),
            cover_dirs: vec![PathBuf::from("Assets/Covers"), PathBuf::from("Data/Covers")],
        }
    }
}

impl LibraryPaths {
    /// Paths rooted at a single library directory.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            books_dir: root.join("Books"),
            fallback_dir: root.join("Assets").join("Books"),
            cover_dirs: vec![
                root.join("Assets").join("Covers"),
                root.join("Data").join("Covers"),
            ],
        }
    }

    /// Fallback location for a title: `<fallback_dir>/<title>.pdf`.
    pub fn fallback_path(&self, title: &str) -> PathBuf {
        self.fallback_dir.join(format!("{title}.pdf"))
    }
}

impl Book {
    /// Where this book's file should be: the explicit path, or `books_dir/file_name`.
    ///
    /// Returns `None` when the book has neither.
    pub fn full_path(&self, books_dir: &Path) -> Option<PathBuf> {
        if !self.file_path.is_empty() {
            Some(PathBuf::from(&self.file_path))
        } else if !self.file_name.is_empty() {
            Some(books_dir.join(&self.file_name))
        } else {
            None
        }
    }

    pub fn file_exists(&self, books_dir: &Path) -> bool {
        self.full_path(books_dir).is_some_and(|p| p.is_file())
    }
}

/// Find the cover image for `book`, if any exists on disk.
///
/// Lookup order: the stored `thumbnail_path`, then every cover directory
/// (outer loop) crossed with [`COVER_EXTENSIONS`] (inner loop).
pub fn resolve_cover(book: &Book, paths: &LibraryPaths) -> Option<PathBuf> {
    if !book.thumbnail_path.is_empty() {
        let explicit = PathBuf::from(&book.thumbnail_path);
        if explicit.is_file() {
            return Some(explicit);
        }
    }

    let stem = Path::new(&book.file_name).file_stem()?.to_string_lossy().into_owned();
    if stem.is_empty() {
        return None;
    }
    let stem = stem.as_str();

    paths
        .cover_dirs
        .iter()
        .flat_map(|dir| {
            COVER_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{stem}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
}
