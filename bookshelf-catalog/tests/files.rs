use std::fs;

use bookshelf_catalog::{resolve_cover, Book, LibraryPaths};
use tempfile::TempDir;

fn book(file_name: &str) -> Book {
    Book {
        title: "Learning Python".to_string(),
        file_name: file_name.to_string(),
        ..Default::default()
    }
}

#[test]
fn explicit_path_wins_over_convention() {
    let tmp = TempDir::new().unwrap();
    let explicit = tmp.path().join("elsewhere.pdf");
    fs::write(&explicit, b"%PDF").unwrap();

    let mut b = book("Learning Python.pdf");
    b.file_path = explicit.display().to_string();
    assert_eq!(b.full_path(tmp.path()), Some(explicit));
    assert!(b.file_exists(tmp.path()));
}

#[test]
fn convention_joins_books_dir_and_file_name() {
    let tmp = TempDir::new().unwrap();
    let b = book("Learning Python.pdf");
    assert_eq!(
        b.full_path(tmp.path()),
        Some(tmp.path().join("Learning Python.pdf"))
    );
    assert!(!b.file_exists(tmp.path()));

    fs::write(tmp.path().join("Learning Python.pdf"), b"%PDF").unwrap();
    assert!(b.file_exists(tmp.path()));
}

#[test]
fn no_path_without_file_name() {
    assert_eq!(Book::default().full_path(std::path::Path::new("/books")), None);
}

#[test]
fn cover_lookup_follows_priority_order() {
    let tmp = TempDir::new().unwrap();
    let paths = LibraryPaths::rooted_at(tmp.path());
    for dir in &paths.cover_dirs {
        fs::create_dir_all(dir).unwrap();
    }
    let b = book("Learning Python.pdf");
    assert_eq!(resolve_cover(&b, &paths), None);

    let second_dir_jpg = paths.cover_dirs[1].join("Learning Python.jpg");
    fs::write(&second_dir_jpg, b"jpg").unwrap();
    assert_eq!(resolve_cover(&b, &paths), Some(second_dir_jpg));

    let first_dir_png = paths.cover_dirs[0].join("Learning Python.png");
    fs::write(&first_dir_png, b"png").unwrap();
    assert_eq!(resolve_cover(&b, &paths), Some(first_dir_png.clone()));

    let first_dir_jpg = paths.cover_dirs[0].join("Learning Python.jpg");
    fs::write(&first_dir_jpg, b"jpg").unwrap();
    assert_eq!(resolve_cover(&b, &paths), Some(first_dir_jpg));
}

#[test]
fn stored_thumbnail_is_preferred_when_present() {
    let tmp = TempDir::new().unwrap();
    let paths = LibraryPaths::rooted_at(tmp.path());
    let thumb = tmp.path().join("thumb.png");
    fs::write(&thumb, b"png").unwrap();

    let mut b = book("Learning Python.pdf");
    b.thumbnail_path = thumb.display().to_string();
    assert_eq!(resolve_cover(&b, &paths), Some(thumb));

    b.thumbnail_path = tmp.path().join("gone.png").display().to_string();
    assert_eq!(resolve_cover(&b, &paths), None);
}

#[test]
fn fallback_path_uses_title() {
    let paths = LibraryPaths::rooted_at(std::path::Path::new("/lib"));
    assert_eq!(
        paths.fallback_path("Learning Python"),
        std::path::Path::new("/lib/Assets/Books/Learning Python.pdf")
    );
}
