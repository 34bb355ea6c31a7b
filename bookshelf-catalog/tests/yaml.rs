use std::fs;
use std::path::Path;

use bookshelf_catalog::{load_seed, load_seed_dir, YamlError};
use tempfile::TempDir;

fn write_yaml(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn load_seed_tree() {
    let tmp = TempDir::new().unwrap();
    write_yaml(
        tmp.path(),
        "library.yaml",
        r#"
categories:
  - name: Programming
    subjects:
      - name: Python
        books:
          - title: Learning Python
            author: Mark Lutz
            rating: 4
      - name: Rust
        books:
          - title: The Rust Book
            file_name: rust-book.pdf
  - name: Empty
"#,
    );

    let seed = load_seed(&tmp.path().join("library.yaml")).unwrap();
    assert_eq!(seed.categories.len(), 2);
    assert_eq!(seed.book_count(), 2);

    let python = &seed.categories[0].subjects[0];
    assert_eq!(python.books[0].author.as_deref(), Some("Mark Lutz"));
    assert_eq!(python.books[0].rating, Some(4));
    assert_eq!(python.books[0].file_name, None);
    assert!(seed.categories[1].subjects.is_empty());
}

#[test]
fn load_seed_dir_merges_in_name_order() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "b.yaml", "categories:\n  - name: Second\n");
    write_yaml(tmp.path(), "a.yml", "categories:\n  - name: First\n");
    write_yaml(tmp.path(), "notes.txt", "ignored");

    let seed = load_seed_dir(tmp.path()).unwrap();
    let names: Vec<_> = seed.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[test]
fn missing_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = load_seed_dir(&tmp.path().join("nope"));
    assert!(matches!(result, Err(YamlError::DirNotFound(_))));
}

#[test]
fn malformed_yaml_reports_path() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "bad.yaml", "categories: [unterminated");
    let err = load_seed(&tmp.path().join("bad.yaml")).unwrap_err();
    assert!(err.to_string().contains("bad.yaml"));
}
