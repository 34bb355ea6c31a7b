mod common;

use bookshelf_db::queries::*;
use bookshelf_db::BookSchema;
use common::{setup_db, titles};

#[test]
fn categories_ordered_with_counts() {
    let conn = setup_db();
    let categories = all_categories(&conn).unwrap();

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Empty", "Programming", "Science"]);
    let counts: Vec<Option<i64>> = categories.iter().map(|c| c.book_count).collect();
    assert_eq!(counts, vec![Some(0), Some(4), Some(1)]);
    assert_eq!(categories[1].display_name(), "Programming (4)");
}

#[test]
fn category_lookup_by_name_is_case_insensitive() {
    let conn = setup_db();
    let found = category_by_name(&conn, "  programming ").unwrap().unwrap();
    assert_eq!(found.id, Some(1));
    assert_eq!(found.name, "Programming");

    assert!(category_by_name(&conn, "Cooking").unwrap().is_none());
    assert_eq!(category_by_id(&conn, 2).unwrap().unwrap().name, "Science");
}

#[test]
fn subjects_belong_to_their_category() {
    let conn = setup_db();
    let subjects = subjects_by_category(&conn, "Programming").unwrap();
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Python", "Rust"]);
    assert!(subjects.iter().all(|s| s.category_id == Some(1)));
    assert_eq!(subjects[0].full_name(), "Programming → Python");

    assert!(subjects_by_category(&conn, "Empty").unwrap().is_empty());
    assert_eq!(subject_by_id(&conn, 3).unwrap().unwrap().category_name, "Science");
    assert_eq!(all_subjects(&conn).unwrap().len(), 3);
}

#[test]
fn books_by_subject_sorted_by_title() {
    let conn = setup_db();
    let schema = BookSchema::probe(&conn).unwrap();
    let books = books_by_subject(&conn, &schema, "Python").unwrap();
    assert_eq!(titles(&books), vec!["Fluent Python", "Learning Python"]);

    let first = &books[1];
    assert_eq!(first.author, "Mark Lutz");
    assert_eq!(first.category_name, "Programming");
    assert_eq!(first.subject_name, "Python");
    assert_eq!(first.file_size_display(), "2.0 MB");
}

#[test]
fn subject_scoped_to_category() {
    let conn = setup_db();
    let schema = BookSchema::probe(&conn).unwrap();
    let rust = books_by_category_subject(&conn, &schema, "Programming", "Rust").unwrap();
    assert_eq!(rust.len(), 2);
    assert!(
        books_by_category_subject(&conn, &schema, "Science", "Rust")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn title_search_escapes_wildcards() {
    let conn = setup_db();
    let schema = BookSchema::probe(&conn).unwrap();
    assert_eq!(search_books(&conn, &schema, "PYTHON").unwrap().len(), 2);
    assert!(search_books(&conn, &schema, "100%").unwrap().is_empty());
    assert!(search_books(&conn, &schema, "_").unwrap().is_empty());
}

#[test]
fn book_lookups() {
    let conn = setup_db();
    let schema = BookSchema::probe(&conn).unwrap();
    let book = book_by_title(&conn, &schema, "Programming Rust").unwrap().unwrap();
    assert_eq!(book.id, Some(3));
    assert_eq!(book.file_name, "programming_rust.pdf");
    assert_eq!(book.category_subject_display(), "Programming → Rust");

    assert_eq!(book_by_id(&conn, &schema, 5).unwrap().unwrap().title, "Feynman Lectures");
    assert!(book_by_title(&conn, &schema, "Missing").unwrap().is_none());
    assert_eq!(all_books(&conn, &schema).unwrap().len(), 5);
}

#[test]
fn authors_are_distinct_and_sorted() {
    let conn = setup_db();
    conn.execute(
        "INSERT INTO books (title, author, FileName) VALUES ('Python Pocket Reference', 'Mark Lutz  ', 'ppr.pdf')",
        [],
    )
    .unwrap();
    let schema = BookSchema::probe(&conn).unwrap();
    let authors = all_authors(&conn, &schema).unwrap();
    assert_eq!(
        authors,
        vec![
            "Jim Blandy",
            "Luciano Ramalho",
            "Mark Lutz",
            "Richard Feynman",
            "Steve Klabnik"
        ]
    );
}

#[test]
fn category_subject_map_matches_direct_queries() {
    let conn = setup_db();
    let map = category_subject_map(&conn).unwrap();

    assert_eq!(map.len(), 2);
    assert!(!map.contains_key("empty"));

    let programming = &map["programming"];
    assert_eq!(programming, &subjects_by_category(&conn, "Programming").unwrap());
    let counts: Vec<Option<i64>> = programming.iter().map(|s| s.book_count).collect();
    assert_eq!(counts, vec![Some(2), Some(2)]);
}
