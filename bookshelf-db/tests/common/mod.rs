#![allow(dead_code)]

use bookshelf_db::*;
use rusqlite::Connection;

/// Three categories (one empty), three subjects, five books.
pub fn setup_db() -> Connection {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO categories (id, category) VALUES
            (1, 'Programming'), (2, 'Science'), (3, 'Empty');
         INSERT INTO subjects (id, category_id, subject) VALUES
            (1, 1, 'Python'), (2, 1, 'Rust'), (3, 2, 'Physics');
         INSERT INTO books (id, title, author, category_id, subject_id, FileName, rating, FileSize) VALUES
            (1, 'Learning Python', 'Mark Lutz', 1, 1, 'learning_python.pdf', 5, 2097152),
            (2, 'Fluent Python', 'Luciano Ramalho', 1, 1, 'fluent_python.pdf', 4, NULL),
            (3, 'Programming Rust', 'Jim Blandy', 1, 2, 'programming_rust.pdf', 4, NULL),
            (4, 'The Rust Programming Language', 'Steve Klabnik', 1, 2, 'trpl.pdf', 5, NULL),
            (5, 'Feynman Lectures', 'Richard Feynman', 2, 3, 'feynman.pdf', 3, NULL);",
    )
    .unwrap();
    conn
}

/// The oldest layout: no author, file, thumbnail, rating or timestamp columns.
pub fn legacy_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, category TEXT);
         CREATE TABLE subjects (id INTEGER PRIMARY KEY, category_id INTEGER, subject TEXT);
         CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT, category_id INTEGER, subject_id INTEGER);
         INSERT INTO categories VALUES (1, 'History');
         INSERT INTO subjects VALUES (1, 1, 'Rome');
         INSERT INTO books VALUES (1, 'SPQR', 1, 1), (2, 'Rubicon', 1, 1);",
    )
    .unwrap();
    conn
}

pub fn titles(books: &[bookshelf_catalog::Book]) -> Vec<&str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

/// Pre-relational layout: category and subject stored as text on each book.
pub fn flat_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT, author TEXT,
                             category TEXT, subject TEXT);
         INSERT INTO books VALUES
            (1, 'SPQR', 'Mary Beard', 'History', 'Rome'),
            (2, 'Dune', 'Frank Herbert', 'Fiction', 'Sci-Fi');",
    )
    .unwrap();
    conn
}
