mod common;

use std::cell::RefCell;
use std::rc::Rc;

use bookshelf_catalog::types::{SearchCriteria, UNCATEGORIZED};
use bookshelf_catalog::LibraryPaths;
use bookshelf_db::{open_memory, CatalogDb};
use bookshelf_service::*;
use common::{library_db, service, titles, Recorder, RecordingOpener};

// ── Caches ──────────────────────────────────────────────────────────────────

#[test]
fn cached_subjects_match_direct_query() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    svc.refresh_cache();

    for category in svc.get_category_names() {
        svc.set_current_category(Some(&category));
        let cached = svc.get_subjects_for_current_category();
        let direct = svc.db().get_subjects_by_category(&category);
        assert_eq!(cached, direct, "subjects of {category}");
    }
}

#[test]
fn caches_change_only_on_explicit_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    assert_eq!(svc.get_all_categories().len(), 2);

    svc.db()
        .connection()
        .execute("INSERT INTO categories (category) VALUES ('History')", [])
        .unwrap();
    assert_eq!(svc.get_all_categories().len(), 2);

    svc.refresh_cache();
    assert_eq!(
        svc.get_category_names(),
        vec!["History", "Programming", "Science"]
    );

    svc.db()
        .connection()
        .execute("INSERT INTO categories (category) VALUES ('Art')", [])
        .unwrap();
    svc.clear_cache();
    assert_eq!(svc.get_all_categories().len(), 4);
}

#[test]
fn cached_reads_do_not_query() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    svc.get_all_categories();
    let after_first = svc.db().query_count();
    svc.get_all_categories();
    svc.get_category_names();
    assert_eq!(svc.db().query_count(), after_first);
}

#[test]
fn subject_names_need_a_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    assert!(svc.get_subject_names_for_current_category().is_empty());
    svc.set_current_category(Some("Programming"));
    assert_eq!(
        svc.get_subject_names_for_current_category(),
        vec!["Python", "Rust"]
    );
}

// ── Observers ───────────────────────────────────────────────────────────────

#[test]
fn observers_notified_in_registration_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    let log = Rc::new(RefCell::new(Vec::new()));
    svc.add_observer(Recorder::new("a", &log));
    svc.add_observer(Recorder::new("b", &log));

    svc.set_current_category(Some("Programming"));
    assert_eq!(
        *log.borrow(),
        vec![
            "a:books:3",
            "b:books:3",
            "a:filter:Programming",
            "b:filter:Programming"
        ]
    );

    log.borrow_mut().clear();
    svc.clear_all_filters();
    assert_eq!(
        *log.borrow(),
        vec!["a:filter:", "b:filter:", "a:books:0", "b:books:0"]
    );
}

#[test]
fn search_notifies_books_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    let log = Rc::new(RefCell::new(Vec::new()));
    svc.add_observer(Recorder::new("a", &log));

    svc.search_books("rust");
    svc.search_books("r");
    assert_eq!(*log.borrow(), vec!["a:books:1", "a:books:0"]);

    // Search results stand, so the list is not recomputed.
    log.borrow_mut().clear();
    svc.set_current_category(Some("Science"));
    assert_eq!(*log.borrow(), vec!["a:filter:Science"]);
}

#[test]
fn event_handlers_receive_events() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    let counts = Rc::new(RefCell::new(Vec::new()));
    let filters = Rc::new(RefCell::new(0));

    let sink = Rc::clone(&counts);
    let filter_sink = Rc::clone(&filters);
    svc.set_event_handlers(
        EventHandlers::new()
            .on_books_changed(move |books| sink.borrow_mut().push(books.len()))
            .on_filter_changed(move |_| *filter_sink.borrow_mut() += 1),
    );

    svc.set_current_category(Some("Science"));
    svc.set_current_subject(Some("Physics"));
    assert_eq!(*counts.borrow(), vec![1, 1]);
    assert_eq!(*filters.borrow(), 2);
}

// ── Opening books ───────────────────────────────────────────────────────────

#[test]
fn opening_unknown_title_fails_quietly() {
    let dir = tempfile::tempdir().unwrap();
    let opener = RecordingOpener::default();
    let mut svc = CatalogService::new(library_db(), LibraryPaths::rooted_at(dir.path()))
        .with_opener(opener.clone());

    assert!(!svc.open_book("Missing Title"));
    assert!(opener.opened.borrow().is_empty());
    assert!(svc.db().get_all_books().iter().all(|b| b.last_opened.is_none()));
}

#[test]
fn opening_existing_file_stamps_and_notifies() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::rooted_at(dir.path());
    std::fs::create_dir_all(&paths.books_dir).unwrap();
    std::fs::write(paths.books_dir.join("learning_python.pdf"), b"%PDF").unwrap();

    let opener = RecordingOpener::default();
    let mut svc = CatalogService::new(library_db(), paths.clone()).with_opener(opener.clone());
    let log = Rc::new(RefCell::new(Vec::new()));
    svc.add_observer(Recorder::new("a", &log));

    assert!(svc.open_book("Learning Python"));
    assert_eq!(
        *opener.opened.borrow(),
        vec![paths.books_dir.join("learning_python.pdf")]
    );
    assert_eq!(*log.borrow(), vec!["a:opened:Learning Python"]);
    let stamped = svc.db().get_book_by_title("Learning Python").unwrap();
    assert!(stamped.last_opened.is_some());
}

#[test]
fn opening_uses_fallback_location() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::rooted_at(dir.path());
    std::fs::create_dir_all(&paths.fallback_dir).unwrap();
    let fallback = paths.fallback_path("Feynman Lectures");
    std::fs::write(&fallback, b"%PDF").unwrap();

    let opener = RecordingOpener::default();
    let mut svc = CatalogService::new(library_db(), paths).with_opener(opener.clone());
    svc.set_current_category(Some("Science"));

    assert!(svc.open_book("Feynman Lectures"));
    assert_eq!(*opener.opened.borrow(), vec![fallback]);
}

#[test]
fn opening_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let opener = RecordingOpener::default();
    let mut svc = CatalogService::new(library_db(), LibraryPaths::rooted_at(dir.path()))
        .with_opener(opener.clone());

    assert!(!svc.open_book("The Rust Book"));
    assert!(opener.opened.borrow().is_empty());
}

#[test]
fn viewer_failure_skips_last_opened() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::rooted_at(dir.path());
    std::fs::create_dir_all(&paths.books_dir).unwrap();
    std::fs::write(paths.books_dir.join("rust_book.pdf"), b"%PDF").unwrap();

    let opener = RecordingOpener {
        fail: true,
        ..RecordingOpener::default()
    };
    let mut svc = CatalogService::new(library_db(), paths).with_opener(opener);

    assert!(!svc.open_book("The Rust Book"));
    let book = svc.db().get_book_by_title("The Rust Book").unwrap();
    assert!(book.last_opened.is_none());
}

#[test]
fn validate_book_files_lists_missing() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::rooted_at(dir.path());
    std::fs::create_dir_all(&paths.books_dir).unwrap();
    std::fs::write(paths.books_dir.join("python_tricks.pdf"), b"%PDF").unwrap();

    let mut svc = CatalogService::new(library_db(), paths.clone());
    svc.set_current_category(Some("Programming"));
    svc.set_current_subject(Some("Python"));

    let report = svc.validate_book_files();
    assert_eq!(report.total_books, 2);
    assert_eq!(report.valid_files, 1);
    assert_eq!(
        report.missing,
        vec![MissingFile {
            title: "Learning Python".to_string(),
            expected_path: paths.books_dir.join("learning_python.pdf"),
        }]
    );
    assert!(!report.all_present());
}

#[test]
fn covers_resolve_through_library_paths() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::rooted_at(dir.path());
    std::fs::create_dir_all(&paths.cover_dirs[1]).unwrap();
    std::fs::write(paths.cover_dirs[1].join("feynman.png"), b"png").unwrap();

    let svc = CatalogService::new(library_db(), paths.clone());
    let feynman = svc.get_book_by_title("Feynman Lectures").unwrap();
    assert_eq!(
        svc.resolve_cover(&feynman),
        Some(paths.cover_dirs[1].join("feynman.png"))
    );
    let rust = svc.get_book_by_title("The Rust Book").unwrap();
    assert_eq!(svc.resolve_cover(&rust), None);
}

// ── Search & statistics ─────────────────────────────────────────────────────

#[test]
fn author_filter_falls_back_to_substring() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    let criteria = SearchCriteria {
        categories: vec!["Programming".to_string()],
        authors: vec!["Guido".to_string()],
        ..SearchCriteria::default()
    };

    let result = svc.search_with_criteria(&criteria);
    assert!(result.success);
    assert_eq!(titles(&result.books), vec!["Python Tricks"]);
    assert_eq!(result.total_count, 5);
    assert_eq!(result.summary(), "Found 1 of 5 books");
    assert!(svc.get_current_books().is_empty());
}

#[test]
fn inverted_rating_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    let criteria = SearchCriteria {
        min_rating: 4,
        max_rating: 2,
        ..SearchCriteria::default()
    };
    let result = svc.search_with_criteria(&criteria);
    assert!(!result.success);
    assert!(result.summary().starts_with("Search failed:"));
}

#[test]
fn library_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(library_db(), dir.path());
    svc.set_current_category(Some("Programming"));

    let stats = svc.get_library_statistics();
    assert_eq!(stats.total_books, 5);
    assert_eq!(stats.total_categories, 2);
    assert_eq!(stats.total_subjects, 3);
    assert_eq!(stats.total_authors, 4);
    assert_eq!(stats.current_book_count, 3);
    assert_eq!(stats.category_distribution["Programming"], 3);
    assert_eq!(stats.category_distribution[UNCATEGORIZED], 1);
    assert_eq!(stats.largest_category, Some(("Programming".to_string(), 3)));
    assert_eq!(stats.average_rating, Some(4.0));
    assert_eq!(stats.books_with_thumbnails, 1);
}

#[test]
fn empty_library_statistics() {
    let db = CatalogDb::from_connection(open_memory().unwrap()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(db, dir.path());
    let stats = svc.get_library_statistics();
    assert_eq!(stats.total_books, 0);
    assert_eq!(stats.largest_category, None);
    assert_eq!(stats.average_rating, None);
}
