//! Free-text search and the composite criteria search.

use bookshelf_catalog::{SearchCriteria, SortField, SortOrder};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::ResolvedLibrary;

use super::{open_service, print_books, print_json};

pub(crate) fn run_search(library: &ResolvedLibrary, term: &str, json: bool) -> Result<(), CliError> {
    let mut service = open_service(library)?;
    let books = service.search_books(term).to_vec();
    if json {
        return print_books(&books, true);
    }

    if term.trim().chars().count() < 2 {
        log::warn!("Search terms shorter than 2 characters match nothing");
    }
    log::info!(
        "{} '{}': {} books",
        "Search".if_supports_color(Stdout, |t| t.bold()),
        term.trim(),
        books.len(),
    );
    crate::log_blank();
    print_books(&books, false)
}

/// Filters accepted by `bookshelf find`.
pub(crate) struct FindArgs {
    pub text: Option<String>,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub description: bool,
}

impl FindArgs {
    pub(crate) fn into_criteria(self) -> SearchCriteria {
        let defaults = SearchCriteria::default();
        SearchCriteria {
            search_text: self.text.unwrap_or_default(),
            search_description: self.description,
            categories: self.categories,
            authors: self.authors,
            subjects: self.subjects,
            min_rating: self.min_rating.unwrap_or(defaults.min_rating),
            max_rating: self.max_rating.unwrap_or(defaults.max_rating),
            sort_by: self
                .sort
                .as_deref()
                .map(SortField::from_str_loose)
                .unwrap_or(defaults.sort_by),
            sort_order: self
                .order
                .as_deref()
                .map(SortOrder::from_str_loose)
                .unwrap_or(defaults.sort_order),
            limit: self.limit,
            offset: self.offset.unwrap_or(0),
            ..defaults
        }
    }
}

pub(crate) fn run_find(library: &ResolvedLibrary, args: FindArgs, json: bool) -> Result<(), CliError> {
    let criteria = args.into_criteria();
    let mut service = open_service(library)?;
    log::debug!("Criteria: {}", criteria.summary());

    let result = service.search_with_criteria(&criteria);
    if !result.success {
        return Err(CliError::other(result.summary()));
    }
    if json {
        return print_json(&result);
    }

    log::info!(
        "{} ({})",
        result.summary().if_supports_color(Stdout, |t| t.bold()),
        criteria.summary().if_supports_color(Stdout, |t| t.dimmed()),
    );
    crate::log_blank();
    print_books(&result.books, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> FindArgs {
        FindArgs {
            text: None,
            categories: Vec::new(),
            authors: Vec::new(),
            subjects: Vec::new(),
            min_rating: None,
            max_rating: None,
            sort: None,
            order: None,
            limit: None,
            offset: None,
            description: false,
        }
    }

    #[test]
    fn no_flags_gives_default_criteria() {
        let criteria = empty_args().into_criteria();
        assert!(criteria.is_empty());
        assert_eq!(criteria.sort_by, SortField::Title);
        assert_eq!(criteria.sort_order, SortOrder::Asc);
        assert!(criteria.search_title && criteria.search_keywords);
        assert!(!criteria.search_description);
    }

    #[test]
    fn flags_map_onto_criteria() {
        let criteria = FindArgs {
            text: Some("python".into()),
            categories: vec!["Programming".into()],
            min_rating: Some(3),
            sort: Some("author".into()),
            order: Some("desc".into()),
            limit: Some(10),
            offset: Some(20),
            description: true,
            ..empty_args()
        }
        .into_criteria();

        assert_eq!(criteria.search_text, "python");
        assert_eq!(criteria.categories, vec!["Programming".to_string()]);
        assert_eq!(criteria.min_rating, 3);
        assert_eq!(criteria.max_rating, 5);
        assert_eq!(criteria.sort_by, SortField::Author);
        assert_eq!(criteria.sort_order, SortOrder::Desc);
        assert_eq!(criteria.limit, Some(10));
        assert_eq!(criteria.offset, 20);
        assert!(criteria.search_description);
    }
}
