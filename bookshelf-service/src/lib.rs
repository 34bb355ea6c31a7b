//! Stateful catalog service for presentation layers.
//!
//! [`CatalogService`] owns a [`bookshelf_db::CatalogDb`], tracks the current
//! category/subject/search selection, keeps lazily filled read caches, and
//! tells registered [`CatalogObserver`]s when the visible book list or the
//! filters change. It is single-threaded by construction.

pub mod cache;
pub mod observer;
pub mod opener;
pub mod service;
pub mod state;

pub use cache::CatalogCache;
pub use observer::{CatalogObserver, EventHandlers, LogObserver, SilentObserver};
pub use opener::{BookOpener, OpenError, SystemOpener};
pub use service::CatalogService;
pub use state::{FileValidation, FilterState, MissingFile};
