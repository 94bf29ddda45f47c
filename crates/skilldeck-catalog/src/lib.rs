//! `SkillDeck` Catalog
//!
//! Holds the full skill list in memory and serves filtered, paginated views
//! of it.
//!
//! ## Pipeline
//!
//! 1. Load: the static catalog document is fetched once (HTTP or file) and validated
//! 2. Derive: category facets are recomputed from the loaded skills
//! 3. Query: free-text search and multi-select category filters narrow the list
//! 4. Page: the filtered list is sliced into fixed-size pages
//!
//! Changing the search text or the category selection always sends the view
//! back to page 1 (see [`CatalogQuery`]).

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod query;
pub mod style;

pub use catalog::{derive_categories, slugify, sorted_for_display, Catalog, CatalogStats};
pub use error::{CatalogError, Result};
pub use loader::CatalogSource;
pub use query::{filter, paginate, total_pages, CatalogQuery, PageView};
pub use style::{style_for, Accent, CategoryStyle};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Catalog, CatalogQuery, CatalogSource, PageView};
}
