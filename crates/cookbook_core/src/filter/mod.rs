//! Pure visible-set computation for filterable entities.
//!
//! # Responsibility
//! - Derive the visible subset of a collection from a text query and a
//!   category selector.
//!
//! # Invariants
//! - Category step runs before query step; both are order-preserving.
//! - `CATEGORY_ALL` and the empty query are pass-throughs.
//! - Category comparison is exact and case-sensitive; text search is
//!   case-insensitive substring matching.
//! - No I/O, no shared state: equal inputs give equal outputs.

use crate::model::category::is_all;
use crate::model::recipe::Recipe;

/// Entity shape understood by [`filter`].
pub trait Filterable {
    /// Category tag compared against the selector.
    fn category_tag(&self) -> &str;
    /// Text fields searched by the query. `None` never matches a non-empty query.
    fn search_fields(&self) -> [Option<&str>; 2];
}

impl Filterable for Recipe {
    fn category_tag(&self) -> &str {
        self.category.as_str()
    }

    fn search_fields(&self) -> [Option<&str>; 2] {
        [self.title.as_deref(), self.ingredients.as_deref()]
    }
}

/// Returns the items of `all` that pass the category and query steps.
pub fn filter<T: Filterable + Clone>(all: &[T], query: &str, category: &str) -> Vec<T> {
    let needle = query.to_lowercase();
    all.iter()
        .filter(|item| category_matches(*item, category))
        .filter(|item| query_matches(*item, needle.as_str()))
        .cloned()
        .collect()
}

/// Single-item form of [`filter`].
pub fn matches<T: Filterable>(item: &T, query: &str, category: &str) -> bool {
    category_matches(item, category) && query_matches(item, query.to_lowercase().as_str())
}

fn category_matches<T: Filterable>(item: &T, category: &str) -> bool {
    is_all(category) || item.category_tag() == category
}

// `needle` is already lowercased.
fn query_matches<T: Filterable>(item: &T, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
