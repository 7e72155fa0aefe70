//! Recipe category vocabulary.
//!
//! Categories are stored as free text. The vocabulary below only feeds the
//! selector control; `CATEGORY_ALL` is the sentinel meaning "no filter".

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Sentinel category that disables category filtering.
pub const CATEGORY_ALL: &str = "All";

/// Fixed selector vocabulary, sentinel first.
pub const CATEGORIES: [&str; 4] = [CATEGORY_ALL, "Meal", "Dessert", "Snack"];

/// Returns whether `category` is the "no filter" sentinel.
pub fn is_all(category: &str) -> bool {
    category == CATEGORY_ALL
}

/// Normalizes selector input from UI boundaries.
///
/// Trims and collapses inner whitespace. Case is preserved because category
/// matching is exact. Blank input maps to the sentinel.
pub fn normalize_category_input(raw: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        CATEGORY_ALL.to_string()
    } else {
        collapsed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_all, normalize_category_input, CATEGORIES, CATEGORY_ALL};

    #[test]
    fn vocabulary_starts_with_sentinel() {
        assert_eq!(CATEGORIES[0], CATEGORY_ALL);
        assert!(is_all(CATEGORIES[0]));
        assert!(!is_all("all"));
    }

    #[test]
    fn normalize_trims_and_keeps_case() {
        assert_eq!(normalize_category_input("  Dessert "), "Dessert");
        assert_eq!(normalize_category_input("Main \t Course"), "Main Course");
        assert_eq!(normalize_category_input("meal"), "meal");
    }

    #[test]
    fn normalize_maps_blank_to_sentinel() {
        assert_eq!(normalize_category_input("   "), CATEGORY_ALL);
    }
}
