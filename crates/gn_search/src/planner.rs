//! Folds heterogeneous search parameters into one canonical keyword list.
//!
//! Both strategies consume a flat keyword list plus strategy-specific extra
//! filters (countries, date), so the merge happens exactly once, up front.

use std::collections::HashSet;

use gn_core::SearchParams;

/// Merge keywords, entities, themes and locations into a deduplicated
/// keyword list. Theme codes like `ECON_TRADE` become plain phrases
/// ("econ trade"); duplicates are dropped case-insensitively keeping the
/// first occurrence; trimmed entries shorter than 2 characters are dropped.
///
/// Pure: no side effects, empty output only when every input field was
/// empty (or all entries were too short).
pub fn merge(params: &SearchParams) -> Vec<String> {
    let themes = params
        .themes
        .iter()
        .map(|t| t.replace('_', " ").to_lowercase());

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for entry in params
        .keywords
        .iter()
        .cloned()
        .chain(params.entities.iter().cloned())
        .chain(themes)
        .chain(params.locations.iter().cloned())
    {
        let trimmed = entry.trim();
        if trimmed.chars().count() < 2 {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            merged.push(trimmed.to_string());
        }
    }
    merged
}
