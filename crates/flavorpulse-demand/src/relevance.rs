//! Term-count-aware relevance filtering.
//!
//! An item is relevant when it mentions enough of the search terms. One- and
//! two-term searches require every term; three terms require two; four or
//! more require at least 75%.

use flavorpulse_core::ContentItem;

use crate::matcher::AliasTable;
use crate::stats::fraction;
use crate::types::SearchTerms;

/// Relevance of a single item to the full term set.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceResult<'a> {
    pub item: &'a ContentItem,
    /// Share of search terms the item mentions, `0.0..=1.0`.
    pub matched_fraction: f64,
    pub matched_terms: usize,
}

/// Items that cleared the relevance threshold.
#[derive(Debug, Clone, Default)]
pub struct FilteredItems<'a> {
    pub items: Vec<&'a ContentItem>,
    /// Mean `matched_fraction` of the retained items; `0.0` when none survive.
    pub avg_relevance: f64,
}

impl FilteredItems<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Minimum number of matched terms for an item to be kept.
#[must_use]
pub fn required_matches(term_count: usize) -> usize {
    match term_count {
        0 => 0,
        1 | 2 => term_count,
        3 => 2,
        // ceil(0.75 * n) without floating point.
        n => (n * 3).div_ceil(4),
    }
}

/// Scores one item against every search term.
#[must_use]
pub fn score_item<'a>(
    item: &'a ContentItem,
    terms: &SearchTerms,
    aliases: &AliasTable,
) -> RelevanceResult<'a> {
    let text = item.searchable_text();
    let matched_terms = terms.iter().filter(|t| aliases.matches(t, &text)).count();
    RelevanceResult {
        item,
        matched_fraction: fraction(matched_terms, terms.len()),
        matched_terms,
    }
}

/// Keeps the items that mention enough search terms.
#[must_use]
pub fn filter<'a>(
    items: &'a [ContentItem],
    terms: &SearchTerms,
    aliases: &AliasTable,
) -> FilteredItems<'a> {
    if terms.is_empty() {
        return FilteredItems::default();
    }

    let required = required_matches(terms.len());
    let retained: Vec<RelevanceResult<'a>> = items
        .iter()
        .map(|item| score_item(item, terms, aliases))
        .filter(|r| r.matched_terms >= required)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let avg_relevance = if retained.is_empty() {
        0.0
    } else {
        retained.iter().map(|r| r.matched_fraction).sum::<f64>() / retained.len() as f64
    };

    tracing::debug!(
        candidates = items.len(),
        retained = retained.len(),
        required,
        avg_relevance,
        "relevance filter applied"
    );

    FilteredItems {
        items: retained.into_iter().map(|r| r.item).collect(),
        avg_relevance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            view_count: 1_000,
            published_at: None,
        }
    }

    #[test]
    fn thresholds_by_term_count() {
        assert_eq!(required_matches(1), 1);
        assert_eq!(required_matches(2), 2);
        assert_eq!(required_matches(3), 2);
        assert_eq!(required_matches(4), 3);
        assert_eq!(required_matches(5), 4);
        assert_eq!(required_matches(8), 6);
    }

    #[test]
    fn two_terms_require_both() {
        let items = vec![
            item("a", "kimchi fried rice"),
            item("b", "kimchi stew"),
            item("c", "fried rice"),
        ];
        let terms = SearchTerms::parse("kimchi, fried rice");
        let out = filter(&items, &terms, AliasTable::builtin());
        assert_eq!(out.len(), 1);
        assert_eq!(out.items[0].id, "a");
        assert!((out.avg_relevance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn three_terms_keep_two_of_three() {
        let items = vec![
            item("a", "kimchi tofu stew"),
            item("b", "kimchi pancake"),
            item("c", "kimchi tofu butter noodles"),
        ];
        let terms = SearchTerms::parse("kimchi, tofu, butter");
        let out = filter(&items, &terms, AliasTable::builtin());
        let ids: Vec<&str> = out.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        // (2/3 + 3/3) / 2
        assert!((out.avg_relevance - (5.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn four_terms_need_three() {
        let items = vec![
            item("a", "miso butter corn"),
            item("b", "miso butter"),
        ];
        let terms = SearchTerms::parse("miso, butter, corn, honey");
        let out = filter(&items, &terms, AliasTable::builtin());
        assert_eq!(out.len(), 1);
        assert!((out.avg_relevance - 0.75).abs() < 1e-9);
    }

    #[test]
    fn description_counts_toward_relevance() {
        let mut with_desc = item("a", "weeknight noodles");
        with_desc.description = Some("finished with gochujang".to_string());
        let items = vec![with_desc];
        let terms = SearchTerms::parse("gochujang");
        assert_eq!(filter(&items, &terms, AliasTable::builtin()).len(), 1);
    }

    #[test]
    fn empty_terms_keep_nothing() {
        let items = vec![item("a", "anything")];
        let out = filter(&items, &SearchTerms::default(), AliasTable::builtin());
        assert!(out.is_empty());
        assert_eq!(out.avg_relevance, 0.0);
    }
}
