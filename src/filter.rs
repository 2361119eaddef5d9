use crate::schema::{KeywordSet, MatchingMode};
use std::collections::HashSet;

/// Decides which observed search queries fail an ad group's allowlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    matching: MatchingMode,
}

impl QueryFilter {
    pub fn new(matching: MatchingMode) -> Self {
        Self { matching }
    }

    /// Number of allowlist phrases that occur anywhere inside `query`.
    pub fn count_matches(&self, query: &str, keywords: &KeywordSet) -> usize {
        match self.matching {
            MatchingMode::CaseInsensitive => {
                let folded = query.to_lowercase();
                keywords.iter().filter(|k| folded.contains(k.as_str())).count()
            }
            MatchingMode::CaseSensitive => {
                keywords.iter().filter(|k| query.contains(k.as_str())).count()
            }
        }
    }

    pub fn is_negative(&self, query: &str, keywords: &KeywordSet, min_matches: usize) -> bool {
        self.count_matches(query, keywords) < min_matches
    }

    /// Returns the queries with fewer than `min_matches` allowlist hits, in
    /// input order and with their original casing. Repeats are kept.
    pub fn select_negatives<S: AsRef<str>>(
        &self,
        observed: &[S],
        keywords: &KeywordSet,
        min_matches: usize,
    ) -> Vec<String> {
        observed
            .iter()
            .map(|query| query.as_ref())
            .filter(|query| self.is_negative(query, keywords, min_matches))
            .map(str::to_string)
            .collect()
    }
}

/// [`QueryFilter::select_negatives`] with case-insensitive matching.
pub fn select_negatives<S: AsRef<str>>(
    observed: &[S],
    keywords: &KeywordSet,
    min_matches: usize,
) -> Vec<String> {
    QueryFilter::default().select_negatives(observed, keywords, min_matches)
}

/// Drops repeated negatives, keeping the first occurrence of each.
pub fn dedupe_preserving_order(negatives: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    negatives
        .into_iter()
        .filter(|negative| seen.insert(negative.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::new(words.iter().copied())
    }

    #[test]
    fn test_empty_allowlist_selects_everything() {
        assert_eq!(
            select_negatives(&["buy cheap red shoes"], &keywords(&[]), 1),
            vec!["buy cheap red shoes"]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let allow = keywords(&["red", "shoes"]);
        assert!(select_negatives(&["red shoes"], &allow, 2).is_empty());
        assert_eq!(select_negatives(&["red hat"], &allow, 2), vec!["red hat"]);
        assert!(select_negatives(&["red hat"], &allow, 1).is_empty());
    }

    #[test]
    fn test_matches_are_substrings() {
        let allow = keywords(&["shoe"]);
        let filter = QueryFilter::default();
        assert_eq!(filter.count_matches("snowshoes for kids", &allow), 1);
        assert_eq!(filter.count_matches("boots", &allow), 0);
    }

    #[test]
    fn test_order_and_repeats_are_preserved() {
        let allow = keywords(&["shoes"]);
        let observed = ["free hats", "red shoes", "cheap socks", "free hats"];
        assert_eq!(
            select_negatives(&observed, &allow, 1),
            vec!["free hats", "cheap socks", "free hats"]
        );
    }

    #[test]
    fn test_case_insensitive_matching_keeps_original_casing() {
        let allow = keywords(&["Red", "SHOES"]);
        let observed = ["Red Shoes", "RED Hat"];
        assert_eq!(select_negatives(&observed, &allow, 2), vec!["RED Hat"]);
    }

    #[test]
    fn test_case_sensitive_matching_compares_raw_query() {
        let allow = keywords(&["red", "shoes"]);
        let filter = QueryFilter::new(MatchingMode::CaseSensitive);
        assert_eq!(filter.count_matches("Red Shoes", &allow), 0);
        assert_eq!(
            filter.select_negatives(&["Red Shoes", "red shoes"], &allow, 2),
            vec!["Red Shoes"]
        );
    }

    #[test]
    fn test_selection_is_repeatable() {
        let allow = keywords(&["red", "shoes", "cheap"]);
        let observed = ["cheap red shoes", "blue hat", "red scarf"];
        let first = select_negatives(&observed, &allow, 2);
        let second = select_negatives(&observed, &allow, 2);
        assert_eq!(first, second);
        assert_eq!(first, vec!["blue hat", "red scarf"]);
    }

    #[test]
    fn test_query_matching_every_keyword_is_never_selected() {
        let allow = keywords(&["red", "shoes", "cheap"]);
        for min_matches in 1..=allow.len() {
            assert!(select_negatives(&["cheap red shoes"], &allow, min_matches).is_empty());
        }
    }

    #[test]
    fn test_dedupe_preserving_order() {
        let negatives = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(dedupe_preserving_order(negatives), vec!["b", "a", "c"]);
    }
}
