use rand::seq::IndexedRandom;
use rand::Rng;

pub const SUGGESTION_COUNT: usize = 3;

const CATALOG: [&str; 22] = [
    "Show me total sales by month.",
    "List top 10 customers by revenue.",
    "How many orders were placed last week?",
    "Show me sales by region.",
    "What is the refund rate?",
    "Which products have low stock?",
    "Show active users by region.",
    "List top performing sales agents.",
    "Show me orders pending delivery.",
    "List customer churn for Q3.",
    "Show me YOY revenue.",
    "List discounted orders.",
    "What is the average order value?",
    "Show best selling categories.",
    "Show signups by device.",
    "Which customers made repeat purchases?",
    "List transactions for 2025.",
    "How many new customers joined?",
    "Show failed transactions.",
    "Show slow moving items.",
    "Give me revenue by quarter.",
    "List the highest selling products.",
];

/// Static catalog of quick-start questions.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionPool {
    catalog: &'static [&'static str],
}

impl Default for SuggestionPool {
    fn default() -> Self {
        Self { catalog: &CATALOG }
    }
}

impl SuggestionPool {
    #[cfg(test)]
    pub fn catalog(&self) -> &'static [&'static str] {
        self.catalog
    }

    pub fn contains(&self, question: &str) -> bool {
        self.catalog.contains(&question)
    }

    /// True when `suggestions` holds exactly `SUGGESTION_COUNT` distinct catalog questions.
    pub fn is_display_set(&self, suggestions: &[String]) -> bool {
        suggestions.len() == SUGGESTION_COUNT
            && suggestions
                .iter()
                .enumerate()
                .all(|(index, question)| {
                    self.contains(question) && !suggestions[..index].contains(question)
                })
    }

    /// Draws `k` distinct questions without replacement. Returns the whole catalog
    /// when `k` exceeds its size.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, k: usize) -> Vec<String> {
        self.catalog
            .choose_multiple(rng, k)
            .map(|question| (*question).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_holds_twenty_two_distinct_questions() {
        let pool = SuggestionPool::default();
        let unique: BTreeSet<_> = pool.catalog().iter().collect();
        assert_eq!(unique.len(), 22);
    }

    #[test]
    fn sample_returns_distinct_catalog_members() {
        let pool = SuggestionPool::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let picked = pool.sample(&mut rng, SUGGESTION_COUNT);
            assert_eq!(picked.len(), SUGGESTION_COUNT);
            let unique: BTreeSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), SUGGESTION_COUNT);
            assert!(picked.iter().all(|question| pool.contains(question)));
        }
    }

    #[test]
    fn display_set_needs_three_distinct_catalog_questions() {
        let pool = SuggestionPool::default();
        let owned = |range: std::ops::Range<usize>| -> Vec<String> {
            pool.catalog()[range].iter().map(|q| q.to_string()).collect()
        };

        assert!(pool.is_display_set(&owned(0..3)));
        assert!(!pool.is_display_set(&owned(0..2)));
        assert!(!pool.is_display_set(&owned(0..5)));
        assert!(!pool.is_display_set(&vec![pool.catalog()[0].to_string(); 3]));
        assert!(!pool.is_display_set(&["a".to_string(), "b".to_string(), "c".to_string()]));
    }

    #[test]
    fn oversized_sample_is_capped_at_catalog_size() {
        let pool = SuggestionPool::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pool.sample(&mut rng, 50).len(), pool.catalog().len());
    }
}
