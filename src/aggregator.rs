//! Aggregation of ranked candidates into an [`AttributionResult`].

use crate::attribution::{AttributionResult, ScoredCandidate};
use crate::catalog::EntityRole;
use crate::options::AnalyzerOptions;
use crate::scoring::rank_order;

#[derive(Debug, Clone)]
pub struct Aggregator {
    acceptance_threshold: f64,
}

impl Aggregator {
    pub fn new(options: &AnalyzerOptions) -> Self {
        Self {
            acceptance_threshold: options.acceptance_threshold,
        }
    }

    /// Build the result from scored candidates in any order.
    ///
    /// Candidates at or below the acceptance threshold are ignored. The
    /// overall confidence is the mean of the top author score and the top
    /// copyright-holder score, or the single available top score.
    pub fn aggregate(&self, candidates: &[ScoredCandidate]) -> AttributionResult {
        let mut accepted: Vec<&ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.score > self.acceptance_threshold)
            .collect();
        accepted.sort_by(|a, b| rank_order(a, b));

        let authors: Vec<&ScoredCandidate> = accepted
            .iter()
            .copied()
            .filter(|c| c.role == EntityRole::Author)
            .collect();
        let holders: Vec<&ScoredCandidate> = accepted
            .iter()
            .copied()
            .filter(|c| c.role == EntityRole::CopyrightHolder)
            .collect();

        let top_author = authors.first().map(|c| c.score);
        let top_holder = holders.first().map(|c| c.score);
        let overall_confidence = match (top_author, top_holder) {
            (Some(a), Some(h)) => (a + h) / 2.0,
            (Some(score), None) | (None, Some(score)) => score,
            (None, None) => 0.0,
        };

        AttributionResult {
            primary_author: authors.first().map(|c| c.text.clone()),
            all_authors: authors.iter().map(|c| c.text.clone()).collect(),
            copyright_holders: holders.iter().map(|c| c.text.clone()).collect(),
            overall_confidence: overall_confidence.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SignalKind;

    fn scored(text: &str, role: EntityRole, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            text: text.to_string(),
            role,
            kind: SignalKind::MetaAttribute,
            weight: score,
            occurrence_count: 1,
            first_offset: 0,
            score,
        }
    }

    #[test]
    fn test_empty_input_is_zero_confidence() {
        let result = Aggregator::new(&AnalyzerOptions::default()).aggregate(&[]);
        assert_eq!(result, AttributionResult::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_mean_of_top_scores() {
        let result = Aggregator::new(&AnalyzerOptions::default()).aggregate(&[
            scored("Jane", EntityRole::Author, 0.6),
            scored("Bob", EntityRole::Author, 0.4),
            scored("Acme", EntityRole::CopyrightHolder, 0.8),
        ]);
        assert_eq!(result.primary_author.as_deref(), Some("Jane"));
        assert_eq!(result.all_authors.len(), 2);
        assert!((result.overall_confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_single_category_uses_its_top_score() {
        let result = Aggregator::new(&AnalyzerOptions::default())
            .aggregate(&[scored("Acme", EntityRole::CopyrightHolder, 0.5)]);
        assert_eq!(result.primary_author, None);
        assert_eq!(result.overall_confidence, 0.5);
    }

    #[test]
    fn test_threshold_filters_noise() {
        let result = Aggregator::new(&AnalyzerOptions::default()).aggregate(&[
            scored("noise", EntityRole::Author, 0.1),
            scored("Acme", EntityRole::CopyrightHolder, 0.12),
        ]);
        assert!(result.is_empty());
        assert_eq!(result.overall_confidence, 0.0);
    }

    #[test]
    fn test_primary_author_is_member_of_all_authors() {
        let result = Aggregator::new(&AnalyzerOptions::default()).aggregate(&[
            scored("B", EntityRole::Author, 0.3),
            scored("A", EntityRole::Author, 0.3),
        ]);
        let primary = result.primary_author.clone().unwrap();
        assert_eq!(primary, "A");
        assert!(result.all_authors.contains(&primary));
    }
}
