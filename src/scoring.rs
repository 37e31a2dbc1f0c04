//! Confidence scoring.
//!
//! A candidate's score starts from the base weight of its most reliable
//! signal and grows with the number of independent locations that support
//! it:
//!
//! ```text
//! score = min(1, base_weight * (1 + ln(1 + occurrences) * redundancy_factor))
//! ```
//!
//! Growth is logarithmic, so every extra corroboration helps less than the
//! previous one.

use crate::attribution::ScoredCandidate;
use crate::normalizer::Candidate;
use crate::options::AnalyzerOptions;
use std::cmp::Ordering;

/// Score for `occurrences` independent sightings of a signal with `base_weight`.
pub fn redundancy_score(base_weight: f64, occurrences: usize, redundancy_factor: f64) -> f64 {
    let boost = 1.0 + (1.0 + occurrences as f64).ln() * redundancy_factor;
    (base_weight * boost).clamp(0.0, 1.0)
}

/// Deterministic ranking order: higher score, then more occurrences, then
/// earlier source offset, then lexicographic text.
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
        .then_with(|| a.first_offset.cmp(&b.first_offset))
        .then_with(|| a.text.cmp(&b.text))
}

#[derive(Debug, Clone)]
pub struct Scorer {
    redundancy_factor: f64,
}

impl Scorer {
    pub fn new(options: &AnalyzerOptions) -> Self {
        Self {
            redundancy_factor: options.redundancy_factor,
        }
    }

    pub fn score(&self, candidate: &Candidate) -> f64 {
        redundancy_score(
            candidate.weight,
            candidate.occurrence_count(),
            self.redundancy_factor,
        )
    }

    /// Score every candidate and sort them best first.
    pub fn rank(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| ScoredCandidate {
                score: self.score(&candidate),
                occurrence_count: candidate.occurrence_count(),
                first_offset: candidate.first_offset(),
                text: candidate.text,
                role: candidate.role,
                kind: candidate.kind,
                weight: candidate.weight,
            })
            .collect();
        scored.sort_by(rank_order);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EntityRole, SignalKind};
    use crate::extractor::SourceLocation;

    fn candidate(text: &str, weight: f64, offsets: &[usize]) -> Candidate {
        let mut c = Candidate::new(
            text,
            EntityRole::Author,
            SignalKind::MetaAttribute,
            weight,
            SourceLocation::Element(0),
            offsets[0],
        );
        for &offset in &offsets[1..] {
            c.add_occurrence(
                SourceLocation::Comment(offset),
                offset,
                SignalKind::HtmlComment,
                0.15,
            );
        }
        c
    }

    #[test]
    fn test_single_occurrence_formula() {
        let score = redundancy_score(0.55, 1, 0.5);
        let expected = 0.55 * (1.0 + 2f64.ln() * 0.5);
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_diminishing_returns_and_cap() {
        let scores: Vec<f64> = (1..=50).map(|n| redundancy_score(0.6, n, 0.5)).collect();
        for pair in scores.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        let first_gain = scores[1] - scores[0];
        let second_gain = scores[2] - scores[1];
        assert!(second_gain < first_gain);
        assert_eq!(*scores.last().unwrap(), 1.0);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_zero_factor_ignores_redundancy() {
        assert_eq!(redundancy_score(0.4, 1, 0.0), redundancy_score(0.4, 9, 0.0));
    }

    #[test]
    fn test_rank_breaks_ties_deterministically() {
        let scorer = Scorer::new(&AnalyzerOptions::default());
        let ranked = scorer.rank(vec![
            candidate("Zed", 0.5, &[40]),
            candidate("Amy", 0.5, &[40]),
            candidate("Bob", 0.5, &[10]),
            candidate("Top", 0.6, &[90]),
        ]);
        let order: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(order, vec!["Top", "Bob", "Amy", "Zed"]);
    }

    #[test]
    fn test_more_locations_rank_higher() {
        let scorer = Scorer::new(&AnalyzerOptions::default());
        let ranked = scorer.rank(vec![
            candidate("Once", 0.55, &[0]),
            candidate("Thrice", 0.55, &[5, 50, 500]),
        ]);
        assert_eq!(ranked[0].text, "Thrice");
        assert_eq!(ranked[0].occurrence_count, 3);
        assert!(ranked[0].score > ranked[1].score);
    }
}
