//! Result types handed back to callers.
//!
//! [`AttributionResult`] is the engine's answer; [`Report`] wraps it together
//! with the ranked candidate list and the page information gathered by
//! [`CopyrightAnalyzer`](crate::CopyrightAnalyzer).
//!
//! All types serialize with camelCase field names:
//!
//! ```rust
//! use copyrightrs::AttributionResult;
//!
//! let json = serde_json::to_value(AttributionResult::default()).unwrap();
//! assert_eq!(json["overallConfidence"], 0.0);
//! assert!(json["primaryAuthor"].is_null());
//! ```

use crate::catalog::{EntityRole, SignalKind};
use crate::page_info::PageInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The attribution inferred from one HTML snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResult {
    /// Highest-ranked author-like candidate. Always a member of `all_authors`.
    pub primary_author: Option<String>,

    /// Author-like candidates that cleared the acceptance threshold.
    pub all_authors: BTreeSet<String>,

    /// Copyright-holder-like candidates that cleared the acceptance threshold,
    /// including full copyright notices next to the bare holder names.
    pub copyright_holders: BTreeSet<String>,

    /// Confidence in `[0, 1]`; `0.0` when nothing cleared the threshold.
    pub overall_confidence: f64,
}

impl AttributionResult {
    /// True when no signal cleared the acceptance threshold.
    pub fn is_empty(&self) -> bool {
        self.primary_author.is_none()
            && self.all_authors.is_empty()
            && self.copyright_holders.is_empty()
    }
}

/// A merged candidate with its final score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub text: String,
    pub role: EntityRole,
    pub kind: SignalKind,
    /// Base weight of the strongest contributing signal.
    pub weight: f64,
    /// Distinct source locations supporting the candidate.
    pub occurrence_count: usize,
    /// Earliest byte offset in the source.
    pub first_offset: usize,
    pub score: f64,
}

/// Full output of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// URL the snapshot was taken from, if known. Not used in scoring.
    pub url: Option<String>,

    /// Whether `url` points at a WeChat public-account article.
    pub is_wechat_article: bool,

    pub page: Option<PageInfo>,

    /// Script libraries and CSS frameworks the page loads. Empty when page
    /// info extraction is disabled.
    pub frameworks: BTreeSet<String>,

    pub attribution: AttributionResult,

    /// Every scored candidate, best first, including the ones below the
    /// acceptance threshold.
    pub candidates: Vec<ScoredCandidate>,
}
