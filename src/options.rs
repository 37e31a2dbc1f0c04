//! Configuration options for copyright analysis.
//!
//! This module provides [`AnalyzerOptions`] and [`AnalyzerOptionsBuilder`]
//! for tuning the scoring constants and the extraction paths.
//!
//! ## Example
//!
//! ```rust
//! use copyrightrs::{AnalyzerOptions, ExtractionPaths};
//!
//! // Using default options
//! let options = AnalyzerOptions::default();
//! assert_eq!(options.acceptance_threshold, 0.15);
//!
//! // Using builder for custom options
//! let options = AnalyzerOptions::builder()
//!     .acceptance_threshold(0.3)
//!     .paths(ExtractionPaths::ATTRIBUTES)
//!     .build();
//! assert!(!options.paths.contains(ExtractionPaths::COMMENTS));
//! ```

use crate::constants::{
    DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_MAX_CANDIDATE_CHARS, DEFAULT_REDUNDANCY_FACTOR,
    MAX_REDUNDANCY_FACTOR,
};
use bitflags::bitflags;

bitflags! {
    /// Extraction paths to run. The paths are independent: disabling or
    /// failing one never affects the others.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExtractionPaths: u8 {
        /// Element attributes and `<meta>` name/content pairs of the parsed document.
        const ATTRIBUTES = 0b001;
        /// HTML comment blocks found in the raw source text.
        const COMMENTS = 0b010;
        /// Copyright, author and source statements in the visible article
        /// body (`#js_content` / `.rich_media_content`).
        const TEXT = 0b100;
    }
}

impl Default for ExtractionPaths {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration options for the attribution engine.
///
/// Every numeric field is clamped into its valid range by the builder, so an
/// options value obtained from [`AnalyzerOptions::builder`] always yields
/// scores in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Minimum score a candidate needs to appear in the result.
    ///
    /// Default: `0.15`
    pub acceptance_threshold: f64,

    /// How strongly repeated, independent occurrences raise a candidate's score.
    ///
    /// Must stay below 1 so that corroboration has diminishing returns.
    ///
    /// Default: `0.5`
    pub redundancy_factor: f64,

    /// Longest normalized text accepted as a name.
    ///
    /// Default: `120`
    pub max_candidate_chars: usize,

    /// Maximum number of elements the attribute scan visits. Set to 0 to
    /// disable the limit. Exceeding it drops the attribute path only.
    ///
    /// Default: `0` (no limit)
    pub max_elems_to_scan: usize,

    /// Which extraction paths run.
    ///
    /// Default: all paths
    pub paths: ExtractionPaths,

    /// Collect page info (title, account, publish time, contacts) and the
    /// front-end frameworks alongside the attribution.
    ///
    /// Default: `true`
    pub extract_page_info: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            redundancy_factor: DEFAULT_REDUNDANCY_FACTOR,
            max_candidate_chars: DEFAULT_MAX_CANDIDATE_CHARS,
            max_elems_to_scan: 0,
            paths: ExtractionPaths::default(),
            extract_page_info: true,
        }
    }
}

impl AnalyzerOptions {
    /// Creates a new builder for AnalyzerOptions
    pub fn builder() -> AnalyzerOptionsBuilder {
        AnalyzerOptionsBuilder::default()
    }
}

/// Builder for [`AnalyzerOptions`].
#[derive(Default)]
pub struct AnalyzerOptionsBuilder {
    acceptance_threshold: Option<f64>,
    redundancy_factor: Option<f64>,
    max_candidate_chars: Option<usize>,
    max_elems_to_scan: Option<usize>,
    paths: Option<ExtractionPaths>,
    extract_page_info: Option<bool>,
}

impl AnalyzerOptionsBuilder {
    /// Set the acceptance threshold
    pub fn acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = Some(threshold);
        self
    }

    /// Set the redundancy factor
    pub fn redundancy_factor(mut self, factor: f64) -> Self {
        self.redundancy_factor = Some(factor);
        self
    }

    /// Set the longest accepted candidate text
    pub fn max_candidate_chars(mut self, max: usize) -> Self {
        self.max_candidate_chars = Some(max);
        self
    }

    /// Set the element limit for the attribute scan
    pub fn max_elems_to_scan(mut self, max: usize) -> Self {
        self.max_elems_to_scan = Some(max);
        self
    }

    /// Select extraction paths
    pub fn paths(mut self, paths: ExtractionPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Enable or disable page info extraction
    pub fn extract_page_info(mut self, enabled: bool) -> Self {
        self.extract_page_info = Some(enabled);
        self
    }

    /// Build the AnalyzerOptions
    pub fn build(self) -> AnalyzerOptions {
        let defaults = AnalyzerOptions::default();
        AnalyzerOptions {
            acceptance_threshold: clamp_finite(
                self.acceptance_threshold,
                defaults.acceptance_threshold,
                0.0,
                1.0,
            ),
            redundancy_factor: clamp_finite(
                self.redundancy_factor,
                defaults.redundancy_factor,
                0.0,
                MAX_REDUNDANCY_FACTOR,
            ),
            max_candidate_chars: self
                .max_candidate_chars
                .unwrap_or(defaults.max_candidate_chars),
            max_elems_to_scan: self.max_elems_to_scan.unwrap_or(defaults.max_elems_to_scan),
            paths: self.paths.unwrap_or(defaults.paths),
            extract_page_info: self.extract_page_info.unwrap_or(defaults.extract_page_info),
        }
    }
}

fn clamp_finite(value: Option<f64>, default: f64, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => default,
    }
}
