//! # copyrightrs
//!
//! Infers who owns or authored a web article (primarily WeChat public-account
//! pages) from the signals scattered through its HTML source.
//!
//! ## Overview
//!
//! Copyright and authorship evidence shows up in inconsistent places: `<meta>`
//! tags, ad-hoc attributes such as `copyright`, `data-copyright` or
//! `data-cpy`, free text left in HTML comments by site generators, and
//! statements such as `作者：` or `本文版权归…所有` in the article body. This
//! crate collects those signals, cleans and deduplicates them, scores each one
//! by how reliable its source is and how often it is corroborated, and
//! reconciles them into a single ranked answer with a confidence in `[0, 1]`.
//!
//! Fetching the page is not part of this crate: callers hand in one fixed HTML
//! snapshot per analysis.
//!
//! ## Basic Usage
//!
//! ```rust
//! use copyrightrs::CopyrightAnalyzer;
//!
//! let html = r#"<html><head><meta name="author" content="Jane Doe"></head>
//!     <body><!-- Powered by WeChat CMS, author: wx_user123 --></body></html>"#;
//!
//! let report = CopyrightAnalyzer::new(html, None, None)?.analyze();
//!
//! assert_eq!(report.attribution.primary_author.as_deref(), Some("Jane Doe"));
//! assert!(report.attribution.all_authors.contains("wx_user123"));
//! # Ok::<(), copyrightrs::AttributionError>(())
//! ```
//!
//! ## The Engine Alone
//!
//! [`attribute_html`] is a pure function over the HTML text with an explicit
//! catalog and options. It never fails:
//!
//! ```rust
//! use copyrightrs::{attribute_html, AnalyzerOptions, SignalCatalog};
//!
//! let catalog = SignalCatalog::standard();
//! let options = AnalyzerOptions::default();
//!
//! let result = attribute_html("<p>no signals here</p>", &catalog, &options);
//! assert!(result.is_empty());
//! assert_eq!(result.overall_confidence, 0.0);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use copyrightrs::{AttributionError, CopyrightAnalyzer};
//!
//! match CopyrightAnalyzer::new("   ", None, None) {
//!     Err(AttributionError::InvalidInput(reason)) => eprintln!("rejected: {}", reason),
//!     Err(e) => eprintln!("Error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Algorithm
//!
//! Extraction runs three independent paths: an attribute scan over the parsed
//! document, a comment scan over the raw text and a statement scan over the
//! visible article body. Broken markup never silences comment signals. Candidates are normalized (quotes, markup,
//! boilerplate and copyright prefixes stripped) and merged when their
//! case-folded text matches. Each merged candidate scores
//! `min(1, base_weight * (1 + ln(1 + occurrences) * redundancy_factor))`, and
//! the overall confidence is the mean of the best author score and the best
//! copyright-holder score.

mod aggregator;
mod analyzer;
mod attribution;
mod catalog;
mod constants;
mod error;
mod extractor;
mod frameworks;
mod normalizer;
mod options;
mod page_info;
mod scoring;
mod utils;

// Public exports
pub use aggregator::Aggregator;
pub use analyzer::{attribute_html, rank_candidates, CopyrightAnalyzer};
pub use attribution::{AttributionResult, Report, ScoredCandidate};
pub use catalog::{EntityRole, Matcher, SignalCatalog, SignalDefinition, SignalKind};
pub use error::{AttributionError, Result};
pub use extractor::{Extractor, RawCandidate, SourceLocation};
pub use frameworks::detect_frameworks;
pub use normalizer::{fold_key, Candidate, NormalizedText, Normalizer};
pub use options::{AnalyzerOptions, AnalyzerOptionsBuilder, ExtractionPaths};
pub use page_info::PageInfo;
pub use scoring::{rank_order, redundancy_score, Scorer};
pub use utils::{article_text, is_wechat_article_url};
