//! The analysis pipeline and its caller-facing entry point.
//!
//! ```text
//! raw HTML -> Extractor -> RawCandidate* -> Normalizer -> Candidate*
//!          -> Scorer -> ScoredCandidate* -> Aggregator -> AttributionResult
//! ```
//!
//! [`attribute_html`] is the pure engine: a function of the HTML text, the
//! catalog and the options, with no I/O and no shared mutable state, so any
//! number of analyses may run concurrently. [`CopyrightAnalyzer`] is the
//! boundary used by front ends; it validates the input, keeps the URL for
//! logging and also gathers page information.
//!
//! ## Example
//!
//! ```rust
//! use copyrightrs::CopyrightAnalyzer;
//!
//! let html = r#"<html><head>
//!     <meta name="author" content="Jane Doe">
//!     <meta name="copyright" content="© 2024 Acme Corp">
//! </head><body></body></html>"#;
//!
//! let analyzer = CopyrightAnalyzer::new(html, Some("https://example.com/post"), None)?;
//! let report = analyzer.analyze();
//!
//! assert_eq!(report.attribution.primary_author.as_deref(), Some("Jane Doe"));
//! assert!(report.attribution.copyright_holders.contains("Acme Corp"));
//! assert!(report.attribution.overall_confidence > 0.5);
//! # Ok::<(), copyrightrs::AttributionError>(())
//! ```

use crate::aggregator::Aggregator;
use crate::attribution::{AttributionResult, Report, ScoredCandidate};
use crate::catalog::SignalCatalog;
use crate::error::{AttributionError, Result};
use crate::extractor::Extractor;
use crate::frameworks::detect_frameworks;
use crate::normalizer::Normalizer;
use crate::options::AnalyzerOptions;
use crate::page_info::extract_page_info;
use crate::scoring::Scorer;
use crate::utils;
use log::{debug, info};
use once_cell::sync::Lazy;
use scraper::Html;

static STANDARD_CATALOG: Lazy<SignalCatalog> = Lazy::new(SignalCatalog::standard);

/// Run extraction, normalization and scoring; candidates come back best first.
///
/// `document` may carry an already parsed form of `html`. Blank input yields
/// no candidates.
pub fn rank_candidates(
    html: &str,
    document: Option<&Html>,
    catalog: &SignalCatalog,
    options: &AnalyzerOptions,
) -> Vec<ScoredCandidate> {
    if utils::is_blank(html) {
        return Vec::new();
    }

    let raw = Extractor::new(catalog, options).extract(html, document);
    let merged = Normalizer::new(options).merge(&raw);
    debug!(
        "{} raw signals merged into {} candidates",
        raw.len(),
        merged.len()
    );
    Scorer::new(options).rank(merged)
}

/// Infer the attribution of one HTML snapshot.
///
/// Never fails. A page without signals, including empty or whitespace-only
/// input, gives an empty result with zero confidence.
pub fn attribute_html(
    html: &str,
    catalog: &SignalCatalog,
    options: &AnalyzerOptions,
) -> AttributionResult {
    let ranked = rank_candidates(html, None, catalog, options);
    Aggregator::new(options).aggregate(&ranked)
}

/// Analyzer for a single page snapshot.
///
/// Construction parses the document once; [`analyze`](Self::analyze) may be
/// called any number of times and always returns the same report.
pub struct CopyrightAnalyzer<'c> {
    document: Html,
    html: String,
    url: Option<String>,
    options: AnalyzerOptions,
    catalog: &'c SignalCatalog,
}

impl CopyrightAnalyzer<'static> {
    /// Create an analyzer over `html` using the standard signal catalog.
    ///
    /// # Arguments
    /// * `html` - The page source
    /// * `url` - Where the page came from; used for logging and page info only
    /// * `options` - Optional configuration options
    ///
    /// # Errors
    /// [`AttributionError::InvalidInput`] when `html` is empty or whitespace-only.
    pub fn new(html: &str, url: Option<&str>, options: Option<AnalyzerOptions>) -> Result<Self> {
        if utils::is_blank(html) {
            return Err(AttributionError::InvalidInput(
                "HTML document is empty".to_string(),
            ));
        }

        Ok(Self {
            document: Html::parse_document(html),
            html: html.to_string(),
            url: url.map(str::to_string),
            options: options.unwrap_or_default(),
            catalog: &STANDARD_CATALOG,
        })
    }

    /// Like [`new`](Self::new), for raw bytes that must be valid UTF-8.
    pub fn from_bytes(
        bytes: &[u8],
        url: Option<&str>,
        options: Option<AnalyzerOptions>,
    ) -> Result<Self> {
        let html = std::str::from_utf8(bytes)
            .map_err(|e| AttributionError::InvalidInput(format!("HTML is not UTF-8: {}", e)))?;
        Self::new(html, url, options)
    }
}

impl<'c> CopyrightAnalyzer<'c> {
    /// Use a custom catalog instead of the standard one.
    pub fn with_catalog<'d>(self, catalog: &'d SignalCatalog) -> CopyrightAnalyzer<'d> {
        CopyrightAnalyzer {
            document: self.document,
            html: self.html,
            url: self.url,
            options: self.options,
            catalog,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Only the attribution, without page info or the candidate list.
    pub fn attribution(&self) -> AttributionResult {
        let ranked = self.rank();
        Aggregator::new(&self.options).aggregate(&ranked)
    }

    /// Run the full analysis.
    pub fn analyze(&self) -> Report {
        let candidates = self.rank();
        let attribution = Aggregator::new(&self.options).aggregate(&candidates);

        let page = self
            .options
            .extract_page_info
            .then(|| extract_page_info(&self.document, &self.html, self.url.as_deref()));
        let frameworks = if self.options.extract_page_info {
            detect_frameworks(&self.document)
        } else {
            Default::default()
        };

        info!(
            "analysed {}: primary author {:?}, {} holders, confidence {:.3}",
            self.url.as_deref().unwrap_or("<snapshot>"),
            attribution.primary_author,
            attribution.copyright_holders.len(),
            attribution.overall_confidence
        );

        Report {
            is_wechat_article: self
                .url
                .as_deref()
                .is_some_and(utils::is_wechat_article_url),
            url: self.url.clone(),
            page,
            frameworks,
            attribution,
            candidates,
        }
    }

    fn rank(&self) -> Vec<ScoredCandidate> {
        rank_candidates(
            &self.html,
            Some(&self.document),
            self.catalog,
            &self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntityRole;

    #[test]
    fn test_blank_input_is_rejected_at_the_boundary() {
        assert!(matches!(
            CopyrightAnalyzer::new("  \n ", None, None),
            Err(AttributionError::InvalidInput(_))
        ));
        assert!(matches!(
            CopyrightAnalyzer::from_bytes(&[0xff, 0xfe, 0x00], None, None),
            Err(AttributionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_engine_accepts_blank_input() {
        let result = attribute_html(" \t", &SignalCatalog::standard(), &AnalyzerOptions::default());
        assert_eq!(result, AttributionResult::default());
    }

    #[test]
    fn test_report_marks_wechat_urls() {
        let html = r#"<html><body><a id="js_name">Some Account</a><!-- author: wx_user123 --></body></html>"#;
        let report = CopyrightAnalyzer::new(html, Some("https://mp.weixin.qq.com/s/x"), None)
            .unwrap()
            .analyze();
        assert!(report.is_wechat_article);
        assert_eq!(
            report.page.unwrap().account_name.as_deref(),
            Some("Some Account")
        );
        assert_eq!(report.attribution.primary_author.as_deref(), Some("wx_user123"));
    }

    #[test]
    fn test_page_info_can_be_disabled() {
        let options = AnalyzerOptions::builder().extract_page_info(false).build();
        let report = CopyrightAnalyzer::new("<title>T</title>", None, Some(options))
            .unwrap()
            .analyze();
        assert_eq!(report.page, None);
        assert!(report.frameworks.is_empty());
        assert!(!report.is_wechat_article);
    }

    #[test]
    fn test_report_lists_frameworks() {
        let html = r#"<html><head><script src="/js/jquery.min.js"></script></head>
            <body><!-- author: Joe Bloggs --></body></html>"#;
        let report = CopyrightAnalyzer::new(html, None, None).unwrap().analyze();
        assert!(report.frameworks.contains("jquery"));
        assert_eq!(report.attribution.primary_author.as_deref(), Some("Joe Bloggs"));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = SignalCatalog::standard().with_attribute(
            "publisher",
            EntityRole::CopyrightHolder,
            0.6,
        );
        let html = r#"<meta name="publisher" content="Example Press">"#;
        let result = CopyrightAnalyzer::new(html, None, None)
            .unwrap()
            .with_catalog(&catalog)
            .attribution();
        assert!(result.copyright_holders.contains("Example Press"));
    }
}
