//! Raw signal extraction.
//!
//! Three independent paths feed the pipeline:
//!
//! - the **attribute scan** walks every element of the parsed document and
//!   looks each attribute name (and each `<meta>` key) up in the
//!   [`SignalCatalog`];
//! - the **comment scan** walks the raw source text for `<!-- … -->` blocks and
//!   applies the catalog's comment patterns to their bodies;
//! - the **text scan** splits the visible article body into statements and
//!   applies the catalog's text patterns to each one.
//!
//! The comment scan never touches the parsed document, so it still runs when
//! the other paths fail or the markup is too broken to parse usefully.

use crate::catalog::{EntityRole, Matcher, SignalCatalog, SignalDefinition, SignalKind};
use crate::error::{AttributionError, Result};
use crate::options::{AnalyzerOptions, ExtractionPaths};
use crate::utils;
use log::{debug, warn};
use regex::{Captures, Match};
use scraper::{ElementRef, Html, Selector};

/// Tags the HTML parser inserts when the source leaves them out.
const IMPLIED_TAGS: [&str; 6] = ["html", "head", "body", "tbody", "colgroup", "tr"];

/// Identity of the place a signal came from. Occurrences are counted per
/// distinct location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceLocation {
    /// An element, by its position in document order.
    Element(usize),
    /// A comment, by the byte offset of its `<!--`.
    Comment(usize),
    /// An article-text statement, by its byte offset in the extracted text.
    Text(usize),
}

/// A single match, before any cleaning.
#[derive(Debug, Clone)]
pub struct RawCandidate<'c> {
    /// Catalog entry that produced the match.
    pub definition: &'c SignalDefinition,
    /// Attribute name, meta key or pattern label as it matched.
    pub matched_pattern: String,
    pub raw_text: String,
    pub location: SourceLocation,
    /// Approximate byte offset in the source text, used for ordering.
    pub source_offset: usize,
}

impl<'c> RawCandidate<'c> {
    fn new(
        definition: &'c SignalDefinition,
        matched_pattern: impl Into<String>,
        raw_text: impl Into<String>,
        location: SourceLocation,
        source_offset: usize,
    ) -> Self {
        Self {
            definition,
            matched_pattern: matched_pattern.into(),
            raw_text: raw_text.into(),
            location,
            source_offset,
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.definition.kind
    }

    pub fn role(&self) -> EntityRole {
        self.definition.role
    }
}

/// Scans a document for raw candidates using a borrowed catalog.
pub struct Extractor<'c> {
    catalog: &'c SignalCatalog,
    options: &'c AnalyzerOptions,
}

impl<'c> Extractor<'c> {
    pub fn new(catalog: &'c SignalCatalog, options: &'c AnalyzerOptions) -> Self {
        Self { catalog, options }
    }

    /// Extract raw candidates in document order.
    ///
    /// `document` may be supplied when the caller already parsed `html`;
    /// otherwise it is parsed here. Never fails: a failing path is logged and
    /// contributes nothing.
    pub fn extract(&self, html: &str, document: Option<&Html>) -> Vec<RawCandidate<'c>> {
        let mut candidates = Vec::new();
        let paths = self.options.paths;

        if paths.intersects(ExtractionPaths::ATTRIBUTES | ExtractionPaths::TEXT) {
            let parsed;
            let document = match document {
                Some(document) => document,
                None => {
                    parsed = Html::parse_document(html);
                    &parsed
                }
            };

            if let Some(recovered) = recovered_parse_errors(document) {
                debug!("continuing after recovery: {}", recovered);
            }

            if paths.contains(ExtractionPaths::ATTRIBUTES) {
                match self.scan_attributes(html, document) {
                    Ok(found) => {
                        debug!("attribute scan produced {} candidates", found.len());
                        candidates.extend(found);
                    }
                    Err(e) => warn!("attribute scan skipped: {}", e),
                }
            }

            if paths.contains(ExtractionPaths::TEXT) {
                let found = self.scan_article_text(html, document);
                debug!("text scan produced {} candidates", found.len());
                candidates.extend(found);
            }
        }

        if self.options.paths.contains(ExtractionPaths::COMMENTS) {
            let found = self.scan_comments(html);
            debug!("comment scan produced {} candidates", found.len());
            candidates.extend(found);
        }

        candidates.sort_by_key(|c| c.source_offset);
        candidates
    }

    fn scan_attributes(&self, html: &str, document: &Html) -> Result<Vec<RawCandidate<'c>>> {
        let selector = Selector::parse("*")
            .map_err(|e| AttributionError::MalformedDocument(format!("{:?}", e)))?;
        let lowered = html.to_ascii_lowercase();
        let mut locator = TagLocator::new(&lowered);
        let mut found = Vec::new();

        for (visited, element) in document.select(&selector).enumerate() {
            let limit = self.options.max_elems_to_scan;
            if limit > 0 && visited >= limit {
                return Err(AttributionError::MaxElementsExceeded(limit));
            }

            let tag = element.value().name();
            let offset = locator.locate(tag);
            let location = SourceLocation::Element(visited);

            if tag == "meta" {
                if let Some(candidate) = self.meta_candidate(&element, location, offset) {
                    found.push(candidate);
                }
            }

            for (name, value) in element.value().attrs() {
                let Some(definition) = self.catalog.lookup(name) else {
                    continue;
                };
                if definition.is_ignored_on(tag) || !definition.accepts_value(value) {
                    continue;
                }
                found.push(RawCandidate::new(
                    definition,
                    name.to_ascii_lowercase(),
                    value,
                    location,
                    offset,
                ));
            }
        }

        Ok(found)
    }

    /// `<meta name|property="ns:key" content="…">` keyed by its last segment.
    fn meta_candidate(
        &self,
        element: &ElementRef,
        location: SourceLocation,
        offset: usize,
    ) -> Option<RawCandidate<'c>> {
        let content = element.value().attr("content")?;
        if content.trim().is_empty() {
            return None;
        }

        let name = element.value().attr("name").into_iter();
        let properties = element
            .value()
            .attr("property")
            .into_iter()
            .flat_map(str::split_whitespace);

        name.chain(properties).find_map(|key| {
            let definition = self.catalog.lookup(meta_key(key))?;
            Some(RawCandidate::new(
                definition,
                key.trim(),
                content,
                location,
                offset,
            ))
        })
    }

    fn scan_comments(&self, html: &str) -> Vec<RawCandidate<'c>> {
        let mut found = Vec::new();

        for block in comment_blocks(html) {
            for definition in self.catalog.comment_patterns() {
                let Matcher::Comment(regex) = &definition.matcher else {
                    continue;
                };
                for caps in regex.captures_iter(block.body) {
                    let Some(text) = extracted_text(&caps) else {
                        continue;
                    };
                    found.push(RawCandidate::new(
                        definition,
                        definition.label.as_str(),
                        text.as_str(),
                        SourceLocation::Comment(block.offset),
                        block.offset,
                    ));
                }
            }
        }

        found
    }

    fn scan_article_text(&self, html: &str, document: &Html) -> Vec<RawCandidate<'c>> {
        let Some(text) = utils::article_text(document) else {
            return Vec::new();
        };
        let mut found = Vec::new();

        for (offset, statement) in utils::statements(&text) {
            for definition in self.catalog.text_patterns() {
                let Matcher::Text(regex) = &definition.matcher else {
                    continue;
                };
                for caps in regex.captures_iter(statement) {
                    let Some(value) = extracted_text(&caps) else {
                        continue;
                    };
                    let source_offset = html.find(value.as_str().trim()).unwrap_or(html.len());
                    found.push(RawCandidate::new(
                        definition,
                        definition.label.as_str(),
                        value.as_str(),
                        SourceLocation::Text(offset),
                        source_offset,
                    ));
                }
            }
        }

        found
    }
}

/// The first participating capture group, else the whole match. Blank
/// captures yield nothing.
fn extracted_text<'t>(caps: &Captures<'t>) -> Option<Match<'t>> {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .or_else(|| caps.get(0))
        .filter(|m| !m.as_str().trim().is_empty())
}

/// Parse errors the HTML parser recovered from, as a path-local error.
fn recovered_parse_errors(document: &Html) -> Option<AttributionError> {
    let first = document.errors.first()?;
    Some(AttributionError::MalformedDocument(format!(
        "{} recovered parse errors, first: {}",
        document.errors.len(),
        first
    )))
}

/// Strip a namespace such as `article:`, `og:` or `dc.` from a meta key.
fn meta_key(key: &str) -> &str {
    let key = key.trim();
    key.rsplit([':', '.']).next().unwrap_or(key)
}

struct CommentBlock<'a> {
    offset: usize,
    body: &'a str,
}

/// Comment blocks of the raw text. An unterminated comment runs to the end.
fn comment_blocks(html: &str) -> Vec<CommentBlock<'_>> {
    const OPEN: &str = "<!--";
    const CLOSE: &str = "-->";

    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(rel) = html[pos..].find(OPEN) {
        let start = pos + rel;
        let body_start = start + OPEN.len();
        let (body, next) = match html[body_start..].find(CLOSE) {
            Some(end) => (
                &html[body_start..body_start + end],
                body_start + end + CLOSE.len(),
            ),
            None => (&html[body_start..], html.len()),
        };
        blocks.push(CommentBlock {
            offset: start,
            body,
        });
        pos = next;
    }
    blocks
}

/// Maps elements, visited in document order, back to their start tags in the
/// ASCII-lowercased source.
///
/// Tags the parser may insert on its own only match the very next start tag;
/// otherwise they get its offset and the cursor stays put. A tag that is not
/// found never moves the cursor.
struct TagLocator<'a> {
    lowered: &'a str,
    cursor: usize,
}

impl<'a> TagLocator<'a> {
    fn new(lowered: &'a str) -> Self {
        Self { lowered, cursor: 0 }
    }

    fn locate(&mut self, tag: &str) -> usize {
        if IMPLIED_TAGS.contains(&tag) {
            return match self.next_start_tag() {
                Some((start, name)) if name == tag => {
                    self.cursor = start + 1 + name.len();
                    start
                }
                Some((start, _)) => start,
                None => self.cursor,
            };
        }

        let needle = format!("<{}", tag);
        let bytes = self.lowered.as_bytes();
        let mut from = self.cursor;

        while let Some(rel) = self.lowered[from..].find(&needle) {
            let start = from + rel;
            let after = start + needle.len();
            let at_boundary = bytes
                .get(after)
                .map_or(true, |b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
            if at_boundary {
                self.cursor = after;
                return start;
            }
            from = after;
        }

        self.cursor
    }

    /// The next `<name` at or after the cursor, with its lowercased name.
    fn next_start_tag(&self) -> Option<(usize, &'a str)> {
        let bytes = self.lowered.as_bytes();
        let mut from = self.cursor;

        while let Some(rel) = self.lowered[from..].find('<') {
            let start = from + rel;
            let name_start = start + 1;
            let name_len = bytes[name_start..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
                .count();
            if name_len > 0 && bytes[name_start].is_ascii_alphabetic() {
                return Some((start, &self.lowered[name_start..name_start + name_len]));
            }
            from = name_start;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, options: &AnalyzerOptions) -> Vec<(SignalKind, String, usize)> {
        let catalog = SignalCatalog::standard();
        let extractor = Extractor::new(&catalog, options);
        extractor
            .extract(html, None)
            .into_iter()
            .map(|c| (c.kind(), c.raw_text, c.source_offset))
            .collect()
    }

    #[test]
    fn test_meta_author_and_copyright() {
        let html = r#"<html><head>
            <meta name="author" content="Jane Doe">
            <meta name="copyright" content="© 2024 Acme Corp">
        </head><body></body></html>"#;
        let found = extract(html, &AnalyzerOptions::default());
        let texts: Vec<&str> = found.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["Jane Doe", "© 2024 Acme Corp"]);
        assert!(found.iter().all(|(k, _, _)| *k == SignalKind::MetaAttribute));
        assert_eq!(found[0].2, html.find("<meta").unwrap());
    }

    #[test]
    fn test_meta_property_namespace_is_stripped() {
        let html = r#"<meta property="og:title article:author" content="Li Lei">"#;
        let found = extract(html, &AnalyzerOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, "Li Lei");
    }

    #[test]
    fn test_data_attribute_kind() {
        let html = r#"<div DATA-COPYRIGHT="Acme"></div><span data-cpy="Acme Media"></span>"#;
        let found = extract(html, &AnalyzerOptions::default());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|(k, _, _)| *k == SignalKind::DataAttribute));
    }

    #[test]
    fn test_structural_name_attributes_are_skipped() {
        let html = r#"<form name="search"><input name="q"></form><div name="Wang Fang"></div>"#;
        let found = extract(html, &AnalyzerOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, "Wang Fang");
    }

    #[test]
    fn test_layout_name_values_are_skipped() {
        let html = r#"<img name="logo" src="l.png"><div name="content"></div>
            <section name="main"></section><span name="xy"></span><div name="Chen Jing"></div>"#;
        let found = extract(html, &AnalyzerOptions::default());
        let texts: Vec<&str> = found.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["Chen Jing"]);
    }

    #[test]
    fn test_implied_table_elements_keep_real_offsets() {
        let html = r#"<table><tr><td><span author="Jane"></span></td></tr></table><p><em author="Jane"></em></p><table><tbody><tr><td>x</td></tr></tbody></table>"#;
        let catalog = SignalCatalog::standard();
        let options = AnalyzerOptions::default();
        let found = Extractor::new(&catalog, &options).extract(html, None);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].source_offset, html.find("<span").unwrap());
        assert_eq!(found[1].source_offset, html.find("<em").unwrap());
        assert_ne!(found[0].location, found[1].location);
    }

    #[test]
    fn test_two_attributes_on_one_element_share_a_location() {
        let html = r#"<div data-author="Jane" author="Jane"></div>"#;
        let catalog = SignalCatalog::standard();
        let options = AnalyzerOptions::default();
        let found = Extractor::new(&catalog, &options).extract(html, None);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].location, found[1].location);
    }

    #[test]
    fn test_article_text_statements() {
        let html = r#"<div id="js_content" class="rich_media_content">
            <p>作者：张三 编辑：李四</p>
            <p>正文内容</p>
            <p>本文版权归某某传媒所有 | 来源：某某日报</p>
        </div>"#;
        let catalog = SignalCatalog::standard();
        let options = AnalyzerOptions::default();
        let found = Extractor::new(&catalog, &options).extract(html, None);

        let text: Vec<(&str, &str)> = found
            .iter()
            .filter(|c| c.kind() == SignalKind::ArticleText)
            .map(|c| (c.definition.label.as_str(), c.raw_text.trim()))
            .collect();
        assert!(text.contains(&("text:zh-author", "张三")));
        assert!(text.contains(&("text:zh-editor", "李四")));
        assert!(text.contains(&("text:zh-belongs", "某某传媒")));
        assert!(text.contains(&("text:zh-source", "某某日报")));
        assert!(found
            .iter()
            .all(|c| matches!(c.location, SourceLocation::Text(_))));
    }

    #[test]
    fn test_text_path_can_be_disabled() {
        let html = r#"<div id="js_content"><p>作者：张三</p></div>"#;
        let options = AnalyzerOptions::builder()
            .paths(ExtractionPaths::ATTRIBUTES | ExtractionPaths::COMMENTS)
            .build();
        assert!(extract(html, &options).is_empty());
    }

    #[test]
    fn test_recovered_parse_errors_are_reported_as_malformed() {
        let document = Html::parse_document("<p>unclosed <b>markup</i></div>");
        assert!(matches!(
            recovered_parse_errors(&document),
            Some(AttributionError::MalformedDocument(_))
        ));
        let clean = Html::parse_document("<!DOCTYPE html><html><head></head><body></body></html>");
        assert!(recovered_parse_errors(&clean).is_none());
    }

    #[test]
    fn test_comment_patterns_use_comment_offset() {
        let html = "<p>x</p><!-- Powered by WeChat CMS, author: wx_user123 -->";
        let found = extract(html, &AnalyzerOptions::default());
        let offset = html.find("<!--").unwrap();
        assert!(found
            .iter()
            .any(|(k, t, o)| *k == SignalKind::HtmlComment && t.trim() == "wx_user123" && *o == offset));
        assert!(found.iter().any(|(_, t, _)| t.trim() == "WeChat CMS"));
    }

    #[test]
    fn test_unterminated_comment_is_still_scanned() {
        let html = "<div><p>broken <b>markup<!-- copyright 2023 Example Ltd";
        let found = extract(html, &AnalyzerOptions::default());
        assert!(found
            .iter()
            .any(|(_, t, _)| t.contains("Example Ltd")));
    }

    #[test]
    fn test_element_limit_only_drops_attribute_path() {
        let html = r#"<html><head><meta name="author" content="Jane"></head>
            <body><!-- author: Joe --></body></html>"#;
        let options = AnalyzerOptions::builder().max_elems_to_scan(1).build();
        let found = extract(html, &options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, SignalKind::HtmlComment);
    }

    #[test]
    fn test_paths_can_be_disabled() {
        let html = r#"<meta name="author" content="Jane"><!-- author: Joe -->"#;
        let options = AnalyzerOptions::builder()
            .paths(ExtractionPaths::COMMENTS)
            .build();
        let found = extract(html, &options);
        assert!(found.iter().all(|(k, _, _)| *k == SignalKind::HtmlComment));
    }

    #[test]
    fn test_candidates_are_in_document_order() {
        let html = r#"<!-- author: First --><div data-author="Second"></div><!-- author: Third -->"#;
        let found = extract(html, &AnalyzerOptions::default());
        let offsets: Vec<usize> = found.iter().map(|(_, _, o)| *o).collect();
        let mut sorted = offsets.clone();
        sorted.sort();
        assert_eq!(offsets, sorted);
        assert_eq!(found.first().unwrap().1.trim(), "First");
        assert_eq!(found.last().unwrap().1.trim(), "Third");
    }

    #[test]
    fn test_tag_locator_does_not_jump_for_implied_tags() {
        let lowered = "<table><tr><td>a</td></tr></table><table><tbody>";
        let mut locator = TagLocator::new(lowered);
        assert_eq!(locator.locate("html"), 0);
        assert_eq!(locator.locate("table"), 0);
        assert_eq!(locator.locate("tbody"), lowered.find("<tr").unwrap());
        assert_eq!(locator.locate("tr"), lowered.find("<tr").unwrap());
        assert_eq!(locator.locate("td"), lowered.find("<td").unwrap());
    }

    #[test]
    fn test_tag_locator_skips_prefix_matches() {
        let lowered = "<header></header><head><meta>";
        let mut locator = TagLocator::new(lowered);
        assert_eq!(locator.locate("head"), lowered.find("<head>").unwrap());
        assert_eq!(locator.locate("meta"), lowered.find("<meta").unwrap());
    }

    #[test]
    fn test_meta_key() {
        assert_eq!(meta_key("article:author"), "author");
        assert_eq!(meta_key("DC.Creator"), "Creator");
        assert_eq!(meta_key(" copyright "), "copyright");
    }
}
