//! Signal catalog: the registry of attribute names, comment patterns and
//! article-text patterns that carry authorship or ownership evidence.
//!
//! The catalog is an immutable value built once with [`SignalCatalog::standard`]
//! (optionally extended through [`SignalCatalog::with_attribute`],
//! [`SignalCatalog::with_comment_pattern`] and
//! [`SignalCatalog::with_text_pattern`]) and then passed by reference into
//! the extraction and scoring stages. Lookups are plain table lookups; the
//! extractor never branches on specific attribute names.
//!
//! ## Example
//!
//! ```rust
//! use copyrightrs::{EntityRole, SignalCatalog, SignalKind};
//!
//! let catalog = SignalCatalog::standard();
//!
//! let def = catalog.lookup("Data-Copyright").unwrap();
//! assert_eq!(def.kind, SignalKind::DataAttribute);
//! assert_eq!(def.role, EntityRole::CopyrightHolder);
//!
//! assert!(catalog.lookup("class").is_none());
//! ```

use crate::constants::{
    LAYOUT_NAME_STOPLIST, MIN_ASCII_NAME_CHARS, STRUCTURAL_NAME_TAGS, WEIGHT_AUTHOR,
    WEIGHT_COMMENT, WEIGHT_COPYRIGHT, WEIGHT_CPY, WEIGHT_CREATOR, WEIGHT_NAME, WEIGHT_OWNER,
    WEIGHT_POWERED_BY, WEIGHT_TEXT, WEIGHT_TEXT_EDITOR,
};
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a signal was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A named attribute, or a `<meta name|property=… content=…>` pair.
    MetaAttribute,
    /// Text matched inside an HTML comment.
    HtmlComment,
    /// A `data-*` attribute.
    DataAttribute,
    /// A statement in the visible article text.
    ArticleText,
}

/// Which side of the attribution a signal speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRole {
    /// author, creator, name
    Author,
    /// copyright, owner, powered-by, data-copyright, data-cpy
    CopyrightHolder,
}

/// How a signal is recognised.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Lowercased attribute (or meta key) name.
    Attribute(String),
    /// Case-insensitive pattern applied to comment bodies. The first capture
    /// group that participates holds the extracted text; without groups the
    /// whole match is used.
    Comment(Regex),
    /// Pattern applied to single statements of the article text, with the
    /// same capture rules as [`Matcher::Comment`].
    Text(Regex),
}

/// A recognised signal and its prior reliability.
#[derive(Debug, Clone)]
pub struct SignalDefinition {
    /// Short stable identifier, e.g. `copyright`, `data-cpy` or `comment:author`.
    pub label: String,
    pub kind: SignalKind,
    pub role: EntityRole,
    pub matcher: Matcher,
    /// Prior reliability in `[0, 1]`.
    pub base_weight: f64,
    /// Tags on which this attribute is structural and must be skipped.
    pub ignored_on: Vec<String>,
    /// Lowercased values that never name an entity for this signal.
    pub rejected_values: Vec<String>,
    /// Shortest accepted value when the value is plain ASCII.
    pub min_ascii_chars: usize,
}

impl SignalDefinition {
    fn new(label: &str, kind: SignalKind, role: EntityRole, matcher: Matcher, weight: f64) -> Self {
        Self {
            label: label.to_string(),
            kind,
            role,
            matcher,
            base_weight: weight.clamp(0.0, 1.0),
            ignored_on: Vec::new(),
            rejected_values: Vec::new(),
            min_ascii_chars: 0,
        }
    }

    /// True when the attribute carries no attribution meaning on `tag`.
    pub fn is_ignored_on(&self, tag: &str) -> bool {
        self.ignored_on.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// True when `value` may name an entity for this signal.
    pub fn accepts_value(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if value.is_ascii() && value.len() < self.min_ascii_chars {
            return false;
        }
        let folded = value.to_lowercase();
        !self.rejected_values.iter().any(|v| *v == folded)
    }
}

/// Immutable registry of attribute and comment signals.
#[derive(Debug, Clone)]
pub struct SignalCatalog {
    attributes: HashMap<String, SignalDefinition>,
    comment_patterns: Vec<SignalDefinition>,
    text_patterns: Vec<SignalDefinition>,
}

impl Default for SignalCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SignalCatalog {
    /// An empty catalog, useful as a starting point for fully custom tables.
    pub fn empty() -> Self {
        Self {
            attributes: HashMap::new(),
            comment_patterns: Vec::new(),
            text_patterns: Vec::new(),
        }
    }

    /// The built-in table.
    ///
    /// Attribute weights are ranked from `copyright` down through `author`,
    /// `creator` and `owner`, then `powered-by`, then `name`. Every comment
    /// pattern sits below all attribute signals, and article-text statements
    /// sit below comments.
    pub fn standard() -> Self {
        const ATTRIBUTES: [(&str, EntityRole, f64); 7] = [
            ("copyright", EntityRole::CopyrightHolder, WEIGHT_COPYRIGHT),
            ("author", EntityRole::Author, WEIGHT_AUTHOR),
            ("creator", EntityRole::Author, WEIGHT_CREATOR),
            ("owner", EntityRole::CopyrightHolder, WEIGHT_OWNER),
            ("powered-by", EntityRole::CopyrightHolder, WEIGHT_POWERED_BY),
            ("name", EntityRole::Author, WEIGHT_NAME),
            ("data-cpy", EntityRole::CopyrightHolder, WEIGHT_CPY),
        ];

        const COMMENT_PATTERNS: [(&str, EntityRole, &str); 8] = [
            (
                "comment:copyright",
                EntityRole::CopyrightHolder,
                r"(?i)((?:copyright\b\s*(?:©|\(c\)|&copy;)?|©|&copy;|\(c\)\s*(?:19|20)\d{2})[^,;，；|\n]*)",
            ),
            (
                "comment:rights-reserved",
                EntityRole::CopyrightHolder,
                r"(?i)([^,;，；|\n.©]{2,60}?)[.,]?\s*all\s+rights\s+reserved",
            ),
            (
                "comment:powered-by",
                EntityRole::CopyrightHolder,
                r"(?i)\bpowered\s+by\s+([^,;，；|\n]+)",
            ),
            (
                "comment:author",
                EntityRole::Author,
                r"(?i)\b(?:author|creator)\s*[:：=]\s*([^,;，；|\n]+)|\bwritten\s+by\s+([^,;，；|\n]+)",
            ),
            (
                "comment:zh-rights",
                EntityRole::CopyrightHolder,
                r"版权所有\s*[:：]\s*([^,;，；|\n]+)",
            ),
            (
                "comment:zh-belongs",
                EntityRole::CopyrightHolder,
                r"(?:本文)?(?:版权|著作权)归\s*([^,;，；|\n]+?)\s*所有",
            ),
            (
                "comment:zh-author",
                EntityRole::Author,
                r"(?:原创作者|作者|撰稿)\s*[:：]\s*([^,;，；|\n]+)",
            ),
            (
                "comment:zh-source",
                EntityRole::CopyrightHolder,
                r"转载请注明\s*(?:来源|出处)\s*[:：]\s*([^,;，；|\n]+)",
            ),
        ];

        // Applied to one statement at a time, so `^` is the statement start.
        const TEXT_PATTERNS: [(&str, EntityRole, &str, f64); 6] = [
            (
                "text:copyright",
                EntityRole::CopyrightHolder,
                r"(?i)((?:copyright\b\s*(?:©|\(c\)|&copy;)?|©|\(c\)\s*(?:19|20)\d{2})[^,;，；|\n]*)",
                WEIGHT_TEXT,
            ),
            (
                "text:zh-rights",
                EntityRole::CopyrightHolder,
                r"版权所有\s*[:：]\s*([^,;，；|\n]+)",
                WEIGHT_TEXT,
            ),
            (
                "text:zh-belongs",
                EntityRole::CopyrightHolder,
                r"(?:本文)?(?:版权|著作权)归\s*([^,;，；|\n]+?)\s*所有",
                WEIGHT_TEXT,
            ),
            (
                "text:zh-author",
                EntityRole::Author,
                r"(?:原创作者|作者|撰稿)\s*[:：]\s*([^,;，；|\n]+)|^\s*文\s*[:：]\s*([^,;，；|\n]+)",
                WEIGHT_TEXT,
            ),
            (
                "text:zh-editor",
                EntityRole::Author,
                r"编辑\s*[:：]\s*([^,;，；|\n]+)",
                WEIGHT_TEXT_EDITOR,
            ),
            (
                "text:zh-source",
                EntityRole::CopyrightHolder,
                r"(?:来源|出处|转载自)\s*[:：]\s*([^,;，；|\n]+)",
                WEIGHT_TEXT,
            ),
        ];

        let mut catalog = Self::empty();
        for (name, role, weight) in ATTRIBUTES {
            catalog.register_attribute(name, role, weight);
        }
        catalog.restrict_attribute(
            "name",
            &STRUCTURAL_NAME_TAGS,
            &LAYOUT_NAME_STOPLIST,
            MIN_ASCII_NAME_CHARS,
        );

        for (label, role, pattern) in COMMENT_PATTERNS {
            let regex = Regex::new(pattern).expect("built-in comment pattern is valid");
            catalog.comment_patterns.push(SignalDefinition::new(
                label,
                SignalKind::HtmlComment,
                role,
                Matcher::Comment(regex),
                WEIGHT_COMMENT,
            ));
        }
        for (label, role, pattern, weight) in TEXT_PATTERNS {
            let regex = Regex::new(pattern).expect("built-in text pattern is valid");
            catalog.text_patterns.push(SignalDefinition::new(
                label,
                SignalKind::ArticleText,
                role,
                Matcher::Text(regex),
                weight,
            ));
        }
        catalog
    }

    /// Adds (or replaces) an attribute signal and its `data-` twin.
    pub fn with_attribute(mut self, name: &str, role: EntityRole, base_weight: f64) -> Self {
        self.register_attribute(name, role, base_weight);
        self
    }

    /// Appends a comment pattern. Patterns are compiled case-insensitively.
    pub fn with_comment_pattern(
        mut self,
        label: &str,
        role: EntityRole,
        pattern: &str,
        base_weight: f64,
    ) -> Result<Self> {
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        self.comment_patterns.push(SignalDefinition::new(
            label,
            SignalKind::HtmlComment,
            role,
            Matcher::Comment(regex),
            base_weight,
        ));
        Ok(self)
    }

    /// Appends an article-text pattern. Patterns are compiled
    /// case-insensitively and see one statement at a time.
    pub fn with_text_pattern(
        mut self,
        label: &str,
        role: EntityRole,
        pattern: &str,
        base_weight: f64,
    ) -> Result<Self> {
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        self.text_patterns.push(SignalDefinition::new(
            label,
            SignalKind::ArticleText,
            role,
            Matcher::Text(regex),
            base_weight,
        ));
        Ok(self)
    }

    /// Looks up an attribute or meta key, ignoring ASCII case.
    ///
    /// `data-<name>` resolves to the [`SignalKind::DataAttribute`] variant of
    /// `<name>`.
    pub fn lookup(&self, attribute_name: &str) -> Option<&SignalDefinition> {
        let key = attribute_name.trim().to_ascii_lowercase();
        self.attributes.get(&key)
    }

    /// Comment patterns in the order they are applied.
    pub fn comment_patterns(&self) -> &[SignalDefinition] {
        &self.comment_patterns
    }

    /// Article-text patterns in the order they are applied.
    pub fn text_patterns(&self) -> &[SignalDefinition] {
        &self.text_patterns
    }

    fn register_attribute(&mut self, name: &str, role: EntityRole, weight: f64) {
        let name = name.trim().to_ascii_lowercase();
        let base = name.strip_prefix("data-").unwrap_or(&name).to_string();

        if base != name {
            // Registered only in its prefixed form, e.g. `data-cpy`.
            self.insert(&name, SignalKind::DataAttribute, role, weight);
            return;
        }

        self.insert(&base, SignalKind::MetaAttribute, role, weight);
        self.insert(&format!("data-{}", base), SignalKind::DataAttribute, role, weight);
    }

    /// Value rules shared by an attribute and its `data-` twin.
    fn restrict_attribute(
        &mut self,
        name: &str,
        ignored_on: &[&str],
        rejected_values: &[&str],
        min_ascii_chars: usize,
    ) {
        for key in [name.to_string(), format!("data-{}", name)] {
            if let Some(definition) = self.attributes.get_mut(&key) {
                definition.ignored_on = ignored_on.iter().map(|t| t.to_string()).collect();
                definition.rejected_values =
                    rejected_values.iter().map(|v| v.to_string()).collect();
                definition.min_ascii_chars = min_ascii_chars;
            }
        }
    }

    fn insert(&mut self, name: &str, kind: SignalKind, role: EntityRole, base_weight: f64) {
        self.attributes.insert(
            name.to_string(),
            SignalDefinition::new(
                name,
                kind,
                role,
                Matcher::Attribute(name.to_string()),
                base_weight,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = SignalCatalog::standard();
        let def = catalog.lookup("COPYRIGHT").unwrap();
        assert_eq!(def.kind, SignalKind::MetaAttribute);
        assert_eq!(def.role, EntityRole::CopyrightHolder);
    }

    #[test]
    fn test_data_prefix_shares_role_and_weight() {
        let catalog = SignalCatalog::standard();
        let plain = catalog.lookup("author").unwrap();
        let data = catalog.lookup("data-author").unwrap();
        assert_eq!(data.kind, SignalKind::DataAttribute);
        assert_eq!(plain.role, data.role);
        assert_eq!(plain.base_weight, data.base_weight);
    }

    #[test]
    fn test_data_cpy_is_registered_without_plain_twin() {
        let catalog = SignalCatalog::standard();
        assert_eq!(
            catalog.lookup("data-cpy").unwrap().role,
            EntityRole::CopyrightHolder
        );
        assert!(catalog.lookup("cpy").is_none());
        assert!(catalog.lookup("data-powered-by").is_some());
        assert!(catalog.lookup("href").is_none());
    }

    #[test]
    fn test_weights_follow_reliability_ranking() {
        let catalog = SignalCatalog::standard();
        let w = |name: &str| catalog.lookup(name).unwrap().base_weight;
        assert!(w("copyright") > w("author"));
        assert!(w("author") >= w("creator"));
        assert!(w("owner") > w("powered-by"));
        assert!(w("powered-by") > w("name"));
        for pattern in catalog.comment_patterns() {
            assert!(w("name") > pattern.base_weight, "{}", pattern.label);
        }
        for pattern in catalog.text_patterns() {
            assert!(WEIGHT_COMMENT > pattern.base_weight, "{}", pattern.label);
            assert_eq!(pattern.kind, SignalKind::ArticleText);
        }
    }

    #[test]
    fn test_name_is_ignored_on_structural_tags() {
        let catalog = SignalCatalog::standard();
        let name = catalog.lookup("name").unwrap();
        assert!(name.is_ignored_on("INPUT"));
        assert!(name.is_ignored_on("meta"));
        assert!(!name.is_ignored_on("div"));
        assert!(name.is_ignored_on("img"));
        assert!(catalog.lookup("data-name").unwrap().is_ignored_on("img"));
        assert!(!catalog.lookup("author").unwrap().is_ignored_on("meta"));
    }

    #[test]
    fn test_name_rejects_layout_words_and_short_ascii() {
        let catalog = SignalCatalog::standard();
        let name = catalog.lookup("name").unwrap();
        assert!(!name.accepts_value("Logo"));
        assert!(!name.accepts_value(" content "));
        assert!(!name.accepts_value("ab"));
        assert!(name.accepts_value("张三"));
        assert!(name.accepts_value("Wang Fang"));

        let author = catalog.lookup("author").unwrap();
        assert!(author.accepts_value("Al"));
        assert!(author.accepts_value("main"));
    }

    #[test]
    fn test_text_patterns_capture_statements() {
        let catalog = SignalCatalog::standard();
        let capture = |label: &str, text: &str| -> Option<String> {
            let def = catalog.text_patterns().iter().find(|d| d.label == label)?;
            let Matcher::Text(regex) = &def.matcher else {
                return None;
            };
            let caps = regex.captures(text)?;
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str().trim().to_string())
        };
        assert_eq!(capture("text:zh-author", "作者：张三").as_deref(), Some("张三"));
        assert_eq!(capture("text:zh-author", "文：李四").as_deref(), Some("李四"));
        assert_eq!(capture("text:zh-author", "原文：链接"), None);
        assert_eq!(capture("text:zh-source", "转载自：某某日报").as_deref(), Some("某某日报"));
        assert_eq!(capture("text:zh-editor", "责任编辑：王五").as_deref(), Some("王五"));
    }

    #[test]
    fn test_extension_does_not_touch_existing_entries() {
        let catalog = SignalCatalog::standard()
            .with_attribute("publisher", EntityRole::CopyrightHolder, 0.45)
            .with_comment_pattern("comment:editor", EntityRole::Author, r"editor:\s*(\S+)", 0.1)
            .unwrap();

        assert_eq!(
            catalog.lookup("data-publisher").unwrap().kind,
            SignalKind::DataAttribute
        );
        assert_eq!(catalog.comment_patterns().last().unwrap().label, "comment:editor");
        let catalog = catalog
            .with_text_pattern("text:photo", EntityRole::Author, r"摄影[:：]\s*(\S+)", 0.1)
            .unwrap();
        assert_eq!(catalog.text_patterns().last().unwrap().kind, SignalKind::ArticleText);
        assert_eq!(
            catalog.lookup("copyright").unwrap().base_weight,
            WEIGHT_COPYRIGHT
        );
    }

    #[test]
    fn test_invalid_comment_pattern_is_rejected() {
        let result =
            SignalCatalog::standard().with_comment_pattern("bad", EntityRole::Author, "(", 0.1);
        assert!(result.is_err());
    }
}
