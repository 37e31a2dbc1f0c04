//! Candidate text normalization and merging.
//!
//! [`Normalizer::normalize`] turns a raw attribute value or comment fragment
//! into the text that names an entity, or rejects it. The cleaning rules are
//! applied until the text stops changing, which makes normalization
//! idempotent.
//!
//! [`Normalizer::merge`] folds raw candidates whose normalized text is equal
//! (ignoring case) into a single [`Candidate`], counting the distinct source
//! locations that support it.

use crate::catalog::{EntityRole, SignalKind};
use crate::constants::{BOILERPLATE_STOPLIST, ENCLOSING_PAIRS, REGEXPS, SEPARATOR_CHARS};
use crate::extractor::{RawCandidate, SourceLocation};
use crate::options::AnalyzerOptions;
use std::collections::{BTreeSet, HashMap};

/// Normalized text of one raw candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// The bare entity name.
    pub name: String,
    /// The cleaned notice the name was taken from, when a copyright marker
    /// (`©`, `(c)`, `Copyright`, `版权所有`) preceded it.
    pub notice: Option<String>,
}

/// A deduplicated signal awaiting scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Text of the first-seen occurrence, original casing preserved.
    pub text: String,
    pub role: EntityRole,
    /// Kind of the most reliable contributing signal.
    pub kind: SignalKind,
    /// Highest base weight among the contributing signals.
    pub weight: f64,
    locations: BTreeSet<SourceLocation>,
    first_offset: usize,
}

impl Candidate {
    pub fn new(
        text: impl Into<String>,
        role: EntityRole,
        kind: SignalKind,
        weight: f64,
        location: SourceLocation,
        offset: usize,
    ) -> Self {
        Self {
            text: text.into(),
            role,
            kind,
            weight: weight.clamp(0.0, 1.0),
            locations: BTreeSet::from([location]),
            first_offset: offset,
        }
    }

    /// Record another occurrence. The same location counts once.
    pub fn add_occurrence(
        &mut self,
        location: SourceLocation,
        offset: usize,
        kind: SignalKind,
        weight: f64,
    ) {
        self.locations.insert(location);
        self.first_offset = self.first_offset.min(offset);
        if weight > self.weight {
            self.weight = weight.clamp(0.0, 1.0);
            self.kind = kind;
        }
    }

    /// Number of independent locations supporting this candidate.
    pub fn occurrence_count(&self) -> usize {
        self.locations.len()
    }

    /// Earliest source offset, used for tie-breaking.
    pub fn first_offset(&self) -> usize {
        self.first_offset
    }
}

/// Key under which candidates are considered equal.
pub fn fold_key(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    max_chars: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&AnalyzerOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: &AnalyzerOptions) -> Self {
        Self {
            max_chars: options.max_candidate_chars,
        }
    }

    /// Normalize `text` to a bare entity name, or `None` to reject it.
    pub fn normalize(&self, text: &str) -> Option<String> {
        self.normalize_signal(text).map(|n| n.name)
    }

    /// Normalize `text`, also keeping the full notice when a copyright prefix
    /// was stripped from it.
    pub fn normalize_signal(&self, text: &str) -> Option<NormalizedText> {
        if REGEXPS.placeholder.is_match(text) {
            return None;
        }

        let mut current = clean(text);
        let mut notice = None;
        loop {
            let (name, stripped_notice) = split_notice(&current);
            if notice.is_none() {
                notice = stripped_notice;
            }
            let next = clean(&name);
            if next == current {
                break;
            }
            current = next;
        }

        if self.is_rejected(&current) {
            return None;
        }

        Some(NormalizedText {
            name: current,
            notice: notice.filter(|n| n.chars().count() <= self.max_chars),
        })
    }

    fn is_rejected(&self, text: &str) -> bool {
        if text.is_empty() || !text.chars().any(char::is_alphabetic) {
            return true;
        }
        if text.chars().count() > self.max_chars || is_bare_notice(text) {
            return true;
        }
        if REGEXPS.placeholder.is_match(text) {
            return true;
        }
        let folded = fold_key(text);
        BOILERPLATE_STOPLIST.iter().any(|stop| *stop == folded)
    }

    /// Merge raw candidates (in document order) into deduplicated candidates.
    ///
    /// Candidates are keyed by role and case-folded text, so the same name
    /// seen as an author and as a copyright holder stays two candidates. A
    /// stripped copyright notice is kept as an extra copyright-holder
    /// candidate next to the bare name.
    pub fn merge(&self, raw: &[RawCandidate<'_>]) -> Vec<Candidate> {
        let mut merged: Vec<Candidate> = Vec::new();
        let mut index: HashMap<(EntityRole, String), usize> = HashMap::new();

        for candidate in raw {
            let Some(normalized) = self.normalize_signal(&candidate.raw_text) else {
                continue;
            };

            let mut entries = vec![(candidate.role(), normalized.name)];
            if let Some(notice) = normalized.notice {
                entries.push((EntityRole::CopyrightHolder, notice));
            }

            for (role, text) in entries {
                let key = (role, fold_key(&text));
                match index.get(&key) {
                    Some(&i) => merged[i].add_occurrence(
                        candidate.location,
                        candidate.source_offset,
                        candidate.kind(),
                        candidate.definition.base_weight,
                    ),
                    None => {
                        index.insert(key, merged.len());
                        merged.push(Candidate::new(
                            text,
                            role,
                            candidate.kind(),
                            candidate.definition.base_weight,
                            candidate.location,
                            candidate.source_offset,
                        ));
                    }
                }
            }
        }

        merged
    }
}

/// One pass of the cleaning rules.
fn clean(text: &str) -> String {
    let text = REGEXPS.comment_marker.replace_all(text, " ");
    let text = REGEXPS.markup_tag.replace_all(&text, " ");
    let text = REGEXPS.whitespace_run.replace_all(text.trim(), " ");
    let text = REGEXPS.rights_reserved_suffix.replace(&text, "");

    let mut text: &str = text.trim().trim_matches(SEPARATOR_CHARS).trim();
    while let Some(inner) = strip_enclosing(text) {
        text = inner.trim();
    }
    text.to_string()
}

fn strip_enclosing(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    let last = text.chars().next_back()?;
    if text.chars().count() < 2 {
        return None;
    }
    ENCLOSING_PAIRS
        .iter()
        .find(|(open, close)| *open == first && *close == last)
        .map(|_| &text[first.len_utf8()..text.len() - last.len_utf8()])
}

/// Split a leading copyright marker and/or year range off a named entity.
///
/// Returns the remaining name and, when a copyright marker was present, the
/// full notice. Text without a following named entity is returned unchanged.
fn split_notice(text: &str) -> (String, Option<String>) {
    if let Some(m) = REGEXPS.notice_prefix.find(text) {
        let rest = &text[m.end()..];
        if !m.as_str().is_empty() && rest.chars().any(char::is_alphabetic) {
            return (rest.to_string(), Some(text.to_string()));
        }
    }
    if let Some(m) = REGEXPS.year_prefix.find(text) {
        let rest = &text[m.end()..];
        if rest.chars().any(char::is_alphabetic) {
            return (rest.to_string(), None);
        }
    }
    (text.to_string(), None)
}

/// A copyright marker, optionally with years, and no named entity after it.
fn is_bare_notice(text: &str) -> bool {
    REGEXPS.notice_prefix.find(text).is_some_and(|m| {
        !m.as_str().is_empty() && !text[m.end()..].chars().any(char::is_alphabetic)
    })
}
