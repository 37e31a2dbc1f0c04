//! Front-end libraries and CSS frameworks referenced by the page.
//!
//! Detection looks only at the URLs of external scripts and stylesheets. A
//! library counts when its name appears at the start of a word in the URL,
//! so `vue.min.js` and `cdn.tailwindcss.com` match but `revue.js` does not.

use crate::constants::{CSS_FRAMEWORKS, SCRIPT_LIBRARIES};
use scraper::{Html, Selector};
use std::collections::BTreeSet;

pub fn detect_frameworks(document: &Html) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect(document, "script[src]", "src", &SCRIPT_LIBRARIES, &mut found);
    collect(
        document,
        "link[rel~='stylesheet'][href]",
        "href",
        &CSS_FRAMEWORKS,
        &mut found,
    );
    found
}

fn collect(
    document: &Html,
    pattern: &str,
    attr: &str,
    known: &[&str],
    found: &mut BTreeSet<String>,
) {
    let Ok(selector) = Selector::parse(pattern) else {
        return;
    };
    for element in document.select(&selector) {
        let Some(source) = element.value().attr(attr) else {
            continue;
        };
        let source = source.to_ascii_lowercase();
        for name in known {
            if mentions(&source, name) {
                found.insert(name.to_string());
            }
        }
    }
}

fn mentions(source: &str, name: &str) -> bool {
    source.match_indices(name).any(|(i, _)| {
        source[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_ascii_alphabetic())
    })
}
