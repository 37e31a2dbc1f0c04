//! Small helpers shared across modules.

use crate::constants::{ARTICLE_CONTAINER_SELECTORS, BLOCK_TAGS, REGEXPS, SKIPPED_TEXT_TAGS};
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Hosts serving WeChat public-account articles.
const WECHAT_ARTICLE_HOSTS: [&str; 2] = ["mp.weixin.qq.com", "weixin.qq.com"];

/// True when `url` is an absolute http(s) URL on a WeChat article host.
pub fn is_wechat_article_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        WECHAT_ARTICLE_HOSTS
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
    })
}

/// True when `text` holds nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Visible text of the article body, one line per block element.
///
/// `None` when the page has no known article container.
pub fn article_text(document: &Html) -> Option<String> {
    let container = ARTICLE_CONTAINER_SELECTORS.iter().find_map(|pattern| {
        let selector = Selector::parse(pattern).ok()?;
        document.select(&selector).next()
    })?;
    let mut text = String::new();
    collect_text(container, &mut text);
    Some(text)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TEXT_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Split text into statements, returning each with its byte offset.
///
/// Lines and `|` / `｜` / `丨` separate statements, and so does a known label
/// such as `作者：` or `编辑：` that follows whitespace on the same line.
pub fn statements(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '\n' | '|' | '｜' | '丨') {
            split_labels(text, start, i, &mut out);
            start = i + c.len_utf8();
        }
    }
    split_labels(text, start, text.len(), &mut out);
    out
}

fn split_labels<'t>(text: &'t str, start: usize, end: usize, out: &mut Vec<(usize, &'t str)>) {
    let segment = &text[start..end];
    let mut cut = 0;
    for label in REGEXPS.statement_label.find_iter(segment) {
        if label.start() > cut && segment[..label.start()].ends_with(char::is_whitespace) {
            push_statement(start + cut, &segment[cut..label.start()], out);
            cut = label.start();
        }
    }
    push_statement(start + cut, &segment[cut..], out);
}

fn push_statement<'t>(offset: usize, statement: &'t str, out: &mut Vec<(usize, &'t str)>) {
    if !is_blank(statement) {
        out.push((offset, statement));
    }
}
