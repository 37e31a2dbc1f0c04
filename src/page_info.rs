//! Descriptive page information (title, account, publish time, contacts).
//!
//! WeChat article pages render most of this server side into well-known
//! elements, and repeat it in inline script variables. Each field tries the
//! DOM selectors first and falls back to the script variables. None of these
//! values take part in scoring.

use crate::constants::REGEXPS;
use crate::utils;
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Information about the analysed page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub title: Option<String>,
    /// Public-account (or site) name.
    pub account_name: Option<String>,
    /// Public-account id (`__biz`), from the URL or inline scripts.
    pub account_id: Option<String>,
    pub publish_time: Option<String>,
    /// `<link rel="canonical">` target, else the input URL.
    pub canonical_url: Option<String>,
    /// WeChat ids, mailboxes and other contacts stated in the article body.
    #[serde(default)]
    pub contacts: Vec<String>,
}

pub fn extract_page_info(document: &Html, html: &str, url: Option<&str>) -> PageInfo {
    PageInfo {
        title: extract_title(document, html),
        account_name: extract_account_name(document, html),
        account_id: extract_account_id(html, url),
        publish_time: extract_publish_time(document, html),
        canonical_url: first_attr(document, "link[rel='canonical']", "href")
            .or_else(|| url.map(str::to_string)),
        contacts: extract_contacts(document),
    }
}

fn extract_title(document: &Html, html: &str) -> Option<String> {
    const SELECTORS: [&str; 4] = ["h1#activity-name", ".rich_media_title", "h1", "title"];

    first_text(document, &SELECTORS).or_else(|| {
        let caps = REGEXPS.msg_title.captures(html)?;
        let value = caps.get(1)?.as_str().trim();
        // 'Title'.html(false) or "Title".html(false)
        let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let title = value[1..].split(quote).next()?;
        non_empty(title)
    })
}

fn extract_account_name(document: &Html, html: &str) -> Option<String> {
    const SELECTORS: [&str; 4] = [
        "#js_name",
        ".rich_media_meta_nickname",
        ".account_nickname",
        ".profile_nickname",
    ];

    first_text(document, &SELECTORS).or_else(|| {
        let caps = REGEXPS.nickname.captures(html)?;
        let value = caps.get(1)?.as_str();
        let decoded = REGEXPS.html_decode_arg.captures(value)?;
        non_empty(decoded.get(1)?.as_str())
    })
}

fn extract_account_id(html: &str, url: Option<&str>) -> Option<String> {
    let from_url = url
        .and_then(|u| Url::parse(u.trim()).ok())
        .and_then(|u| {
            u.query_pairs()
                .find(|(key, _)| key == "__biz")
                .and_then(|(_, value)| non_empty(&value))
        });

    from_url.or_else(|| {
        REGEXPS
            .biz
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| non_empty(m.as_str()))
    })
}

/// Labelled contacts (`微信：`, `邮箱：`, `联系：`) and bare e-mail addresses.
fn extract_contacts(document: &Html) -> Vec<String> {
    let Some(text) = utils::article_text(document) else {
        return Vec::new();
    };
    let mut contacts: Vec<String> = Vec::new();

    for (_, statement) in utils::statements(&text) {
        let labelled = REGEXPS
            .contact_label
            .captures(statement)
            .and_then(|caps| caps.get(1))
            .and_then(|m| non_empty(m.as_str()));
        let found = labelled.into_iter().chain(
            REGEXPS
                .email
                .find_iter(statement)
                .map(|m| m.as_str().to_string()),
        );
        for contact in found {
            if !contacts.iter().any(|c| c.contains(&contact)) {
                contacts.push(contact);
            }
        }
    }

    contacts
}

fn extract_publish_time(document: &Html, html: &str) -> Option<String> {
    const SELECTORS: [&str; 4] = ["#publish_time", ".rich_media_meta_text", "[data-time]", ".time"];

    if let Some(text) = first_text(document, &SELECTORS) {
        return Some(text);
    }
    if let Some(caps) = REGEXPS.create_time.captures(html) {
        if let Some(value) = caps.get(1).and_then(|m| non_empty(m.as_str())) {
            return Some(value);
        }
    }
    if let Some(caps) = REGEXPS.publish_timestamp.captures(html) {
        let formatted = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string());
        if formatted.is_some() {
            return formatted;
        }
    }
    REGEXPS
        .loose_datetime
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|pattern| {
        let selector = Selector::parse(pattern).ok()?;
        let element = document.select(&selector).next()?;
        non_empty(&element.text().collect::<String>())
    })
}

fn first_attr(document: &Html, pattern: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(pattern).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr(attr).and_then(non_empty))
}

fn non_empty(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
