//! Named constants and shared regular expressions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Base weight of an explicit `copyright` / `data-copyright` attribute.
pub const WEIGHT_COPYRIGHT: f64 = 0.60;
/// Base weight of the short `data-cpy` attribute.
pub const WEIGHT_CPY: f64 = 0.55;
pub const WEIGHT_AUTHOR: f64 = 0.55;
pub const WEIGHT_CREATOR: f64 = 0.50;
pub const WEIGHT_OWNER: f64 = 0.50;
pub const WEIGHT_POWERED_BY: f64 = 0.35;
/// Base weight of a generic `name` attribute.
pub const WEIGHT_NAME: f64 = 0.25;
/// Base weight of any pattern matched inside an HTML comment.
pub const WEIGHT_COMMENT: f64 = 0.15;
/// Base weight of a statement in the visible article text.
pub const WEIGHT_TEXT: f64 = 0.12;
/// `编辑：` names an editor; alone it stays below the default threshold.
pub const WEIGHT_TEXT_EDITOR: f64 = 0.10;

pub const DEFAULT_REDUNDANCY_FACTOR: f64 = 0.5;
/// Upper bound for the redundancy factor, which must stay below 1.
pub const MAX_REDUNDANCY_FACTOR: f64 = 0.99;
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.15;
pub const DEFAULT_MAX_CANDIDATE_CHARS: usize = 120;

/// Elements whose `name` attribute is structural rather than a person or entity.
pub const STRUCTURAL_NAME_TAGS: [&str; 15] = [
    "meta", "input", "select", "textarea", "button", "form", "a", "iframe", "param", "map",
    "object", "slot", "fieldset", "output", "img",
];

/// Layout words used as a generic `name` attribute value.
pub const LAYOUT_NAME_STOPLIST: [&str; 20] = [
    "logo", "content", "main", "header", "footer", "nav", "navigation", "menu", "banner",
    "sidebar", "top", "bottom", "container", "wrapper", "title", "image", "icon", "section",
    "body", "home",
];

/// Shortest ASCII value accepted for a generic `name` attribute.
pub const MIN_ASCII_NAME_CHARS: usize = 3;

/// Lowercased texts that never name an entity on their own.
pub const BOILERPLATE_STOPLIST: [&str; 18] = [
    "all rights reserved",
    "n/a",
    "na",
    "none",
    "null",
    "nil",
    "undefined",
    "unknown",
    "author",
    "authors",
    "copyright",
    "owner",
    "powered by",
    "版权所有",
    "未知",
    "无",
    "网络",
    "互联网",
];

/// Separator characters trimmed from either end of a candidate.
pub const SEPARATOR_CHARS: &[char] = &[
    ':', '：', ',', '，', ';', '；', '|', '-', '–', '—', '·', '•', '=', '/',
];

/// Quote and bracket pairs removed when they enclose the whole candidate.
pub const ENCLOSING_PAIRS: [(char, char); 14] = [
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
    ('\u{201C}', '\u{201D}'),
    ('\u{2018}', '\u{2019}'),
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('<', '>'),
    ('【', '】'),
    ('（', '）'),
    ('「', '」'),
    ('『', '』'),
    ('《', '》'),
];

/// Containers holding the article body, tried in order.
pub const ARTICLE_CONTAINER_SELECTORS: [&str; 2] = ["#js_content", ".rich_media_content"];

/// Elements that end a line of visible text.
pub const BLOCK_TAGS: [&str; 24] = [
    "p", "div", "section", "article", "header", "footer", "br", "hr", "li", "ul", "ol", "h1",
    "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "tr", "td", "figure",
    "figcaption",
];

/// Elements whose content is never visible text.
pub const SKIPPED_TEXT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// JavaScript libraries recognised in `<script src>`.
pub const SCRIPT_LIBRARIES: [&str; 8] = [
    "jquery", "bootstrap", "vue", "react", "angular", "lodash", "moment", "axios",
];

/// CSS frameworks recognised in stylesheet links.
pub const CSS_FRAMEWORKS: [&str; 5] = ["bootstrap", "foundation", "bulma", "tailwind", "materialize"];

pub struct Regexps {
    pub markup_tag: Regex,
    pub comment_marker: Regex,
    pub whitespace_run: Regex,
    pub placeholder: Regex,
    pub rights_reserved_suffix: Regex,
    pub notice_prefix: Regex,
    pub year_prefix: Regex,
    pub msg_title: Regex,
    pub nickname: Regex,
    pub html_decode_arg: Regex,
    pub create_time: Regex,
    pub publish_timestamp: Regex,
    pub loose_datetime: Regex,
    pub statement_label: Regex,
    pub contact_label: Regex,
    pub email: Regex,
    pub biz: Regex,
}

pub static REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    markup_tag: Regex::new(r"</?[A-Za-z!/][^<>]*>").unwrap(),
    comment_marker: Regex::new(r"<!--|-->").unwrap(),
    whitespace_run: Regex::new(r"\s+").unwrap(),
    placeholder: Regex::new(r"\{\{.*?\}\}|\$\{.*?\}|<%.*?%>|\[\[.*?\]\]|\{%.*?%\}").unwrap(),
    rights_reserved_suffix: Regex::new(
        r"(?i)[\s.,;，。；]*(?:all\s+rights\s+reserved|版权所有)[\s.。!！]*$",
    )
    .unwrap(),
    notice_prefix: Regex::new(
        r"(?i)^(?:copyright\b\s*(?:©|\(c\)|&copy;)?|©|\(c\)|&copy;|版权所有\s*[:：]?)\s*(?:(?:19|20)\d{2}(?:\s*[-–~～]\s*(?:(?:19|20)\d{2}|present|now))?\s*[,.]?\s*)?",
    )
    .unwrap(),
    year_prefix: Regex::new(
        r"^(?:19|20)\d{2}(?:\s*[-–~～]\s*(?:(?:19|20)\d{2}|present|now))?\s*[,.]?\s+",
    )
    .unwrap(),
    msg_title: Regex::new(r"var msg_title = ([^;]+);").unwrap(),
    nickname: Regex::new(r"var nickname = ([^;]+);").unwrap(),
    html_decode_arg: Regex::new(r#"htmlDecode\(["']([^"']*)["']\)"#).unwrap(),
    create_time: Regex::new(r#"var createTime = ['"]([^'"]*)['"];"#).unwrap(),
    publish_timestamp: Regex::new(r"var publish_time = (\d{10})").unwrap(),
    loose_datetime: Regex::new(r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2})").unwrap(),
    statement_label: Regex::new(
        r"(?:原创作者|作者|撰稿|编辑|文|来源|出处|转载自|版权所有|微信|邮箱|联系)\s*[:：]",
    )
    .unwrap(),
    contact_label: Regex::new(r"^\s*(?:微信|邮箱|联系)\s*[:：]\s*([^,;，；\n]+)").unwrap(),
    email: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap(),
    biz: Regex::new(r#"(?:__biz|\bbiz)\s*=\s*["']?([A-Za-z0-9+/=%_-]+)"#).unwrap(),
});
