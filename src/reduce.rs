//! Markup reduction: HTML bodies to channel-safe, line-oriented text
//!
//! The reducer is an ordered chain of regex rewrites rather than a
//! parse-and-render step. Email clients routinely emit unbalanced or
//! otherwise malformed markup; a sequential reduction degrades
//! gracefully where a strict parser would reject the whole body. Later
//! passes assume earlier ones already ran, so the order is part of the
//! contract and must not be changed.

use crate::types::BodyKind;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Inline tags the destination channel renders natively; everything
/// else is removed.
pub const ALLOWED_TAGS: [&str; 13] = [
    "bold", "strong", "i", "em", "u", "ins", "s", "strike", "del", "b", "a", "code", "pre",
];

static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*img\b[^>]*?/?\s*>").unwrap());

static IMG_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\b(?:alt|title)\s*=\s*"([^"]*)""#).unwrap());

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\s+").unwrap());

static TAG_WITH_ATTRS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").unwrap());

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bhref\s*=\s*"[^"]*""#).unwrap());

// One pattern per tag name: a <script> closed by </style> must stay,
// so the open and close names cannot be matched independently.
static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*script\s*>.*?</\s*script\s*>").unwrap());

static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*style\s*>.*?</\s*style\s*>").unwrap());

static BLOCK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?\s*(?:p|div|table|h\d+)\s*>").unwrap());

static TR_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</\s*tr\s*>").unwrap());

static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?\s*br\s*[^>]*>").unwrap());

static LI_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:<\s*[ou]l\s*>[^<]*)?<\s*li\s*>").unwrap());

static LI_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</\s*li\s*>(?:[^<]*</\s*[ou]l\s*>)?").unwrap());

static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^<\s*/?\s*([a-zA-Z]+)").unwrap());

static BARE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*a\s*>([^<]*)</\s*a\s*>").unwrap());

static TEXTLESS_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*a\s*[^>]*>\s*</\s*a\s*>").unwrap());

static EMPTY_ELEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\s*(\w+)\s*>\s*</\s*(\w+)\s*>").unwrap());

/// Reduce a textual body to the channel-safe plain form.
///
/// Plain text passes through unchanged; HTML goes through the ordered
/// rewrite chain. Entity unescaping (`&nbsp;`) belongs to the
/// normalizer, which runs on both flavors.
#[must_use]
pub fn reduce_markup(kind: BodyKind, text: &str) -> String {
    match kind {
        BodyKind::Plain => text.to_string(),
        BodyKind::Html => reduce_html(text),
    }
}

fn reduce_html(text: &str) -> String {
    let text = replace_images(text);
    let text = collapse_whitespace(&text);
    let text = strip_attributes(&text);
    let text = drop_script_style_blocks(&text);
    let text = break_block_elements(&text);
    let text = bullet_list_items(&text);
    let text = filter_allowed_tags(&text);
    let text = unwrap_bare_links(&text);
    drop_empty_elements(&text)
}

/// Replace each image element with its `alt` or `title` text.
fn replace_images(text: &str) -> String {
    IMG_RE
        .replace_all(text, |caps: &Captures| {
            IMG_TEXT_RE
                .captures(&caps[0])
                .map_or_else(String::new, |attr| attr[1].to_string())
        })
        .into_owned()
}

/// Collapse whitespace runs to a single space, browser-style, and trim.
/// Destroys original line structure on purpose; block-level passes
/// reintroduce the breaks that matter.
fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text, " ").trim().to_string()
}

/// Strip every attribute, keeping only `href` on hyperlinks. Closing
/// tags come out bare as well, so later patterns can assume
/// attribute-free tags.
fn strip_attributes(text: &str) -> String {
    TAG_WITH_ATTRS_RE
        .replace_all(text, |caps: &Captures| {
            let name = &caps[2];
            if !caps[1].is_empty() {
                return format!("</{name}>");
            }
            if name.eq_ignore_ascii_case("a")
                && let Some(href) = HREF_RE.find(&caps[0])
            {
                return format!("<{name} {}>", href.as_str());
            }
            format!("<{name}>")
        })
        .into_owned()
}

/// Remove script and style elements with their entire content. Only
/// balanced same-name pairs are removed; a mismatched pair survives to
/// the allow-list filter.
fn drop_script_style_blocks(text: &str) -> String {
    let text = SCRIPT_BLOCK_RE.replace_all(text, "");
    STYLE_BLOCK_RE.replace_all(&text, "").into_owned()
}

/// Turn block-level elements, row ends and line breaks into newlines.
fn break_block_elements(text: &str) -> String {
    let text = BLOCK_TAG_RE.replace_all(text, "\n");
    let text = TR_CLOSE_RE.replace_all(&text, "\n");
    BR_RE.replace_all(&text, "\n").into_owned()
}

/// Rewrite list items as `- ` bullets. The first item of a list also
/// swallows the list-container open tag sitting before it.
fn bullet_list_items(text: &str) -> String {
    let text = LI_OPEN_RE.replace_all(text, "\n- ");
    LI_CLOSE_RE.replace_all(&text, "\n").into_owned()
}

/// Drop every tag outside the allow list. Disallowed tags become a
/// single space so adjacent words stay separated.
fn filter_allowed_tags(text: &str) -> String {
    ANY_TAG_RE
        .replace_all(text, |caps: &Captures| {
            let allowed = TAG_NAME_RE
                .captures(&caps[0])
                .is_some_and(|name| ALLOWED_TAGS.iter().any(|t| name[1].eq_ignore_ascii_case(t)));
            if allowed {
                caps[0].to_string()
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Unwrap attribute-less links around text and drop links with no text
/// at all (tracking pixels and counters).
fn unwrap_bare_links(text: &str) -> String {
    let text = BARE_LINK_RE.replace_all(text, "$1 ");
    TEXTLESS_LINK_RE.replace_all(&text, " ").into_owned()
}

/// Drop leftover elements with matching open/close and nothing but
/// whitespace between.
fn drop_empty_elements(text: &str) -> String {
    EMPTY_ELEMENT_RE
        .replace_all(text, |caps: &Captures| {
            if caps[1].eq_ignore_ascii_case(&caps[2]) {
                " ".to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
