//! Text normalization: whitespace cleanup, quote stripping, truncation

use regex::Regex;
use std::sync::LazyLock;

/// Marker appended when a payload had to be cut to the length limit.
pub const TRUNCATION_MARKER: &str = "\n\n[truncated]";

/// Characters treated as end-of-sentence when deciding whether a line
/// break is a real break or leftover wrapping.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

static LINE_BREAK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[\r\n](?:\s*[\r\n])+").unwrap());

static NBSP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)&nbsp;").unwrap());

/// Normalize reduced text into its final plain form.
///
/// Collapses line-break runs to a single newline, unescapes `&nbsp;`,
/// drops nested-quote lines, heals line breaks left inside sentences
/// and trims the edges. Idempotent: running it on its own output is a
/// no-op.
///
/// Nested-quote lines go before sentence healing; the other way
/// around, healing would glue a `> >` line onto the line above it and
/// the quote filter would then drop both.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let text = LINE_BREAK_RUN_RE.replace_all(text, "\n");
    let text = NBSP_RE.replace_all(&text, " ");
    let text = strip_nested_quotes(&text);
    let text = heal_broken_sentences(&text);
    text.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, appending the visible
/// truncation marker when anything was dropped.
///
/// The bound counts characters, not bytes, so the cut never lands
/// inside a UTF-8 sequence. The marker is appended beyond the bound.
#[must_use]
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}

/// Drop every line that is a nested quote (trimmed content starting
/// with `> >`). Single-level quotes stay.
fn strip_nested_quotes(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("> >"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join line breaks that split a sentence: a newline whose preceding
/// character is not a sentence terminator and whose following
/// character is not another newline becomes a single space.
///
/// Lines opening with a bullet (`- `) or a quote marker keep their
/// break; a wrapped sentence never resumes with one of those.
fn heal_broken_sentences(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let splits_sentence = c == '\n'
            && i > 0
            && chars[i - 1] != '\n'
            && !SENTENCE_TERMINATORS.contains(&chars[i - 1])
            && chars.get(i + 1).is_some_and(|&next| next != '\n')
            && !begins_marked_line(&chars[i + 1..]);

        if splits_sentence {
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}

fn begins_marked_line(rest: &[char]) -> bool {
    match rest.first() {
        Some('>') => true,
        Some('-') => matches!(rest.get(1), Some(' ')),
        _ => false,
    }
}
