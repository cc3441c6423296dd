//! Markup insertion policy.
//!
//! Both the typewriter and the chat transcript insert text as markup so that
//! `<br>` renders as a line break. With [`MarkupPolicy::Raw`] anything else in
//! the text is interpreted as markup too, which is an injection exposure when
//! the text comes from a server or a user. [`MarkupPolicy::Sanitized`] escapes
//! the text first and then restores the line breaks.

use serde::Deserialize;

/// The line-break marker the components render as an actual break.
pub const LINE_BREAK: &str = "<br>";

/// Escaped spellings of the line break that are restored after escaping.
const ESCAPED_BREAKS: [&str; 3] = ["&lt;br&gt;", "&lt;br/&gt;", "&lt;br /&gt;"];

/// How text is turned into markup before insertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupPolicy {
    /// Escape everything except literal line breaks.
    #[default]
    Sanitized,
    /// Insert the text unchanged.
    Raw,
}

impl MarkupPolicy {
    /// Convert `text` into the markup that gets inserted into the page.
    #[must_use]
    pub fn render(self, text: &str) -> String {
        match self {
            Self::Sanitized => sanitize_preserving_breaks(text),
            Self::Raw => text.to_string(),
        }
    }

    /// Render a single revealed character.
    #[must_use]
    pub fn render_char(self, ch: char) -> String {
        match self {
            Self::Sanitized => escape_char(ch).map_or_else(|| ch.to_string(), str::to_string),
            Self::Raw => ch.to_string(),
        }
    }
}

fn escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        _ => None,
    }
}

/// Escape the HTML-significant characters in `s`.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match escape_char(ch) {
            Some(entity) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}

/// Escape `s`, then turn escaped `<br>` spellings back into line breaks.
#[must_use]
pub fn sanitize_preserving_breaks(s: &str) -> String {
    let mut out = escape_html(s);
    for escaped in ESCAPED_BREAKS {
        if out.contains(escaped) {
            out = out.replace(escaped, LINE_BREAK);
        }
    }
    out
}

/// Render markup as plain text: line breaks become `\n`, other tags are
/// dropped and the basic entities are decoded.
#[must_use]
pub fn to_plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(end) = rest.find('>') {
                let tag = rest[1..end].trim().trim_end_matches('/').trim();
                if tag.eq_ignore_ascii_case("br") {
                    out.push('\n');
                }
                rest = &rest[end + 1..];
                continue;
            }
        } else if ch == '&' {
            if let Some((decoded, len)) = decode_entity(rest) {
                out.push(decoded);
                rest = &rest[len..];
                continue;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn decode_entity(s: &str) -> Option<(char, usize)> {
    const ENTITIES: [(&str, char); 7] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#x27;", '\''),
        ("&#39;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| s.starts_with(entity))
        .map(|(entity, ch)| (*ch, entity.len()))
}
