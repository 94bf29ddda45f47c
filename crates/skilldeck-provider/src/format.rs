//! Minimal inline markup for assistant replies.
//!
//! Supports exactly what the role-play prompt asks the model to emit:
//! `**strong**`, `` `code` ``, `*emphasis*` and `- ` bullet lines. Spans are
//! line-local and never nest; there is no escaping. Unpaired delimiters are
//! left as literal text.

use std::sync::LazyLock;

use regex::Regex;

// Alternation order matters: `**` must win over `*` at the same position.
static INLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?P<strong>.+?)\*\*|`(?P<code>.+?)`|\*(?P<em>.+?)\*")
        .expect("Failed to compile inline markup regex")
});

const BULLET: &str = "- ";

/// An inline run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Strong(String),
    Code(String),
    Emphasis(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Text(s) | Span::Strong(s) | Span::Code(s) | Span::Emphasis(s) => s,
        }
    }
}

/// One rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Whitespace-only line, rendered as vertical spacing
    Blank,
    Paragraph(Vec<Span>),
    /// Bullet line with the marker stripped
    ListItem(Vec<Span>),
}

/// Split `text` into lines and parse inline spans on each
pub fn render(text: &str) -> Vec<Line> {
    text.split('\n').map(render_line).collect()
}

fn render_line(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    match trimmed.strip_prefix(BULLET) {
        Some(item) => Line::ListItem(parse_inline(item)),
        None => Line::Paragraph(parse_inline(line)),
    }
}

fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last {
            spans.push(Span::Text(text[last..whole.start()].to_string()));
        }

        let span = if let Some(m) = caps.name("strong") {
            Span::Strong(m.as_str().to_string())
        } else if let Some(m) = caps.name("code") {
            Span::Code(m.as_str().to_string())
        } else if let Some(m) = caps.name("em") {
            Span::Emphasis(m.as_str().to_string())
        } else {
            Span::Text(whole.as_str().to_string())
        };
        spans.push(span);
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }

    spans
}
