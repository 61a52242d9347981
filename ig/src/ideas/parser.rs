//! Completion text parsing
//!
//! Models are asked for one idea per line but routinely add numbering,
//! bullets, markdown headers or wrap everything in a JSON array. The parser
//! accepts all of these and never fails: unusable text yields no ideas.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::list::Idea;

/// Leading list marker: bullets ("- ", "* ", "•") or numbering ("1.", "2)", "(3)")
///
/// ASCII bullets need trailing whitespace so "-5 degree" and "*emphasis*" are left alone.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*+](?:\s+|$)|[•·▪–—]+\s*|\(?\d{1,3}[.):]\s*)").expect("valid list marker regex")
});

/// Markdown ATX header: 1-6 '#' then whitespace or end of line ("#1 tip" is not one)
static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}(?:\s|$)").expect("valid header regex"));

/// Horizontal rules and setext underlines
static RULE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*_=\s]{3,}$").expect("valid rule regex"));

/// Parse raw completion text into ideas, in the order they appear
pub fn parse_ideas(raw: &str) -> Vec<Idea> {
    debug!(raw_len = raw.len(), "parse_ideas: called");
    let text = raw.trim();
    if text.is_empty() {
        debug!("parse_ideas: empty response");
        return Vec::new();
    }

    let ideas: Vec<Idea> = match extract_json_array(text) {
        Some(items) => {
            debug!(item_count = items.len(), "parse_ideas: using JSON array");
            items.iter().filter_map(|item| clean_line(item)).collect()
        }
        None => text.lines().filter_map(clean_line).collect(),
    };

    debug!(idea_count = ideas.len(), "parse_ideas: parsed");
    ideas
}

/// Pull a JSON array of strings out of the text, if there is one
///
/// Looks at the span from the first '[' to the last ']'. Arrays containing
/// anything other than strings are ignored.
fn extract_json_array(text: &str) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&text[start..=end]).ok()?;
    values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Clean one candidate line into an idea, or drop it
fn clean_line(line: &str) -> Option<Idea> {
    let line = line.trim();
    if is_formatting_artifact(line) {
        return None;
    }

    let mut text = line.replace("**", "").trim().to_string();

    loop {
        let stripped = strip_wrapping_quotes(strip_emphasis(strip_marker(&text))).into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    Idea::new(text)
}

fn is_formatting_artifact(line: &str) -> bool {
    HEADER_LINE.is_match(line)
        || line.starts_with("```")
        || RULE_LINE.is_match(line)
        || line.chars().all(|c| matches!(c, '[' | ']' | ',' | '{' | '}') || c.is_whitespace())
}

fn strip_marker(text: &str) -> &str {
    let Some(m) = LIST_MARKER.find(text) else {
        return text;
    };

    // "3.5 ways" and "10:30 routines" start with a number, not a marker
    let rest = &text[m.end()..];
    if m.as_str().ends_with(['.', ':']) && rest.starts_with(|c: char| c.is_ascii_digit()) {
        return text;
    }

    rest.trim_start()
}

/// Remove a balanced single-'*' emphasis pair around the whole text
fn strip_emphasis(text: &str) -> &str {
    match text.strip_prefix('*').and_then(|t| t.strip_suffix('*')) {
        Some(inner) if !inner.is_empty() && !inner.starts_with(char::is_whitespace) => inner.trim(),
        _ => text,
    }
}

/// Remove a trailing comma and one pair of quotes that wrap the whole text
///
/// `"Why" is the new "How"` keeps its quotes. A wrapped JSON string literal
/// with escaped quotes is decoded.
fn strip_wrapping_quotes(text: &str) -> Cow<'_, str> {
    let text = text.strip_suffix(',').unwrap_or(text).trim();
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        if !inner.contains('"') {
            return Cow::Borrowed(inner.trim());
        }
        if let Ok(decoded) = serde_json::from_str::<String>(text) {
            return Cow::Owned(decoded.trim().to_string());
        }
    }
    Cow::Borrowed(text)
}
