//! Best-effort extraction of a JSON object from free text.
//!
//! Oracles are told to answer with raw JSON but regularly wrap it in markdown
//! fences or surround it with prose. Extraction tries, in order:
//!
//! ```text
//! 1. normalized reply (trimmed, fence markers removed) parsed as a whole
//! 2. each fenced block of the raw reply
//! 3. each balanced {...} span of the raw reply, one scan per `{`
//!    (string/escape aware)
//! 4. give up
//! ```
//!
//! Only JSON objects count as a hit; a bare number or string keeps the search
//! going.

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Outcome of [`extract_json`], tagged with the stage that succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Direct(Map<String, Value>),
    Fenced(Map<String, Value>),
    Braced(Map<String, Value>),
    NotFound,
}

impl Extraction {
    pub fn object(&self) -> Option<&Map<String, Value>> {
        match self {
            Extraction::Direct(o) | Extraction::Fenced(o) | Extraction::Braced(o) => Some(o),
            Extraction::NotFound => None,
        }
    }

    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self {
            Extraction::Direct(o) | Extraction::Fenced(o) | Extraction::Braced(o) => Some(o),
            Extraction::NotFound => None,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Extraction::Direct(_) => "direct",
            Extraction::Fenced(_) => "fenced",
            Extraction::Braced(_) => "braced",
            Extraction::NotFound => "not_found",
        }
    }
}

pub fn extract_json(reply: &str) -> Extraction {
    if let Some(obj) = parse_object(&normalize(reply)) {
        return Extraction::Direct(obj);
    }
    if let Some(obj) = fenced_blocks(reply).into_iter().find_map(parse_object) {
        return Extraction::Fenced(obj);
    }
    if let Some(obj) = brace_spans(reply).find_map(parse_object) {
        return Extraction::Braced(obj);
    }
    Extraction::NotFound
}

/// Trim the reply and drop markdown fence markers (with or without a `json` tag).
pub fn normalize(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```JSON", "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Bodies of every closed ```` ``` ```` block, info string removed.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };
        let block = &after_open[..close];
        // Drop an info string such as `json` on the opening line.
        let body = match block.split_once('\n') {
            Some((info, body)) if !info.trim_start().starts_with('{') => body,
            _ => block,
        };
        blocks.push(body);
        rest = &after_open[close + FENCE.len()..];
    }

    blocks
}

/// Every balanced `{...}` span, ordered by its opening brace.
///
/// Each `{` starts its own scan, so an unmatched brace in the surrounding
/// prose does not swallow an object that follows it.
fn brace_spans(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|&(_, ch)| ch == '{')
        .filter_map(move |(start, _)| balanced_prefix(&text[start..]))
}

/// Shortest prefix of `text` (which opens with `{`) whose braces balance.
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
