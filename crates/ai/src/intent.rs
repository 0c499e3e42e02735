//! Classification of an extracted oracle payload into a stock intent.

use serde_json::{Map, Value};

use stockline_core::ChangeRequest;

use crate::extract::Extraction;

pub const DEFAULT_ERROR_MESSAGE: &str =
    "Could not understand the query. Please mention tshirts or pants clearly.";

pub const UNPARSEABLE_MESSAGE: &str =
    "Could not parse model response. Please try a clearer query like 'I added 5 tshirts'.";

pub const UNKNOWN_METHOD_MESSAGE: &str =
    "Model response did not contain a valid operation. Please try again.";

pub const MALFORMED_UPDATE_MESSAGE: &str =
    "Could not understand the update: the model did not name an item and a whole-number change.";

/// What the caller asked for, as understood by the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIntent {
    /// Report current stock.
    Read,
    /// Adjust one item. The item is not yet checked against the vocabulary.
    Write(ChangeRequest),
    /// Nothing actionable; the reason is client-facing.
    Unrecognized(String),
}

impl ParsedIntent {
    pub fn unrecognized(reason: impl Into<String>) -> Self {
        Self::Unrecognized(reason.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParsedIntent::Read => "read",
            ParsedIntent::Write(_) => "write",
            ParsedIntent::Unrecognized(_) => "unrecognized",
        }
    }
}

impl From<Extraction> for ParsedIntent {
    fn from(extraction: Extraction) -> Self {
        match extraction.into_object() {
            Some(payload) => classify(&payload),
            None => ParsedIntent::unrecognized(UNPARSEABLE_MESSAGE),
        }
    }
}

/// Classify a payload by its `method` tag (`GET`, `POST`, `ERROR`).
pub fn classify(payload: &Map<String, Value>) -> ParsedIntent {
    let method = payload
        .get("method")
        .and_then(Value::as_str)
        .map(|m| m.trim().to_ascii_uppercase());

    match method.as_deref() {
        Some("GET") => ParsedIntent::Read,
        Some("POST") => classify_write(payload),
        Some("ERROR") => {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_ERROR_MESSAGE);
            ParsedIntent::unrecognized(message)
        }
        _ => ParsedIntent::unrecognized(UNKNOWN_METHOD_MESSAGE),
    }
}

fn classify_write(payload: &Map<String, Value>) -> ParsedIntent {
    // The nested `json` object is the documented shape; a flat payload is tolerated.
    let body = payload
        .get("json")
        .and_then(Value::as_object)
        .unwrap_or(payload);

    let item = body
        .get("item")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|i| !i.is_empty());
    let change = body.get("change").and_then(as_whole_number);

    match (item, change) {
        (Some(item), Some(change)) => ParsedIntent::Write(ChangeRequest::new(item, change)),
        _ => ParsedIntent::unrecognized(MALFORMED_UPDATE_MESSAGE),
    }
}

/// Integers, integer-valued floats, and integer strings (`"+3"`, `"-2"`).
fn as_whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
