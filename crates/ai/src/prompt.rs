//! Instruction prompt sent to the oracle with every query.

use std::fmt::Write;

use stockline_core::Item;

/// Verbs that mean stock came in.
pub const ACQUISITION_VERBS: &[&str] = &["bought", "restocked", "added", "received", "borrowed"];

/// Verbs that mean stock went out.
pub const DISPOSAL_VERBS: &[&str] = &["sold", "used", "gave away", "removed", "donated"];

/// Build the fixed system prompt.
///
/// The prompt only depends on the closed vocabulary, so it is identical for
/// every request.
pub fn system_prompt() -> String {
    let items = Item::ALL
        .iter()
        .map(|i| format!("\"{}\"", i.as_str()))
        .collect::<Vec<_>>()
        .join(" and ");
    let example_item = Item::ALL[0].as_str();

    let mut p = String::new();
    p.push_str("You are an inventory control assistant. You support exactly two operations:\n");
    p.push_str("1. Checking current stock (GET)\n");
    let _ = writeln!(p, "2. Changing the stock of one item (POST)\n");

    p.push_str("Reply with one of these JSON objects:\n");
    p.push_str("{\"method\": \"GET\"}\n");
    let _ = writeln!(
        p,
        "{{\"method\": \"POST\", \"json\": {{\"item\": \"{example_item}\", \"change\": -3}}}}\n"
    );

    let _ = writeln!(p, "The only valid items are {items}. Never use any other item.\n");

    p.push_str("Infer the sign of \"change\" from the verb:\n");
    let _ = writeln!(
        p,
        "- {} (and their synonyms) INCREASE the count (positive change).",
        quoted(ACQUISITION_VERBS)
    );
    let _ = writeln!(
        p,
        "- {} (and their synonyms) DECREASE the count (negative change).\n",
        quoted(DISPOSAL_VERBS)
    );

    p.push_str("If the request is unclear, missing, or mentions anything else, reply with:\n");
    let _ = writeln!(
        p,
        "{{\"method\": \"ERROR\", \"message\": \"{}\"}}\n",
        crate::intent::DEFAULT_ERROR_MESSAGE
    );

    p.push_str("Example:\n");
    let _ = writeln!(p, "Input: \"I borrowed 3 {example_item}\"");
    let _ = writeln!(
        p,
        "Output: {{\"method\": \"POST\", \"json\": {{\"item\": \"{example_item}\", \"change\": 3}}}}\n"
    );

    p.push_str("Respond ONLY with raw JSON. No markdown. No explanations.\n");
    p
}

fn quoted(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| format!("\"{w}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
