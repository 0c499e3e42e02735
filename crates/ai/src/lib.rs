//! `stockline-ai`
//!
//! **Responsibility:** turn free text into a structured stock intent using a
//! hosted LLM (the *oracle*) as an opaque text-in/text-out function.
//!
//! This crate never touches the stock ledger:
//! - `oracle`/`http`: the external dependency and its OpenAI-compatible client.
//! - `prompt`: the fixed instruction prompt.
//! - `extract`: best-effort JSON extraction from a free-text reply.
//! - `intent`: classification of the extracted payload.
//! - `translator`: the whole text → intent pipeline.

pub mod extract;
pub mod http;
pub mod intent;
pub mod oracle;
pub mod prompt;
pub mod translator;

pub use extract::{Extraction, extract_json};
pub use http::{HttpOracle, HttpOracleConfig};
pub use intent::{ParsedIntent, classify};
pub use oracle::{Oracle, OracleError, OracleRequest, StaticOracle};
pub use translator::{IntentTranslator, TranslatorConfig};
