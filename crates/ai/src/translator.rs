//! Free text to [`ParsedIntent`] through one oracle call.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::extract::extract_json;
use crate::intent::ParsedIntent;
use crate::oracle::{Oracle, OracleError, OracleRequest};
use crate::prompt::system_prompt;

const MAX_LOG_CHARS: usize = 2_000;

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub model: String,
    pub temperature: f32,
    /// Upper bound on one oracle call, whatever the oracle implementation.
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Free text → [`ParsedIntent`], using an oracle for interpretation.
///
/// Only oracle failures are errors; a reply that cannot be understood is an
/// [`ParsedIntent::Unrecognized`] value.
pub struct IntentTranslator<O: Oracle> {
    oracle: O,
    config: TranslatorConfig,
    system_prompt: String,
}

impl<O: Oracle> IntentTranslator<O> {
    pub fn new(oracle: O, config: TranslatorConfig) -> Self {
        Self {
            oracle,
            config,
            system_prompt: system_prompt(),
        }
    }

    pub async fn translate(&self, user_query: &str) -> Result<ParsedIntent, OracleError> {
        let request = OracleRequest {
            system: self.system_prompt.clone(),
            user: user_query.to_string(),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
        };

        info!(
            model = %self.config.model,
            query_len = user_query.len(),
            "oracle request prepared"
        );

        let reply = tokio::time::timeout(self.config.timeout, self.oracle.complete(request))
            .await
            .map_err(|_| OracleError::Timeout(self.config.timeout.as_millis()))??;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(reply = %truncate_for_log(&reply, MAX_LOG_CHARS), "oracle raw reply");
        }

        let extraction = extract_json(&reply);
        let stage = extraction.stage();
        let intent = ParsedIntent::from(extraction);

        match &intent {
            ParsedIntent::Unrecognized(reason) => {
                warn!(stage, reason = %reason, "oracle reply not actionable")
            }
            _ => info!(stage, intent = intent.kind(), "oracle reply classified"),
        }

        Ok(intent)
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={char_count}]"));
    preview
}
