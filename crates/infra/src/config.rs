//! Configuration loading and representation.
//!
//! Both services read environment variables. Parsing goes through a lookup
//! closure so it can be exercised without touching the process environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use stockline_inventory::StockSeed;

pub const DEFAULT_INVENTORY_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_CONTROL_PLANE_BIND: &str = "0.0.0.0:8001";
pub const DEFAULT_INVENTORY_API_URL: &str = "http://localhost:8000/inventory";
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_ORACLE_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}` ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Settings of the inventory (stock ledger) service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryServiceConfig {
    pub bind: SocketAddr,
    pub seed: StockSeed,
}

impl InventoryServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = parse_addr(&lookup, "INVENTORY_BIND", DEFAULT_INVENTORY_BIND)?;
        let seed = match non_empty(&lookup, "INVENTORY_SEED") {
            Some(raw) => {
                StockSeed::parse(&raw).map_err(|e| ConfigError::invalid("INVENTORY_SEED", &raw, e))?
            }
            None => StockSeed::default(),
        };
        Ok(Self { bind, seed })
    }
}

/// How to reach the hosted LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Settings of the control-plane (natural-language query) service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPlaneConfig {
    pub bind: SocketAddr,
    pub inventory_url: String,
    pub ledger_timeout: Duration,
    pub oracle: OracleSettings,
}

impl ControlPlaneConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = parse_addr(&lookup, "CONTROL_PLANE_BIND", DEFAULT_CONTROL_PLANE_BIND)?;
        let inventory_url = non_empty(&lookup, "INVENTORY_API_URL")
            .unwrap_or_else(|| DEFAULT_INVENTORY_API_URL.to_string());
        let ledger_timeout = parse_secs(&lookup, "LEDGER_TIMEOUT_SECS", 10)?;

        let oracle = OracleSettings {
            endpoint: non_empty(&lookup, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ORACLE_ENDPOINT.to_string()),
            api_key: non_empty(&lookup, "OPENAI_API_KEY"),
            model: non_empty(&lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_ORACLE_MODEL.to_string()),
            timeout: parse_secs(&lookup, "ORACLE_TIMEOUT_SECS", 30)?,
        };

        Ok(Self {
            bind,
            inventory_url,
            ledger_timeout,
            oracle,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_addr(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<SocketAddr, ConfigError> {
    let raw = non_empty(lookup, key).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e| ConfigError::invalid(key, &raw, e))
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = non_empty(lookup, key) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(key, &raw, "must be at least 1 second")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::invalid(key, &raw, e)),
    }
}
