// src/config.rs

use std::env;

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://mempool.space/api";
pub const DEFAULT_USER_AGENT: &str = "bitcoin-mcp/1.0";
pub const DEFAULT_PORT: u16 = 8080;

// A struct to hold all configuration, loaded once at startup from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Esplora-compatible API, without a trailing slash
    pub api_base: String,
    /// Sent as the `User-Agent` header on every upstream request
    pub user_agent: String,
    /// Loopback port for the HTTP bridge
    pub port: u16,
    /// Forces stdio mode even when the HTTP bridge was requested
    pub mcp_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            port: DEFAULT_PORT,
            mcp_mode: false,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, applying defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("MEMPOOL_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let parsed = Url::parse(&api_base)
            .with_context(|| format!("MEMPOOL_API_BASE is not a valid URL: {}", api_base))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("MEMPOOL_API_BASE must use http or https, got '{}'", parsed.scheme());
        }

        let port = match lookup("PORT") {
            Some(p) => p.parse().context("PORT must be a valid number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            user_agent: lookup("MEMPOOL_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            port,
            mcp_mode: lookup("MCP_MODE").is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MEMPOOL_API_BASE", "http://localhost:3002/api/"),
            ("MEMPOOL_USER_AGENT", "tester/0.1"),
            ("PORT", "9000"),
            ("MCP_MODE", "1"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:3002/api");
        assert_eq!(config.user_agent, "tester/0.1");
        assert_eq!(config.port, 9000);
        assert!(config.mcp_mode);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("MEMPOOL_API_BASE", "not a url")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MEMPOOL_API_BASE", "ftp://example.com")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    }
}
