// src/lib.rs

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod setup;
pub mod utils;

use blockchain::client::{MempoolClient, UpstreamError};

/// Application state shared across all request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Client for the block explorer API
    pub client: MempoolClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self, UpstreamError> {
        let client = MempoolClient::new(&config.api_base, &config.user_agent)?;
        Ok(Self { config, client })
    }
}
