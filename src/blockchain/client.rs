//! Blockchain client module for the mempool.space (Esplora) REST API.
//!
//! Each method performs exactly one GET against `{base_url}{path}` and decodes
//! the body into the typed models. There is no retry, caching or client-side
//! validation of addresses and txids; the upstream rejects bad input itself.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::blockchain::models::{AddressStats, Block, Transaction, Utxo};

/// Anything that went wrong talking to the block explorer.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}{}", detail(.body))]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Thin async client for the block explorer API.
#[derive(Clone, Debug)]
pub struct MempoolClient {
    http: Client,
    base_url: String,
}

impl MempoolClient {
    /// Create a client that tags every request with the given `User-Agent`.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, UpstreamError> {
        let http = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /address/:address`
    pub async fn get_address_stats(&self, address: &str) -> Result<AddressStats, UpstreamError> {
        self.get_json(&format!("/address/{}", address)).await
    }

    /// `GET /address/:address/txs`
    pub async fn get_address_transactions(
        &self,
        address: &str,
    ) -> Result<Vec<Transaction>, UpstreamError> {
        self.get_json(&format!("/address/{}/txs", address)).await
    }

    /// `GET /address/:address/utxo`
    pub async fn get_address_utxos(&self, address: &str) -> Result<Vec<Utxo>, UpstreamError> {
        self.get_json(&format!("/address/{}/utxo", address)).await
    }

    /// `GET /tx/:txid`
    pub async fn get_transaction(&self, txid: &str) -> Result<Transaction, UpstreamError> {
        self.get_json(&format!("/tx/{}", txid)).await
    }

    /// `GET /block/:height`
    pub async fn get_block(&self, height: u64) -> Result<Block, UpstreamError> {
        self.get_json(&format!("/block/{}", height)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: body.trim().to_string(),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MempoolClient::new("https://mempool.space/api/", "bitcoin-mcp/1.0").unwrap();
        assert_eq!(client.base_url(), "https://mempool.space/api");
    }

    #[test]
    fn test_status_error_message_includes_upstream_body() {
        let err = UpstreamError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "Invalid Bitcoin address".into(),
        };
        assert_eq!(
            err.to_string(),
            "upstream returned 400 Bad Request: Invalid Bitcoin address"
        );

        let err = UpstreamError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "upstream returned 404 Not Found");
    }
}
