// src/mcp/tools.rs
//! Tool registry for the Bitcoin MCP server.
//!
//! Each tool pairs one upstream fetch with one formatter. Argument checking is
//! declarative (serde + validator) and happens before any network call; the
//! fetch/format pair always goes through [`invoke`], which turns upstream
//! failures into the `Error fetching <resource>: <message>` text.

use std::future::Future;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use validator::Validate;

use crate::{
    blockchain::{
        client::{MempoolClient, UpstreamError},
        format,
    },
    utils::{self, ArgsError},
};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

// --- Tool Arguments ---

#[derive(Debug, Deserialize, Validate)]
pub struct AddressArgs {
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddressListArgs {
    pub address: String,
    #[serde(default = "default_limit", deserialize_with = "utils::integral")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransactionArgs {
    pub txid: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlockArgs {
    #[serde(deserialize_with = "utils::integral")]
    pub block_height: u64,
}

// --- Tool Registry ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    AddressStats,
    AddressTransactions,
    AddressUtxos,
    Transaction,
    Block,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::AddressStats,
        ToolKind::AddressTransactions,
        ToolKind::AddressUtxos,
        ToolKind::Transaction,
        ToolKind::Block,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::AddressStats => "get-address-stats",
            ToolKind::AddressTransactions => "get-address-transactions",
            ToolKind::AddressUtxos => "get-address-utxos",
            ToolKind::Transaction => "get-transaction",
            ToolKind::Block => "get-block",
        }
    }

    /// Short name accepted in place of [`ToolKind::name`].
    pub fn alias(self) -> &'static str {
        &self.name()["get-".len()..]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.alias() == name)
    }

    /// Noun used in the error text when the upstream call fails.
    pub fn resource(self) -> &'static str {
        match self {
            ToolKind::AddressStats => "address stats",
            ToolKind::AddressTransactions => "address transactions",
            ToolKind::AddressUtxos => "address UTXOs",
            ToolKind::Transaction => "transaction data",
            ToolKind::Block => "block data",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::AddressStats => "Get basic statistics for a Bitcoin address",
            ToolKind::AddressTransactions => "Get transaction history for a Bitcoin address",
            ToolKind::AddressUtxos => {
                "Get current UTXOs (unspent transaction outputs) for a Bitcoin address"
            }
            ToolKind::Transaction => "Get detailed information about a Bitcoin transaction",
            ToolKind::Block => "Get information about a Bitcoin block",
        }
    }

    pub fn input_schema(self) -> Value {
        let address = json!({"type": "string", "description": "Bitcoin address to query"});
        match self {
            ToolKind::AddressStats => json!({
                "type": "object",
                "properties": { "address": address },
                "required": ["address"]
            }),
            ToolKind::AddressTransactions | ToolKind::AddressUtxos => {
                let what = if self == ToolKind::AddressUtxos {
                    "UTXOs"
                } else {
                    "transactions"
                };
                json!({
                    "type": "object",
                    "properties": {
                        "address": address,
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_LIMIT,
                            "default": DEFAULT_LIMIT,
                            "description": format!("Number of {} to return (max {})", what, MAX_LIMIT)
                        }
                    },
                    "required": ["address"]
                })
            }
            ToolKind::Transaction => json!({
                "type": "object",
                "properties": {
                    "txid": {"type": "string", "description": "Transaction ID (hash) to query"}
                },
                "required": ["txid"]
            }),
            ToolKind::Block => json!({
                "type": "object",
                "properties": {
                    "block_height": {"type": "integer", "minimum": 0, "description": "Block height to query"}
                },
                "required": ["block_height"]
            }),
        }
    }

    pub fn definition(self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

/// Definitions for `tools/list`.
pub fn list_tools() -> Vec<Value> {
    ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
}

// --- Tool Invocation ---

/// A tool call whose arguments already passed schema validation.
#[derive(Debug)]
pub enum ToolCall {
    AddressStats(AddressArgs),
    AddressTransactions(AddressListArgs),
    AddressUtxos(AddressListArgs),
    Transaction(TransactionArgs),
    Block(BlockArgs),
}

impl ToolCall {
    pub fn parse(kind: ToolKind, args: Option<&Value>) -> Result<Self, ArgsError> {
        Ok(match kind {
            ToolKind::AddressStats => ToolCall::AddressStats(utils::parse_args(args)?),
            ToolKind::AddressTransactions => {
                ToolCall::AddressTransactions(utils::parse_args(args)?)
            }
            ToolKind::AddressUtxos => ToolCall::AddressUtxos(utils::parse_args(args)?),
            ToolKind::Transaction => ToolCall::Transaction(utils::parse_args(args)?),
            ToolKind::Block => ToolCall::Block(utils::parse_args(args)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::AddressStats(_) => ToolKind::AddressStats,
            ToolCall::AddressTransactions(_) => ToolKind::AddressTransactions,
            ToolCall::AddressUtxos(_) => ToolKind::AddressUtxos,
            ToolCall::Transaction(_) => ToolKind::Transaction,
            ToolCall::Block(_) => ToolKind::Block,
        }
    }

    /// Fetch and render. `Err` carries the user-facing error text.
    pub async fn execute(&self, client: &MempoolClient) -> Result<String, String> {
        let resource = self.kind().resource();
        match self {
            ToolCall::AddressStats(args) => {
                invoke(resource, client.get_address_stats(&args.address), |stats| {
                    format::format_address_stats(&stats)
                })
                .await
            }
            ToolCall::AddressTransactions(args) => {
                invoke(
                    resource,
                    client.get_address_transactions(&args.address),
                    |txs| format::format_address_transactions(&args.address, &txs, args.limit as usize),
                )
                .await
            }
            ToolCall::AddressUtxos(args) => {
                invoke(resource, client.get_address_utxos(&args.address), |utxos| {
                    format::format_address_utxos(&args.address, &utxos, args.limit as usize)
                })
                .await
            }
            ToolCall::Transaction(args) => {
                invoke(resource, client.get_transaction(&args.txid), |tx| {
                    format::format_transaction(&tx)
                })
                .await
            }
            ToolCall::Block(args) => {
                invoke(resource, client.get_block(args.block_height), |block| {
                    format::format_block(args.block_height, &block)
                })
                .await
            }
        }
    }
}

/// Await `fetch`, render its payload, and fold any upstream failure into
/// `Error fetching <resource>: <message>`.
pub async fn invoke<T, Fut, Render>(resource: &str, fetch: Fut, render: Render) -> Result<String, String>
where
    Fut: Future<Output = Result<T, UpstreamError>>,
    Render: FnOnce(T) -> String,
{
    match fetch.await {
        Ok(payload) => {
            debug!("Fetched {}", resource);
            Ok(render(payload))
        }
        Err(e) => {
            warn!("Error fetching {}: {}", resource, e);
            Err(format!("Error fetching {}: {}", resource, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_aliases_resolve() {
        assert_eq!(ToolKind::from_name("get-block"), Some(ToolKind::Block));
        assert_eq!(ToolKind::from_name("block"), Some(ToolKind::Block));
        assert_eq!(
            ToolKind::from_name("address-utxos"),
            Some(ToolKind::AddressUtxos)
        );
        assert_eq!(ToolKind::from_name("get_block"), None);
    }

    #[test]
    fn test_list_tools_has_five_unique_names() {
        let tools = list_tools();
        assert_eq!(tools.len(), 5);
        let mut names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn test_limit_defaults_to_ten() {
        let args = json!({ "address": "bc1qexample" });
        match ToolCall::parse(ToolKind::AddressTransactions, Some(&args)).unwrap() {
            ToolCall::AddressTransactions(a) => assert_eq!(a.limit, 10),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_limit_bounds() {
        for limit in [0, 51] {
            let args = json!({ "address": "bc1qexample", "limit": limit });
            let err = ToolCall::parse(ToolKind::AddressUtxos, Some(&args)).unwrap_err();
            assert!(matches!(err, ArgsError::Constraint(_)));
        }
        for limit in [1, 50] {
            let args = json!({ "address": "bc1qexample", "limit": limit });
            assert!(ToolCall::parse(ToolKind::AddressUtxos, Some(&args)).is_ok());
        }
    }

    #[test]
    fn test_whole_float_limit_is_accepted() {
        let args = json!({ "address": "bc1qexample", "limit": 25.0 });
        match ToolCall::parse(ToolKind::AddressUtxos, Some(&args)).unwrap() {
            ToolCall::AddressUtxos(a) => assert_eq!(a.limit, 25),
            other => panic!("unexpected call {:?}", other),
        }
        let args = json!({ "address": "bc1qexample", "limit": 2.5 });
        assert!(ToolCall::parse(ToolKind::AddressUtxos, Some(&args)).is_err());
    }

    #[test]
    fn test_block_height_must_be_non_negative_integer() {
        for bad in [json!({ "block_height": -1 }), json!({ "block_height": "tip" }), json!({ "block_height": 1.5 }), json!({})] {
            assert!(ToolCall::parse(ToolKind::Block, Some(&bad)).is_err());
        }
        let ok = json!({ "block_height": 0 });
        assert!(ToolCall::parse(ToolKind::Block, Some(&ok)).is_ok());
    }

    #[tokio::test]
    async fn test_invoke_wraps_upstream_failure() {
        let failing = async {
            Err::<u64, _>(UpstreamError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                body: "Block not found".into(),
            })
        };
        let text = invoke("block data", failing, |n| n.to_string())
            .await
            .unwrap_err();
        assert_eq!(
            text,
            "Error fetching block data: upstream returned 404 Not Found: Block not found"
        );

        let ok = invoke("block data", async { Ok::<u64, UpstreamError>(7) }, |n| n.to_string()).await;
        assert_eq!(ok, Ok("7".to_string()));
    }
}
