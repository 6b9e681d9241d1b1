use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::{api::report_response, mcp::tools::ToolKind, AppState};

/// Query parameters for the listing endpoints.
/// The limit stays optional here; the tool schema applies the default.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

fn list_args(address: String, query: ListQuery) -> Value {
    let mut args = Map::new();
    args.insert("address".into(), Value::String(address));
    if let Some(limit) = query.limit {
        args.insert("limit".into(), json!(limit));
    }
    Value::Object(args)
}

/// Handler for the GET /address/{address} endpoint.
pub async fn get_address_stats_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Response {
    info!("Received request for address stats of '{}'", address);
    report_response(&state, ToolKind::AddressStats, json!({ "address": address })).await
}

/// Handler for the GET /address/{address}/txs endpoint.
pub async fn get_address_transactions_handler(
    Path(address): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Response {
    info!("Received request for transaction history of '{}'", address);
    report_response(&state, ToolKind::AddressTransactions, list_args(address, query)).await
}

/// Handler for the GET /address/{address}/utxo endpoint.
pub async fn get_address_utxos_handler(
    Path(address): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Response {
    info!("Received request for UTXOs of '{}'", address);
    report_response(&state, ToolKind::AddressUtxos, list_args(address, query)).await
}
