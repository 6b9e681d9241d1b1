use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;
use tracing::info;

use crate::{api::report_response, mcp::tools::ToolKind, AppState};

/// Handler for the GET /tx/{txid} endpoint.
pub async fn get_transaction_handler(
    Path(txid): Path<String>,
    State(state): State<AppState>,
) -> Response {
    info!("Received request for transaction '{}'", txid);
    report_response(&state, ToolKind::Transaction, json!({ "txid": txid })).await
}
