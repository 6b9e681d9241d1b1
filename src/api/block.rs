use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;
use tracing::info;

use crate::{api::report_response, mcp::tools::ToolKind, AppState};

/// Handler for the GET /block/{height} endpoint.
pub async fn get_block_handler(Path(height): Path<u64>, State(state): State<AppState>) -> Response {
    info!("Received request for block {}", height);
    report_response(&state, ToolKind::Block, json!({ "block_height": height })).await
}
