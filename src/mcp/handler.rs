//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the Bitcoin
//! server. It handles incoming MCP requests and dispatches them to the tools.
//!
//! ## Supported Tools
//!
//! - `get-address-stats` - Chain and mempool counters for an address
//! - `get-address-transactions` - Recent transaction history for an address
//! - `get-address-utxos` - Unspent outputs held by an address
//! - `get-transaction` - Inputs, outputs and status of one transaction
//! - `get-block` - Header fields and fee statistics of a block
//!
//! Each tool also answers to its name without the `get-` prefix.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    mcp::{
        protocol::{error_codes, error_text_result, text_result, Request, Response},
        tools::{self, ToolCall, ToolKind},
    },
    AppState,
};

pub const SERVER_NAME: &str = "bitcoin-mcp";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        debug!("Ignoring notification: {}", req.method);
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method calls are rewritten into tools/call to reuse the same logic
        method if ToolKind::from_name(method).is_some() => {
            let name = req.method.clone();
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
///
/// Only malformed calls (unknown tool, bad arguments) become JSON-RPC errors.
/// Upstream failures come back as an error text block inside a successful
/// response.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let kind = match ToolKind::from_name(tool_name) {
        Some(kind) => kind,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", tool_name),
            )
        }
    };

    let call = match ToolCall::parse(kind, params.get("arguments")) {
        Ok(call) => call,
        Err(e) => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                format!("Invalid arguments for tool '{}': {}", kind.name(), e),
            )
        }
    };

    let result = match call.execute(&state.client).await {
        Ok(report) => text_result(report),
        Err(message) => error_text_result(message),
    };
    Response::success(req.id, result)
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let protocol_version = req
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    let server_info = json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Read-only Bitcoin blockchain queries (addresses, transactions, blocks) backed by mempool.space.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": protocol_version,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    Response::success(req.id.clone(), json!({ "tools": tools::list_tools() }))
}
