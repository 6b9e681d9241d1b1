//! # API Module
//!
//! HTTP bridge for the Bitcoin MCP server. It exposes the same JSON-RPC
//! dispatcher as the stdio transport, plus plain-text report routes.
//!
//! ## Available Endpoints
//!
//! - `GET /api/health` - Liveness probe
//! - `POST /api/rpc` - JSON-RPC MCP requests
//! - `GET /api/address/:address` - Address statistics report
//! - `GET /api/address/:address/txs?limit=` - Transaction history report
//! - `GET /api/address/:address/utxo?limit=` - UTXO report
//! - `GET /api/tx/:txid` - Transaction report
//! - `GET /api/block/:height` - Block report

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    mcp::tools::{ToolCall, ToolKind},
    AppState,
};

pub mod address;
pub mod block;
pub mod health;
pub mod rpc;
pub mod tx;

/// Create the router with every route nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/rpc", post(rpc::rpc_handler))
        .route("/address/:address", get(address::get_address_stats_handler))
        .route(
            "/address/:address/txs",
            get(address::get_address_transactions_handler),
        )
        .route(
            "/address/:address/utxo",
            get(address::get_address_utxos_handler),
        )
        .route("/tx/:txid", get(tx::get_transaction_handler))
        .route("/block/:height", get(block::get_block_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Serve the router on the loopback interface until the process exits.
pub async fn serve_http(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")
}

/// Validate `args` against the tool schema, run it, and map the outcome to
/// a plain-text response: 400 for bad arguments, 502 for upstream failures.
pub(crate) async fn report_response(state: &AppState, kind: ToolKind, args: Value) -> Response {
    let call = match ToolCall::parse(kind, Some(&args)) {
        Ok(call) => call,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid arguments for tool '{}': {}", kind.name(), e),
            )
                .into_response()
        }
    };

    match call.execute(&state.client).await {
        Ok(report) => (StatusCode::OK, report).into_response(),
        Err(message) => {
            error!("{}", message);
            (StatusCode::BAD_GATEWAY, message).into_response()
        }
    }
}
