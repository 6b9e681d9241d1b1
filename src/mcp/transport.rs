//! stdio transport for MCP
//!
//! Messages are newline-delimited JSON-RPC. stdout carries nothing but
//! responses; diagnostics go through `tracing` to stderr.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Returns `Err` only when the channel itself fails. Every non-blank line gets
/// a response, except notifications.
pub async fn serve<R, W>(mut reader: R, mut writer: W, state: AppState) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!("Received: {}", line);
                dispatch_line(line, &state).await
            }
            Err(e) => {
                error!("Received a line that is not valid UTF-8: {}", e);
                Some(parse_error(e))
            }
        };

        if let Some(response) = response {
            let mut response_json = serde_json::to_string(&response)?;
            debug!("Sending: {}", response_json);
            response_json.push('\n');
            writer.write_all(response_json.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    info!("EOF received, shutting down MCP server");
    Ok(())
}

fn parse_error(e: impl std::fmt::Display) -> Response {
    Response::error(
        Value::Null,
        error_codes::PARSE_ERROR,
        format!("Parse error: {}", e),
    )
}

/// Decode one line and hand it to the dispatcher. Malformed JSON is a parse
/// error; well-formed JSON that is not a request is an invalid request.
async fn dispatch_line(line: &str, state: &AppState) -> Option<Response> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            error!("JSON parse error: {}", e);
            return Some(parse_error(e));
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<Request>(value) {
        Ok(request) => handle_mcp_request(request, state.clone()).await,
        Err(e) => {
            error!("Invalid JSON-RPC request: {}", e);
            Some(Response::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid Request: {}", e),
            ))
        }
    }
}

/// Serve on the process's own stdin/stdout.
pub async fn serve_stdio(state: AppState) -> std::io::Result<()> {
    info!("Starting MCP server on stdin/stdout");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(stdin, tokio::io::stdout(), state).await
}
