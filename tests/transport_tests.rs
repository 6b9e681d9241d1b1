//! Newline-delimited JSON-RPC over an in-memory stdio channel

use serde_json::{json, Value};
use tokio::io::BufReader;

use bitcoin_mcp_server::{config::Config, mcp::transport, AppState};

fn unreachable_state() -> AppState {
    let config = Config {
        api_base: "http://127.0.0.1:1".to_string(),
        ..Config::default()
    };
    AppState::new(config).unwrap()
}

async fn run(input: &str) -> Vec<Value> {
    run_bytes(input.as_bytes()).await
}

async fn run_bytes(input: &[u8]) -> Vec<Value> {
    let mut output = Vec::new();
    transport::serve(BufReader::new(input), &mut output, unreachable_state())
        .await
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_each_request_gets_one_response_line() {
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        String::new(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
    ]
    .join("\n");

    let responses = run(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2025-06-18");
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_parse_error_does_not_stop_the_loop() {
    let input = format!(
        "{}\n{}\n",
        "{not json",
        json!({"jsonrpc": "2.0", "id": 3, "method": "ping"})
    );

    let responses = run(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 3);
    assert_eq!(responses[1]["result"], json!({}));
}

#[tokio::test]
async fn test_upstream_failure_keeps_serving() {
    let input = [
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "get-block", "arguments": {"block_height": 1}}
        })
        .to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string(),
    ]
    .join("\n");

    let responses = run(&input).await;
    assert_eq!(responses.len(), 2);
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error fetching block data: "));
    assert_eq!(responses[1]["id"], 2);
}

#[tokio::test]
async fn test_invalid_utf8_line_is_a_parse_error() {
    let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\xff\"}\n".to_vec();
    input.extend_from_slice(
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"})
            .to_string()
            .as_bytes(),
    );
    input.push(b'\n');

    let responses = run_bytes(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"], json!({}));
}

#[tokio::test]
async fn test_json_without_method_is_invalid_request() {
    let input = format!(
        "{}\n{}\n",
        json!({"jsonrpc": "2.0", "id": 1}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"})
    );

    let responses = run(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["id"], 2);
}
