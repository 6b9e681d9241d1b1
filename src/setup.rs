// src/setup.rs
//! One-shot helpers that register this server with desktop MCP clients.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

/// Key under `mcpServers` and the name shown by clients.
pub const SERVER_KEY: &str = "bitcoin-mcp";
pub const CURSOR_DEEPLINK: &str = "cursor://anysphere.cursor-deeplink/mcp/install";

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How a client should launch this server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl ServerCommand {
    /// The currently running executable, with no extra arguments.
    pub fn current() -> Self {
        let command = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "bitcoin_mcp".to_string());
        Self {
            command,
            args: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "command": self.command, "args": self.args })
    }
}

/// Location of `claude_desktop_config.json` for the running platform.
pub fn claude_config_path() -> Result<PathBuf, SetupError> {
    let home = dirs::home_dir().ok_or(SetupError::NoHomeDir)?;
    claude_config_path_for(&home, std::env::consts::OS)
}

pub fn claude_config_path_for(home: &Path, os: &str) -> Result<PathBuf, SetupError> {
    let dir = match os {
        "macos" => home.join("Library").join("Application Support").join("Claude"),
        "linux" => home.join(".config").join("claude"),
        "windows" => home.join("AppData").join("Roaming").join("Claude"),
        other => return Err(SetupError::UnsupportedPlatform(other.to_string())),
    };
    Ok(dir.join("claude_desktop_config.json"))
}

fn empty_config() -> Value {
    json!({ "mcpServers": {} })
}

/// Read an existing client config. A missing or unparseable file yields an
/// empty `{"mcpServers": {}}` document.
pub fn read_config(path: &Path) -> Value {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return empty_config(),
    };
    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Error reading config file {}: {}", path.display(), e);
            empty_config()
        }
    }
}

/// Insert or replace this server's entry, leaving every other key intact.
pub fn merge_server_entry(config: Value, entry: &ServerCommand) -> Value {
    let mut root = match config {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let servers = root
        .entry("mcpServers")
        .or_insert_with(|| Value::Object(Map::new()));
    if !servers.is_object() {
        *servers = Value::Object(Map::new());
    }
    if let Value::Object(servers) = servers {
        servers.insert(SERVER_KEY.to_string(), entry.to_json());
    }
    Value::Object(root)
}

pub fn write_config(path: &Path, config: &Value) -> Result<(), SetupError> {
    let io_err = |source| SetupError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(config)?;
    fs::write(path, body).map_err(io_err)
}

/// Merge this server into the Claude Desktop config at `path`.
pub fn setup_claude_desktop(path: &Path, entry: &ServerCommand) -> Result<(), SetupError> {
    let config = merge_server_entry(read_config(path), entry);
    write_config(path, &config)
}

pub fn manual_instructions(entry: &ServerCommand) -> String {
    let snippet = json!({ "mcpServers": server_config(entry) });
    let snippet = serde_json::to_string_pretty(&snippet).unwrap_or_default();
    format!(
        "Manual Configuration Instructions:\n\n\
         1. Build and install the binary:\n   cargo install --path .\n\n\
         2. Add to your MCP client configuration:\n{}\n\n\
         3. Restart your MCP client\n",
        snippet
    )
}

/// `{"bitcoin-mcp": {"command": ..., "args": [...]}}`
pub fn server_config(entry: &ServerCommand) -> Value {
    json!({ SERVER_KEY: entry.to_json() })
}

/// Cursor install deeplink carrying the base64-encoded server config.
pub fn cursor_install_link(entry: &ServerCommand) -> Result<String, SetupError> {
    let config = server_config(entry);
    let encoded = STANDARD.encode(serde_json::to_string(&config)?);
    Ok(format!("{}?name={}&config={}", CURSOR_DEEPLINK, SERVER_KEY, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry() -> ServerCommand {
        ServerCommand {
            command: "/usr/local/bin/bitcoin_mcp".to_string(),
            args: vec![],
        }
    }

    #[test]
    fn test_platform_paths() {
        let home = Path::new("/home/satoshi");
        assert_eq!(
            claude_config_path_for(home, "linux").unwrap(),
            PathBuf::from("/home/satoshi/.config/claude/claude_desktop_config.json")
        );
        assert!(claude_config_path_for(home, "macos")
            .unwrap()
            .ends_with("Library/Application Support/Claude/claude_desktop_config.json"));
        assert!(matches!(
            claude_config_path_for(home, "haiku"),
            Err(SetupError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_setup_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("claude_desktop_config.json");

        setup_claude_desktop(&path, &entry()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["mcpServers"][SERVER_KEY]["command"],
            "/usr/local/bin/bitcoin_mcp"
        );
        assert_eq!(written["mcpServers"][SERVER_KEY]["args"], json!([]));
    }

    #[test]
    fn test_setup_preserves_other_servers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claude_desktop_config.json");
        fs::write(
            &path,
            r#"{"theme":"dark","mcpServers":{"other":{"command":"other-mcp","args":[]}}}"#,
        )
        .unwrap();

        setup_claude_desktop(&path, &entry()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["theme"], "dark");
        assert_eq!(written["mcpServers"]["other"]["command"], "other-mcp");
        assert!(written["mcpServers"].get(SERVER_KEY).is_some());
    }

    #[test]
    fn test_invalid_config_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claude_desktop_config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(read_config(&path), json!({ "mcpServers": {} }));
        setup_claude_desktop(&path, &entry()).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["mcpServers"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_cursor_install_link_round_trips_config() {
        let link = cursor_install_link(&entry()).unwrap();
        let prefix = format!("{}?name={}&config=", CURSOR_DEEPLINK, SERVER_KEY);
        assert!(link.starts_with(&prefix));

        let decoded = STANDARD.decode(&link[prefix.len()..]).unwrap();
        let config: Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(config[SERVER_KEY]["command"], "/usr/local/bin/bitcoin_mcp");
    }
}
