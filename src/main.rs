// src/main.rs

use anyhow::{Context, Result};
use bitcoin_mcp_server::{
    api,
    config::Config,
    mcp::transport,
    setup::{self, ServerCommand},
    AppState,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bitcoin_mcp", version, about = "Bitcoin blockchain MCP server")]
struct Cli {
    /// Serve the HTTP bridge instead of stdin/stdout
    #[arg(long)]
    http: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register this server with a desktop MCP client
    Setup {
        #[arg(value_enum)]
        client: SetupClient,
    },
    /// Print a Cursor install deeplink for this server
    InstallLink,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SetupClient {
    /// Claude Desktop
    Claude,
    /// Show manual instructions
    Manual,
}

// --- MCP Server Logic ---
async fn run_server(http: bool) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(config).context("Failed to initialize block explorer client")?;
    info!("Using block explorer API at {}", state.client.base_url());

    // MCP_MODE wins over --http so client launchers can force stdio
    if http && !state.config.mcp_mode {
        api::serve_http(state).await
    } else {
        transport::serve_stdio(state)
            .await
            .context("stdio transport failed")?;
        info!("MCP server shutting down");
        Ok(())
    }
}

fn run_setup(client: SetupClient) -> Result<()> {
    let entry = ServerCommand::current();
    match client {
        SetupClient::Manual => {
            println!("{}", setup::manual_instructions(&entry));
            Ok(())
        }
        SetupClient::Claude => {
            let result = setup::claude_config_path().and_then(|path| {
                setup::setup_claude_desktop(&path, &entry)?;
                Ok(path)
            });
            match result {
                Ok(path) => {
                    println!("Claude Desktop configuration updated at: {}", path.display());
                    println!("Please restart Claude Desktop to load the Bitcoin MCP server.");
                    Ok(())
                }
                Err(e) => {
                    println!("Falling back to manual instructions:\n");
                    println!("{}", setup::manual_instructions(&entry));
                    Err(e).context("Setup failed")
                }
            }
        }
    }
}

fn run_install_link() -> Result<()> {
    let entry = ServerCommand::current();
    let link = setup::cursor_install_link(&entry)?;
    println!("Cursor MCP Install Link:\n\n{}\n", link);
    println!(
        "Configuration:\n\n{}\n",
        serde_json::to_string_pretty(&setup::server_config(&entry))?
    );
    println!("Note: This MCP server does not require any API keys.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for protocol messages
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitcoin_mcp_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::Setup { client }) => run_setup(client),
        Some(Command::InstallLink) => run_install_link(),
        None => run_server(cli.http).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
