//! Wolai MCP server binary.
//!
//! Exposes a Wolai knowledge base to MCP clients (Claude Code, Gemini CLI, opencode).
//!
//! Usage:
//!   # Credentials from the environment (typical MCP config `env` block)
//!   WOLAI_APP_ID=... WOLAI_APP_SECRET=... WOLAI_ROOT_ID=... cargo run -p wolai-mcp
//!
//!   # Or as flags
//!   cargo run -p wolai-mcp -- --app-id ... --app-secret ... --root-id ...
//!
//! Test with MCP inspector:
//!   npx @modelcontextprotocol/inspector cargo run -p wolai-mcp

use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{EnvFilter, fmt};

use wolai_client::Credentials;
use wolai_client::constants::{DEFAULT_API_URL, ENV_API_URL, ENV_APP_ID, ENV_APP_SECRET, ENV_ROOT_ID};
use wolai_mcp::WolaiMcp;

/// MCP server exposing a Wolai knowledge base.
#[derive(Parser, Debug)]
#[command(name = "wolai-mcp")]
#[command(about = "MCP server for the Wolai knowledge base")]
struct Args {
    /// Wolai App ID (https://www.wolai.com/dev)
    #[arg(long, env = ENV_APP_ID, default_value = "", hide_default_value = true)]
    app_id: String,

    /// Wolai App Secret
    #[arg(long, env = ENV_APP_SECRET, default_value = "", hide_default_value = true, hide_env_values = true)]
    app_secret: String,

    /// Default root page for search, navigation, and page creation
    #[arg(long, env = ENV_ROOT_ID)]
    root_id: Option<String>,

    /// Wolai open API base URL
    #[arg(long, env = ENV_API_URL, default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing to stderr (MCP uses stdio for protocol)
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    if args.app_id.is_empty() || args.app_secret.is_empty() {
        tracing::warn!("{ENV_APP_ID}/{ENV_APP_SECRET} not set; use set_wolai_credentials before other tools");
    }

    let client = wolai_client::connect_http(
        &args.api_url,
        Credentials::new(args.app_id, args.app_secret),
        args.root_id,
    )?;
    tracing::info!(api_url = %client.api_url(), "Starting Wolai MCP server");

    // Create and serve the MCP server
    let service = WolaiMcp::new(client)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("MCP server error: {:?}", e);
        })?;

    tracing::info!("wolai-mcp server ready");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("wolai-mcp server shutting down");
    Ok(())
}
