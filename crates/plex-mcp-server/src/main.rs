//! plex-mcp-server: Plex MCP Server Main Binary
//!
//! Usage:
//!   plex-mcp-server           - Serve MCP over HTTP (`/messages`, `/sse`)
//!   plex-mcp-server --stdio   - Serve MCP over stdin/stdout
//!   plex-mcp-server --help    - Show help

use std::sync::Arc;
use std::time::Duration;

use plex_api::AppState;
use plex_core::{Config, MediaLibrary, PlexClient, ToolManager};
use plex_mcp::McpHandler;
use plex_tools::register_default_tools;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// HTTP server mode
    Server,
    /// Line-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("plex-mcp-server {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    init_logging(&config)?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting plex-mcp-server...");
    tracing::debug!("Configuration: {:?}", config);

    let client = PlexClient::new(&config.plex)
        .map_err(|e| anyhow::anyhow!("Failed to create Plex client: {}", e))?;
    let library: Arc<dyn MediaLibrary> = Arc::new(client);

    let server_name = match library.server_name().await {
        Ok(name) => {
            tracing::info!("Connected to Plex server: {}", name);
            name
        }
        Err(e) => {
            tracing::warn!("Could not reach Plex at {}: {}", config.plex.url, e);
            "unknown".to_string()
        }
    };

    let mut tool_manager = ToolManager::new();
    register_default_tools(&mut tool_manager, library);
    tracing::info!(
        "Registered {} tools: {:?}",
        tool_manager.len(),
        tool_manager.tool_names()
    );

    let handler = McpHandler::new(Arc::new(tool_manager));

    match mode {
        RunMode::Stdio => {
            tracing::info!("Running in stdio mode");
            plex_mcp::run_stdio(handler).await?;
        }
        RunMode::Server => run_server(&config, handler, server_name).await?,
        _ => {}
    }

    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--stdio" | "-s" => return RunMode::Stdio,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Logs go to stderr so stdout stays free for stdio mode. `RUST_LOG`
/// overrides the configured level.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_level.to_lowercase())?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Print help message
fn print_help() {
    println!("plex-mcp-server - Model Context Protocol server for Plex");
    println!();
    println!("Usage:");
    println!("  plex-mcp-server           Serve MCP over HTTP");
    println!("  plex-mcp-server --stdio   Serve MCP over stdin/stdout");
    println!("  plex-mcp-server --help    Show this help message");
    println!("  plex-mcp-server --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  PLEX_TOKEN           Plex authentication token (required)");
    println!("  PLEX_URL             Plex server URL (default: http://localhost:32400)");
    println!("  PLEX_TIMEOUT_SECS    Plex request timeout (default: 30)");
    println!("  HOST                 Bind address (default: 0.0.0.0)");
    println!("  PORT                 Bind port (default: 8000)");
    println!("  SSE_KEEPALIVE_SECS   Idle time before an SSE keepalive (default: 30)");
    println!("  LOG_LEVEL            Log level (default: INFO)");
    println!();
    println!("Settings may also be given in plex-mcp.toml in the working directory.");
}

/// Run the HTTP server until Ctrl+C
async fn run_server(
    config: &Config,
    handler: McpHandler,
    server_name: String,
) -> anyhow::Result<()> {
    let (host, port) = config.bind_addr();
    let state = AppState::new(
        handler,
        server_name,
        Duration::from_secs(config.server.sse_keepalive_secs),
    );

    tokio::select! {
        result = plex_api::start_server(host, port, state) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down Plex MCP Server"),
    }

    Ok(())
}
