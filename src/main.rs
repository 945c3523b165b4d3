//! Model export store binary entry point.
//!
//! This binary provides a stdio-based MCP server for model exports.
//! All logs go to stderr; stdout is reserved for MCP JSON-RPC messages.

use model_export_store::config::Config;
use model_export_store::server::McpServer;

#[tokio::main]
async fn main() {
    // Initialize logging to stderr only (stdout is for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("model-export-store starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Configuration loaded: database={}, ttl={}s, max_exports_per_player={}",
        config.database_path,
        config.export_ttl_secs,
        config.max_exports_per_player
    );

    let server = McpServer::new(config);
    if let Err(e) = server.run_stdio().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("model-export-store shutdown complete");
}
