use tracing_subscriber::EnvFilter;

use taxotag_mcp::handlers::ToolHandlers;
use taxotag_mcp::server::McpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,taxotag_mcp=info,taxotag_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let server = McpServer::new(ToolHandlers::new());
    server.run().await
}
