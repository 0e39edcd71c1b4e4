// crates/mcp/src/server.rs
//! Main server loop handling JSON-RPC messages over stdio.
//!
//! One JSON message per line. Protocol traffic owns stdout; all logging goes
//! to stderr via `tracing`.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::handlers::ToolHandlers;
use crate::protocol::*;
use crate::tools::get_tools;

pub struct McpServer {
    handlers: ToolHandlers,
}

impl McpServer {
    pub fn new(handlers: ToolHandlers) -> Self {
        Self { handlers }
    }

    /// Run the server, reading from stdin and writing to stdout until EOF.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!("server started, waiting for messages");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle(&line).await {
                let out = serde_json::to_string(&response)?;
                stdout.write_all(out.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications yield no response.
    pub async fn handle(&self, msg: &str) -> Option<JsonRpcResponse> {
        let req: JsonRpcRequest = match serde_json::from_str(msg) {
            Ok(r) => r,
            Err(e) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
        };

        let id = req.id.clone();
        tracing::debug!(method = %req.method, "request received");

        let response = match req.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: "2024-11-05".into(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: "taxotag".into(),
                        version: env!("CARGO_PKG_VERSION").into(),
                    },
                };
                serialize_result(id, result)
            }

            "tools/list" => serialize_result(id, ToolsListResult { tools: get_tools() }),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()))
                    }
                };
                tracing::info!(tool = %params.name, "calling tool");

                match self.handlers.call(&params.name, params.arguments).await {
                    Some(payload) => {
                        serialize_result(id, ToolCallResult::from_payload(&payload))
                    }
                    None => JsonRpcResponse::error(
                        id,
                        METHOD_NOT_FOUND,
                        format!("Unknown tool: {}", params.name),
                    ),
                }
            }

            method if req.is_notification() => {
                tracing::debug!(method, "notification ignored");
                return None;
            }

            method => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {method}"),
            ),
        };

        Some(response)
    }
}

fn serialize_result<T: serde::Serialize>(id: Option<Value>, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => {
            JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {e}"))
        }
    }
}
