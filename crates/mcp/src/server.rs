//! MCP server implementation.
//!
//! Reads JSON-RPC messages from a transport one at a time and answers each
//! before reading the next. `tools/call` is forwarded to the [`Dispatcher`],
//! whose text result is returned as a single text content block.

use serde::Serialize;
use serde_json::Value;

use intellacc_tool_runtime::Dispatcher;

use crate::error::McpError;
use crate::transport::McpTransport;
use crate::types::*;

/// MCP server that bridges a [`Dispatcher`] to MCP clients.
pub struct McpServer {
    dispatcher: Dispatcher,
    server_name: String,
    server_version: String,
    initialized: bool,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            server_name: SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            initialized: false,
        }
    }

    /// Run the server loop until the transport is closed.
    pub async fn run<T: McpTransport>(&mut self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!(server = %self.server_name, "MCP server starting");

        while let Some(line) = transport.receive().await? {
            tracing::debug!(message = %line, "Received message");

            if let Some(response) = self.handle_message(&line).await {
                let json = serde_json::to_string(&response)?;
                tracing::debug!(response = %json, "Sending response");
                transport.send(&json).await?;
            }
        }

        tracing::info!("Transport closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_message(&mut self, line: &str) -> Option<JsonRpcResponse> {
        // Distinguish requests (have "id") from notifications (no "id")
        // by parsing as generic Value first.
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON");
                return Some(JsonRpcResponse::error(
                    RpcId::Null,
                    McpError::JsonParse(e).to_rpc_error(),
                ));
            }
        };

        if raw.get("id").is_none() {
            match serde_json::from_value::<JsonRpcNotification>(raw) {
                Ok(notif) => self.handle_notification(&notif),
                Err(e) => tracing::debug!(error = %e, "Ignoring malformed notification"),
            }
            return None;
        }

        let id = raw
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<RpcId>(v).ok())
            .unwrap_or(RpcId::Null);

        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => Some(self.handle_request(&request).await),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid JSON-RPC request");
                Some(JsonRpcResponse::error(
                    id,
                    McpError::InvalidRequest(e.to_string()).to_rpc_error(),
                ))
            }
        }
    }

    /// Handle a single JSON-RPC request and produce a response.
    pub async fn handle_request(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        let outcome = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(&request.params).await,
            method => {
                tracing::warn!(method = %method, "Unknown method");
                Err(McpError::MethodNotFound(method.to_string()))
            }
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, err.to_rpc_error()),
        }
    }

    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                // Calls run to completion; there is nothing in flight to abort.
                tracing::debug!("Client cancelled a request");
            }
            method => {
                tracing::debug!(method = %method, "Unknown notification, ignoring");
            }
        }
    }

    fn handle_initialize(&mut self, params: &Option<Value>) -> Result<Value, McpError> {
        match params
            .clone()
            .map(serde_json::from_value::<InitializeParams>)
        {
            Some(Ok(p)) => tracing::info!(
                client = %p.client_info.name,
                client_version = p.client_info.version.as_deref().unwrap_or("?"),
                protocol = %p.protocol_version,
                "Handling initialize"
            ),
            _ => tracing::info!("Handling initialize without client info"),
        }
        self.initialized = true;

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: Some(self.server_version.clone()),
            },
        })
    }

    fn handle_list_tools(&self) -> Result<Value, McpError> {
        tracing::debug!("Handling tools/list");

        let tools = self
            .dispatcher
            .registry()
            .list()
            .into_iter()
            .map(ToolInfo::from)
            .collect();
        to_result(ListToolsResult { tools })
    }

    async fn handle_call_tool(&self, params: &Option<Value>) -> Result<Value, McpError> {
        let params = params
            .clone()
            .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
        let call: CallToolParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if !self.initialized {
            tracing::warn!(tool = %call.name, "tools/call before initialize");
        }
        tracing::debug!(tool = %call.name, "Handling tools/call");

        let result = self.dispatcher.dispatch(&call.name, call.arguments).await;
        to_result(CallToolResult::text(result.text))
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value)?)
}
