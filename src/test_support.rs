//! In-process stand-in for `maestro mcp`, served over `tokio::io::duplex`.

use std::future::Future;
use std::sync::{Arc, Mutex};

use rmcp::handler::server::router::Router;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo};
use rmcp::{serve_server, ServerHandler};
use serde_json::Value as JsonValue;
use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

#[derive(Clone)]
pub(crate) struct FakeMaestro {
    devices: JsonValue,
    flow_error: Option<String>,
    calls: Arc<Mutex<Vec<(String, JsonObject)>>>,
}

impl ServerHandler for FakeMaestro {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl FakeMaestro {
    #[rmcp::tool(name = "list_devices", description = "List devices visible to Maestro")]
    async fn list_devices(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.record("list_devices", params.0);
        let body = serde_json::json!({ "devices": self.devices });
        Ok(CallToolResult::success(vec![Content::text(body.to_string())]))
    }

    #[rmcp::tool(name = "run_flow", description = "Run a Maestro flow from YAML")]
    async fn run_flow(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.record("run_flow", params.0);
        match &self.flow_error {
            Some(msg) => Ok(CallToolResult::error(vec![Content::text(msg.clone())])),
            None => Ok(CallToolResult::success(vec![Content::text("Flow executed successfully")])),
        }
    }
}

impl FakeMaestro {
    pub(crate) fn new(devices: JsonValue) -> Self {
        Self {
            devices,
            flow_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing_flows(mut self, msg: &str) -> Self {
        self.flow_error = Some(msg.to_owned());
        self
    }

    fn record(&self, tool: &str, params: JsonObject) {
        self.calls.lock().unwrap().push((tool.to_owned(), params));
    }

    pub(crate) fn calls(&self) -> Vec<(String, JsonObject)> {
        self.calls.lock().unwrap().clone()
    }

    /// Spawns the server on the current runtime and returns the client's
    /// (reader, writer) ends.
    pub(crate) fn serve_duplex(self) -> (ReadHalf<DuplexStream>, WriteHalf<DuplexStream>) {
        let (client_end, server_end) = tokio::io::duplex(64 * 1024);
        let tools = Self::tool_router();
        let service = Router::new(self).with_tools(tools);
        tokio::spawn(async move {
            if let Ok(running) = serve_server(service, tokio::io::split(server_end)).await {
                let _ = running.waiting().await;
            }
        });
        tokio::io::split(client_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_tools_like_maestro() {
        let info = FakeMaestro::new(serde_json::json!([])).get_info();
        assert!(info.capabilities.tools.is_some());
    }
}
