//! MCP client session over a (reader, writer) byte-stream pair.

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::base::content::ToolCallResult;
use crate::base::error::{Error, Result};
use crate::base::tool::{ToolInvoker, ToolParams};

type ClientService = RunningService<RoleClient, ClientInfo>;

pub fn client_info(name: impl Into<String>, version: impl Into<String>) -> ClientInfo {
    ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: name.into(),
            version: version.into(),
            ..Implementation::from_build_env()
        },
    }
}

/// A handshake-established MCP session. Once closed, every call fails with
/// [`Error::SessionClosed`]; closing again is a no-op.
pub struct McpSession {
    service: Option<ClientService>,
}

impl McpSession {
    /// Performs the MCP `initialize` handshake over `reader`/`writer`.
    pub async fn connect<R, W>(reader: R, writer: W, info: ClientInfo) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let client_name = info.client_info.name.clone();
        let service = info
            .serve((reader, writer))
            .await
            .map_err(|e| Error::Handshake(e.to_string()))?;
        tracing::info!(client = %client_name, "MCP session ready");
        Ok(Self {
            service: Some(service),
        })
    }

    pub fn is_open(&self) -> bool {
        self.service.is_some()
    }

    /// Sends one `tools/call` request and waits for its response.
    pub async fn send_call(&self, name: &str, params: ToolParams) -> Result<ToolCallResult> {
        let service = self.service.as_ref().ok_or(Error::SessionClosed)?;
        tracing::debug!(tool = name, "tools/call request");
        let result = service
            .call_tool(CallToolRequestParam {
                name: name.to_owned().into(),
                arguments: Some(params),
            })
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let raw = serde_json::to_value(&result).map_err(|e| Error::Transport(e.to_string()))?;
        let parsed: ToolCallResult = serde_json::from_value(raw.clone())
            .map_err(|e| Error::malformed(format!("unexpected tools/call result: {e}"), raw.to_string()))?;
        tracing::debug!(tool = name, is_error = parsed.is_error(), "tools/call response");
        Ok(parsed)
    }

    /// Cancels the session and waits for its background task to finish.
    pub async fn close(&mut self) -> Result<()> {
        let Some(service) = self.service.take() else {
            return Ok(());
        };
        let reason = service
            .cancel()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        tracing::debug!(reason = ?reason, "MCP session closed");
        Ok(())
    }
}

#[async_trait]
impl ToolInvoker for McpSession {
    async fn invoke(&self, name: &str, params: ToolParams) -> Result<ToolCallResult> {
        self.send_call(name, params).await
    }
}
