//! Blocking Maestro client: owns the `maestro mcp` process, its MCP session and
//! the device chosen at start-up.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::runtime::Runtime;

use crate::base::content::ToolCallResult;
use crate::base::error::{Error, Result};
use crate::domain::devices::{self, Device};
use crate::domain::flow::{self, FlowEnv};
use crate::infra::config::Config;
use crate::infra::runtime::mcp_transport::{client_info, McpSession};
use crate::infra::runtime::process::ToolProcess;

/// Handle to a running `maestro mcp` server.
///
/// Every method blocks the calling thread until the MCP exchange completes;
/// no timeout is applied, so a hung tool hangs the caller. Do not use from
/// inside another async runtime.
pub struct MaestroClient {
    runtime: Runtime,
    session: McpSession,
    process: ToolProcess,
    default_device: String,
    closed: bool,
}

impl MaestroClient {
    /// Starts the client from [`Config::load`], optionally pinning a device.
    pub fn start(requested_device: Option<&str>) -> Result<Self> {
        let config = Config::load()?.with_device(requested_device);
        Self::start_with(&config)
    }

    pub fn start_with(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let mut process = {
            let _guard = runtime.enter();
            ToolProcess::spawn(&config.command)?
        };
        let (reader, writer) = match process.take_stdio() {
            Ok(stdio) => stdio,
            Err(e) => {
                let _ = runtime.block_on(process.terminate());
                return Err(e);
            }
        };
        Self::establish(runtime, process, reader, writer, config)
    }

    /// Handshake plus device resolution. On any failure the session and the
    /// already-spawned process are torn down before the error is returned.
    fn establish<R, W>(
        runtime: Runtime,
        mut process: ToolProcess,
        reader: R,
        writer: W,
        config: &Config,
    ) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let info = client_info(config.client_name.clone(), config.client_version.clone());
        let requested = config.device_id.as_deref();

        let outcome = runtime.block_on(async {
            let mut session = McpSession::connect(reader, writer, info).await?;
            match devices::discover_device(&session, requested).await {
                Ok(device) => Ok((session, device)),
                Err(e) => {
                    if let Err(close_err) = session.close().await {
                        tracing::warn!(error = %close_err, "failed to close session after start-up error");
                    }
                    Err(e)
                }
            }
        });

        match outcome {
            Ok((session, default_device)) => Ok(Self {
                runtime,
                session,
                process,
                default_device,
                closed: false,
            }),
            Err(e) => {
                if let Err(kill_err) = runtime.block_on(process.terminate()) {
                    tracing::warn!(error = %kill_err, "failed to terminate tool process after start-up error");
                }
                Err(e)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_open()
    }

    /// The device resolved at start-up. Not re-validated afterwards.
    pub fn default_device(&self) -> &str {
        &self.default_device
    }

    /// A fresh `list_devices` snapshot.
    pub fn devices(&self) -> Result<Vec<Device>> {
        let list = self.runtime.block_on(devices::list_devices(&self.session))?;
        Ok(list.into_devices())
    }

    /// Runs `flow_yaml` on the default device.
    pub fn run_flow(&self, flow_yaml: &str, env: &FlowEnv) -> Result<ToolCallResult> {
        self.run_flow_on(&self.default_device, flow_yaml, env)
    }

    pub fn run_flow_on(&self, device_id: &str, flow_yaml: &str, env: &FlowEnv) -> Result<ToolCallResult> {
        self.runtime
            .block_on(flow::run_flow(&self.session, device_id, flow_yaml, env))
    }

    pub fn run_flow_file(&self, path: &Path, env: &FlowEnv) -> Result<ToolCallResult> {
        let flow_yaml = std::fs::read_to_string(path).map_err(|source| Error::FlowFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.run_flow(&flow_yaml, env)
    }

    /// Closes the session, then kills the process. Errors from either step
    /// are logged and dropped; calling this again does nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.runtime.block_on(self.session.close()) {
            tracing::warn!(error = %e, "ignoring error while closing MCP session");
        }
        if let Err(e) = self.runtime.block_on(self.process.terminate()) {
            tracing::warn!(error = %e, "ignoring error while terminating tool process");
        }
        tracing::info!("maestro client closed");
    }
}

impl Drop for MaestroClient {
    fn drop(&mut self) {
        self.close();
    }
}
