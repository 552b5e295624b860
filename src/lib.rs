//! Blocking client for the Maestro CLI's MCP server (`maestro mcp`).
//!
//! ```no_run
//! use maestro_mcp_client::{FlowEnv, MaestroClient};
//!
//! let mut client = MaestroClient::start(None)?;
//! let result = client.run_flow("appId: com.example\n---\n- launchApp\n", &FlowEnv::new())?;
//! println!("{result}");
//! client.close();
//! # Ok::<(), maestro_mcp_client::Error>(())
//! ```

pub mod base;
pub mod cli;
pub mod clients;
pub mod domain;
pub mod infra;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::base::content::{ContentItem, ToolCallResult};
pub use crate::base::error::{Error, Result};
pub use crate::clients::MaestroClient;
pub use crate::domain::{Device, DeviceList, FlowEnv};
pub use crate::infra::config::{Config, ToolCommand};
