use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Client-wide error model. Every failure a caller can see maps to exactly
/// one variant so it can be matched on rather than string-sniffed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start `{command}`; ensure the Maestro CLI is installed and on PATH")]
    ProcessStart {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("MCP handshake failed: {0}")]
    Handshake(String),

    #[error("{tool} failed: {detail}")]
    ToolProtocol { tool: String, detail: String },

    #[error("malformed response: {reason}. Raw text: {raw}")]
    MalformedResponse { reason: String, raw: String },

    #[error("device '{requested}' not found. Available: {}", available.join(", "))]
    DeviceNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("no devices available; start a device and try again")]
    NoDevicesAvailable,

    #[error("error while executing flow call: {0}")]
    FlowExecution(String),

    #[error("MCP session is closed")]
    SessionClosed,

    #[error("MCP transport failure: {0}")]
    Transport(String),

    #[error("failed to build blocking runtime")]
    Runtime(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read flow file {}", path.display())]
    FlowFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}
