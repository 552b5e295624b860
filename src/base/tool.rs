use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::base::content::ToolCallResult;
use crate::base::error::Result;

/// Parameter record for a single tool call.
pub type ToolParams = Map<String, JsonValue>;

pub const LIST_DEVICES: &str = "list_devices";
pub const RUN_FLOW: &str = "run_flow";

/// Anything that can issue a named tool call and hand back the raw result.
///
/// Device discovery and flow execution only ever talk to this trait, never
/// to the transport, so they can be driven by an in-memory fake.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, name: &str, params: ToolParams) -> Result<ToolCallResult>;
}
