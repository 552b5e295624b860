//! Device discovery and target resolution over the `list_devices` tool.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::base::content::ToolCallResult;
use crate::base::error::{Error, Result};
use crate::base::tool::{ToolInvoker, ToolParams, LIST_DEVICES};

/// One entry of a `list_devices` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    /// Kept raw: only a literal `true` counts as connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Device {
    pub fn is_connected(&self) -> bool {
        matches!(self.connected, Some(JsonValue::Bool(true)))
    }
}

/// The device sequence exactly as the tool reported it, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Parses a raw `list_devices` result.
    pub fn from_tool_result(result: &ToolCallResult) -> Result<Self> {
        if result.is_error() {
            return Err(Error::ToolProtocol {
                tool: LIST_DEVICES.to_owned(),
                detail: result.error_detail(),
            });
        }
        let raw = result
            .first_text()
            .ok_or_else(|| Error::malformed("expected text content", result.to_string()))?;
        Self::parse(raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let doc: JsonValue = serde_json::from_str(raw)
            .map_err(|e| Error::malformed(format!("failed to parse list_devices result: {e}"), raw))?;
        let entries = doc
            .get("devices")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| Error::malformed("no devices field", raw))?;
        let devices = entries
            .iter()
            .map(|entry| {
                if !entry.is_object() {
                    return Err(Error::malformed(format!("device entry is not an object: {entry}"), raw));
                }
                serde_json::from_value::<Device>(entry.clone())
                    .map_err(|e| Error::malformed(format!("invalid device entry: {e}"), raw))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { devices })
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn into_devices(self) -> Vec<Device> {
        self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Every reported identifier, in document order.
    pub fn device_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.devices.iter().map(|d| d.device_id.as_str())
    }

    pub fn connected_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.devices
            .iter()
            .filter(|d| d.is_connected())
            .map(|d| d.device_id.as_str())
    }

    /// Picks the target device.
    ///
    /// An explicit request wins as long as the tool knows the id, connected
    /// or not. Otherwise the first connected device is chosen, then the first
    /// device overall. "First" is always the order the tool reported.
    pub fn select(&self, requested: Option<&str>) -> Result<String> {
        if let Some(requested) = requested {
            if self.device_ids().any(|id| id == requested) {
                tracing::debug!(device_id = requested, "using requested device");
                return Ok(requested.to_owned());
            }
            return Err(Error::DeviceNotFound {
                requested: requested.to_owned(),
                available: self.device_ids().map(str::to_owned).collect(),
            });
        }

        if let Some(id) = self.connected_ids().next() {
            tracing::debug!(device_id = id, "using first connected device");
            return Ok(id.to_owned());
        }
        if let Some(id) = self.device_ids().next() {
            tracing::debug!(device_id = id, "no connected device; using first reported device");
            return Ok(id.to_owned());
        }
        Err(Error::NoDevicesAvailable)
    }
}

/// Resolves the target device from a raw `list_devices` result.
pub fn resolve(result: &ToolCallResult, requested: Option<&str>) -> Result<String> {
    DeviceList::from_tool_result(result)?.select(requested)
}

pub async fn list_devices(invoker: &dyn ToolInvoker) -> Result<DeviceList> {
    let result = invoker.invoke(LIST_DEVICES, ToolParams::new()).await?;
    DeviceList::from_tool_result(&result)
}

/// Issues one `list_devices` call and resolves the target from it.
pub async fn discover_device(invoker: &dyn ToolInvoker, requested: Option<&str>) -> Result<String> {
    let result = invoker.invoke(LIST_DEVICES, ToolParams::new()).await?;
    let device_id = resolve(&result, requested)?;
    tracing::info!(device_id = %device_id, requested = ?requested, "resolved target device");
    Ok(device_id)
}
