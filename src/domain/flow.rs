use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value as JsonValue;

use crate::base::content::ToolCallResult;
use crate::base::error::{Error, Result};
use crate::base::tool::{ToolInvoker, ToolParams, RUN_FLOW};

/// Environment variables injected into a flow run.
pub type FlowEnv = BTreeMap<String, String>;

/// Builds the `run_flow` parameter record.
///
/// `env` is only present when non-empty: the tool may treat an explicit empty
/// mapping differently from an omitted field.
pub fn flow_params(device_id: &str, flow_yaml: &str, env: &FlowEnv) -> ToolParams {
    let mut params = ToolParams::new();
    params.insert("device_id".into(), JsonValue::String(device_id.to_owned()));
    params.insert("flow_yaml".into(), JsonValue::String(flow_yaml.to_owned()));
    if !env.is_empty() {
        let env = env
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        params.insert("env".into(), JsonValue::Object(env));
    }
    params
}

/// Runs a YAML flow on `device_id`. A successful result is returned as-is.
pub async fn run_flow(
    invoker: &dyn ToolInvoker,
    device_id: &str,
    flow_yaml: &str,
    env: &FlowEnv,
) -> Result<ToolCallResult> {
    tracing::debug!(device_id, env_vars = env.len(), "run_flow invoked");
    let start = Instant::now();
    let result = invoker.invoke(RUN_FLOW, flow_params(device_id, flow_yaml, env)).await?;
    let elapsed_ms = start.elapsed().as_millis() as f64;
    crate::infra::logging::log_metric(RUN_FLOW, "latency_ms", elapsed_ms);

    if result.is_error() {
        crate::infra::logging::log_metric(RUN_FLOW, "error_total", 1.0);
        return Err(Error::FlowExecution(result.error_detail()));
    }
    Ok(result)
}
