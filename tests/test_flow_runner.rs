use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use maestro_mcp_client::base::tool::{ToolInvoker, ToolParams};
use maestro_mcp_client::domain::flow;
use maestro_mcp_client::{ContentItem, Error, FlowEnv, Result, ToolCallResult};

struct Recorder {
    reply: ToolCallResult,
    last: Mutex<Option<(String, ToolParams)>>,
}

impl Recorder {
    fn replying(reply: ToolCallResult) -> Self {
        Self {
            reply,
            last: Mutex::new(None),
        }
    }

    fn last_params(&self) -> ToolParams {
        self.last.lock().unwrap().clone().expect("no call recorded").1
    }
}

#[async_trait]
impl ToolInvoker for Recorder {
    async fn invoke(&self, name: &str, params: ToolParams) -> Result<ToolCallResult> {
        *self.last.lock().unwrap() = Some((name.to_owned(), params));
        Ok(self.reply.clone())
    }
}

const FLOW: &str = "appId: com.example.app\n---\n- launchApp\n";

#[tokio::test]
async fn env_field_present_only_when_non_empty() {
    let tool = Recorder::replying(ToolCallResult::success(vec![ContentItem::text("ok")]));

    flow::run_flow(&tool, "emulator-5554", FLOW, &FlowEnv::new()).await.unwrap();
    let params = tool.last_params();
    assert_eq!(params["device_id"], "emulator-5554");
    assert_eq!(params["flow_yaml"], FLOW);
    assert!(!params.contains_key("env"));

    let env = FlowEnv::from([
        ("USERNAME".to_string(), "alice".to_string()),
        ("PASSWORD".to_string(), "s3cret".to_string()),
    ]);
    flow::run_flow(&tool, "emulator-5554", FLOW, &env).await.unwrap();
    assert_eq!(
        tool.last_params()["env"],
        json!({"USERNAME": "alice", "PASSWORD": "s3cret"})
    );
}

#[tokio::test]
async fn device_busy_is_a_flow_execution_error() {
    let reply: ToolCallResult = serde_json::from_value(json!({
        "isError": true,
        "content": [{"type": "text", "text": "device busy"}]
    }))
    .unwrap();
    let tool = Recorder::replying(reply);
    let err = flow::run_flow(&tool, "A", FLOW, &FlowEnv::new()).await.unwrap_err();
    assert!(matches!(err, Error::FlowExecution(ref msg) if msg == "device busy"));
}

#[tokio::test]
async fn error_without_text_reports_the_whole_result() {
    let tool = Recorder::replying(ToolCallResult::error(vec![]));
    match flow::run_flow(&tool, "A", FLOW, &FlowEnv::new()).await.unwrap_err() {
        Error::FlowExecution(msg) => assert!(msg.contains("\"isError\":true"), "got {msg}"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn invoker_failures_pass_through() {
    struct Dead;

    #[async_trait]
    impl ToolInvoker for Dead {
        async fn invoke(&self, _name: &str, _params: ToolParams) -> Result<ToolCallResult> {
            Err(Error::SessionClosed)
        }
    }

    let err = flow::run_flow(&Dead, "A", FLOW, &FlowEnv::new()).await.unwrap_err();
    assert!(matches!(err, Error::SessionClosed));
}
