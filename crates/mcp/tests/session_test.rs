//! End-to-end MCP session over the in-memory transport.
//!
//! Drives a server task the way an MCP client would: initialize, list the
//! catalog, then call each tool against a stub container runtime.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::timeout;

use intellacc_core::Config;
use intellacc_mcp::{
    CallToolResult, ChannelTransport, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    McpServer, McpTransport, RpcId, PROTOCOL_VERSION,
};
use intellacc_tool_runtime::runner::stub::StubRunner;
use intellacc_tool_runtime::{Dispatcher, ToolContext, ToolRegistry};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Session {
    client: ChannelTransport,
    next_id: i64,
}

impl Session {
    async fn request(&mut self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.next_id += 1;
        let req = JsonRpcRequest::new(RpcId::Number(self.next_id), method, params);
        self.client
            .send(&serde_json::to_string(&req).unwrap())
            .await
            .unwrap();
        let line = timeout(TIMEOUT, self.client.receive())
            .await
            .expect("server did not answer in time")
            .unwrap()
            .expect("server closed the transport");
        let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.id, RpcId::Number(self.next_id));
        resp
    }

    async fn call(&mut self, name: &str, arguments: Value) -> String {
        let resp = self
            .request("tools/call", Some(json!({"name": name, "arguments": arguments})))
            .await;
        assert!(resp.error.is_none(), "unexpected rpc error: {:?}", resp.error);
        let result: CallToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        result.joined_text()
    }
}

fn start(config: &Config, stub: Arc<StubRunner>) -> (Session, tokio::task::JoinHandle<()>) {
    let (client, mut server_side) = ChannelTransport::pair();
    let registry = Arc::new(ToolRegistry::with_defaults(config));
    let dispatcher = Dispatcher::new(registry, ToolContext::new(stub));
    let mut server = McpServer::new(dispatcher);

    let handle = tokio::spawn(async move {
        server.run(&mut server_side).await.unwrap();
    });
    (Session { client, next_id: 0 }, handle)
}

#[tokio::test]
async fn full_session_against_stub_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.project.root = dir.path().to_path_buf();
    config.project.context_file = dir.path().join("CLAUDE.md");
    std::fs::write(&config.project.context_file, "# Intellacc\n").unwrap();

    let stub = Arc::new(StubRunner::new());
    let (mut session, handle) = start(&config, stub.clone());

    let init = session
        .request(
            "initialize",
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "session-test", "version": "0.0.1"}
            })),
        )
        .await;
    assert_eq!(init.result.unwrap()["serverInfo"]["name"], "intellacc-mcp-server");

    // Notifications get no reply; the next response must belong to tools/list.
    session
        .client
        .send(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await
        .unwrap();

    let listed = session.request("tools/list", None).await;
    let tools: ListToolsResult = serde_json::from_value(listed.result.unwrap()).unwrap();
    assert_eq!(tools.tools.len(), 3);
    assert_eq!(tools.tools[2].input_schema["required"], json!(["service"]));

    stub.queue_output(0, "rows: 3", "");
    let text = session.call("query_db", json!({"query": "SELECT 1"})).await;
    assert!(text.starts_with("Query executed successfully:"));
    assert!(text.contains("rows: 3"));

    stub.queue_output(1, "", "syntax error at or near \"SELEC\"");
    let text = session.call("query_db", json!({"query": "SELEC 1"})).await;
    assert!(text.starts_with("Query failed:"));
    assert!(text.contains("syntax error"));

    stub.queue_output(0, "intellacc_db\tUp 3 hours\t0.0.0.0:5432->5432/tcp", "");
    let text = session.call("get_project_status", json!({})).await;
    assert!(text.contains("## Docker Containers\nintellacc_db\tUp 3 hours"));

    let text = session.call("analyze_logs", json!({"service": "cache"})).await;
    assert_eq!(text, "Unknown service: cache");

    stub.queue_output(0, "listening on 3000", "");
    let text = session
        .call("analyze_logs", json!({"service": "backend", "lines": 10}))
        .await;
    assert!(text.contains("- Status: Healthy"));

    let text = session.call("deploy", json!({})).await;
    assert_eq!(text, "Unknown tool: deploy");

    // Exactly one external call per tool run that reached the runtime.
    let calls = stub.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[3], vec!["docker", "logs", "--tail", "10", "intellacc_backend"]);

    // The catalog is unchanged by the calls above.
    let listed = session.request("tools/list", None).await;
    let again: ListToolsResult = serde_json::from_value(listed.result.unwrap()).unwrap();
    assert_eq!(again.tools.len(), 3);

    drop(session);
    timeout(TIMEOUT, handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_line_does_not_stop_the_server() {
    let stub = Arc::new(StubRunner::new());
    let (mut session, handle) = start(&Config::default(), stub);

    session.client.send("this is not json").await.unwrap();
    let line = timeout(TIMEOUT, session.client.receive())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
    assert_eq!(resp.error.unwrap().code, -32700);

    let pong = session.request("ping", None).await;
    assert_eq!(pong.result, Some(json!({})));

    drop(session);
    timeout(TIMEOUT, handle).await.unwrap().unwrap();
}
