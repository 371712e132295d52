//! Integration tests for the JSON-RPC stdio transport.
//!
//! These tests verify frame parsing, request/response handling, error
//! responses, and the behaviour of the read-dispatch-write loop.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use toolhost_mcp::capability::{Arguments, InputSchema, RegistryBuilder, ToolDescriptor, ToolResult};
use toolhost_mcp::engine::Engine;
use toolhost_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.params["clientInfo"]["name"], "test-client");
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_string_id() {
    let json = r#"{"jsonrpc": "2.0", "id": "abc", "method": "tools/list"}"#;

    if let IncomingMessage::Request(req) = parse_message(json).unwrap() {
        assert_eq!(req.id, RequestId::String("abc".to_string()));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    let err = parse_message("not valid json").unwrap_err();
    assert_eq!(err.error.code, -32700);
    assert!(err.id.is_none());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let err = parse_message(r#"{"id": 1, "method": "ping"}"#).unwrap_err();
    assert_eq!(err.error.code, -32600);
    assert_eq!(err.id, Some(RequestId::Number(1)));
}

#[test]
fn test_parse_missing_method_with_id() {
    let err = parse_message(r#"{"jsonrpc": "2.0", "id": 4}"#).unwrap_err();
    assert_eq!(err.error.code, -32601);
    assert_eq!(err.id, Some(RequestId::Number(4)));
}

// =============================================================================
// Loop Tests
// =============================================================================

#[tokio::test]
async fn test_echo_round_trip() {
    let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"echo","arguments":{"message":"hi"}}}"#;
    let frames = common::stdio_frames(common::engine(), &format!("{input}\n")).await;

    assert_eq!(
        frames,
        vec![json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "hi"}]}
        })]
    );
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let reply = common::stdio_call(
        common::engine(),
        "tools/call",
        &json!({"name": "nope", "arguments": {}}),
    )
    .await;

    assert_eq!(reply["id"], 1);
    assert_eq!(reply["error"]["code"], -32601);
    assert_eq!(reply["error"]["data"]["code"], "UnknownCapability");
}

#[tokio::test]
async fn test_missing_argument_is_invalid_params() {
    let reply = common::stdio_call(
        common::engine(),
        "tools/call",
        &json!({"name": "echo", "arguments": {}}),
    )
    .await;

    assert_eq!(reply["error"]["code"], -32602);
    assert_eq!(reply["error"]["data"]["code"], "InvalidArguments");
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .contains("message"));
}

#[tokio::test]
async fn test_handler_failure_is_internal_error() {
    let reply = common::stdio_call(common::engine(), "tools/call", &json!({"name": "fail"})).await;

    assert_eq!(reply["error"]["code"], -32603);
    assert_eq!(reply["error"]["message"], "deliberate failure");
}

#[tokio::test]
async fn test_malformed_frame_does_not_stop_loop() {
    let input = "{ this is not json\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n";
    let frames = common::stdio_frames(common::engine(), input).await;

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["error"]["code"], -32700);
    assert_eq!(frames[0].get("id"), Some(&Value::Null));
    assert_eq!(frames[1], json!({"jsonrpc": "2.0", "id": 2, "result": {}}));
}

#[tokio::test]
async fn test_pipelined_requests_answered_in_order() {
    let input = [
        r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"echo","arguments":{"message":"one"}}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":"b","method":"tools/call","params":{"name":"echo","arguments":{"message":"two"}}}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#,
    ]
    .join("\n");
    let frames = common::stdio_frames(common::engine(), &input).await;

    let ids: Vec<&Value> = frames.iter().map(|f| &f["id"]).collect();
    assert_eq!(ids, [&json!("a"), &json!("b"), &json!(3)]);
    assert_eq!(frames[0]["result"]["content"][0]["text"], "one");
    assert_eq!(frames[1]["result"]["content"][0]["text"], "two");
    assert_eq!(frames[2]["result"]["resources"][0]["uri"], "server://about");
}

#[tokio::test]
async fn test_crlf_frames_are_accepted() {
    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\r\n";
    let frames = common::stdio_frames(common::engine(), input).await;
    assert_eq!(frames, vec![json!({"jsonrpc": "2.0", "id": 1, "result": {}})]);
}

#[tokio::test]
async fn test_empty_input_ends_cleanly() {
    let frames = common::stdio_frames(common::engine(), "").await;
    assert!(frames.is_empty());
}

#[tokio::test]
async fn test_initialize_advertises_counts() {
    let reply = common::stdio_call(common::engine(), "initialize", &json!({})).await;

    let result = &reply["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "toolhost-mcp");
    assert_eq!(result["capabilities"]["tools"]["count"], 3);
    assert_eq!(result["capabilities"]["resources"]["count"], 1);
    assert_eq!(result["capabilities"]["prompts"]["count"], 1);
}

#[tokio::test]
async fn test_prompt_get_over_stdio() {
    let reply = common::stdio_call(
        common::engine(),
        "prompts/get",
        &json!({"name": "describe_capability", "arguments": {"name": "echo"}}),
    )
    .await;

    let result = &reply["result"];
    assert_eq!(result["messages"][0]["role"], "user");
    assert!(result["messages"][0]["content"]["text"]
        .as_str()
        .unwrap()
        .contains("`echo`"));
}

#[tokio::test]
async fn test_tool_call_notification_gets_no_reply() {
    let input = [
        r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"echo","arguments":{"message":"quiet"}}}"#,
        r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"fail"}}"#,
        r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#,
    ]
    .join("\n");
    let frames = common::stdio_frames(common::engine(), &input).await;

    assert_eq!(frames, vec![json!({"jsonrpc": "2.0", "id": 9, "result": {}})]);
}

#[tokio::test]
async fn test_panicking_handler_does_not_stop_loop() {
    let mut builder = RegistryBuilder::new();
    builder
        .register_tool(
            ToolDescriptor::new("explode", "Panics", InputSchema::new()),
            |_: &Arguments| -> ToolResult { panic!("boom") },
        )
        .unwrap();
    let engine = Arc::new(Engine::new(builder.build()));

    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"explode"}}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
    ]
    .join("\n");
    let frames = common::stdio_frames(engine, &input).await;

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["id"], 1);
    assert_eq!(frames[0]["error"]["code"], -32603);
    assert_eq!(frames[0]["error"]["data"]["code"], "HandlerError");
    assert_eq!(frames[0]["error"]["message"], "handler panicked: boom");
    assert_eq!(frames[1], json!({"jsonrpc": "2.0", "id": 2, "result": {}}));
}
