//! Both transports must answer the same invocation with the same JSON.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

/// (stdio method, HTTP path, params)
fn invocations() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        (
            "tools/call",
            "/tools/call",
            json!({"name": "echo", "arguments": {"message": "parity"}}),
        ),
        (
            "tools/call",
            "/tools/call",
            json!({"name": "json_format", "arguments": {"value": {"k": [true, null]}, "indent": 3}}),
        ),
        ("resources/read", "/resources/read", json!({"uri": "server://about"})),
        (
            "prompts/get",
            "/prompts/get",
            json!({"name": "describe_capability", "arguments": {"name": "echo", "focus": "errors"}}),
        ),
        ("initialize", "/initialize", json!({})),
    ]
}

#[tokio::test]
async fn successful_results_match() {
    let engine = common::engine();

    for (method, path, params) in invocations() {
        let (status, http_body) = common::http_post(engine.clone(), path, &params).await;
        let reply = common::stdio_call(engine.clone(), method, &params).await;

        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(http_body, reply["result"], "{method}");
    }
}

#[tokio::test]
async fn listings_match() {
    let engine = common::engine();

    for kind in ["tools", "resources", "prompts"] {
        let (status, http_body) =
            common::http_get(engine.clone(), &format!("/{kind}/list")).await;
        let reply = common::stdio_call(engine.clone(), &format!("{kind}/list"), &json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(http_body, reply["result"][kind], "{kind}");
    }
}

#[tokio::test]
async fn error_codes_match() {
    let engine = common::engine();
    let cases = [
        ("tools/call", "/tools/call", json!({"name": "ghost"}), 404, -32601),
        ("tools/call", "/tools/call", json!({"name": "echo"}), 400, -32602),
        ("tools/call", "/tools/call", json!({"name": "fail"}), 500, -32603),
        (
            "tools/call",
            "/tools/call",
            json!({"name": "json_format", "arguments": {"value": {}, "indent": 99}}),
            500,
            -32603,
        ),
        ("resources/read", "/resources/read", json!({}), 400, -32602),
        (
            "prompts/get",
            "/prompts/get",
            json!({"name": "describe_capability", "arguments": {"name": 1}}),
            400,
            -32602,
        ),
    ];

    for (method, path, params, http_status, rpc_code) in cases {
        let (status, http_body) = common::http_post(engine.clone(), path, &params).await;
        let reply = common::stdio_call(engine.clone(), method, &params).await;

        assert_eq!(status.as_u16(), http_status, "{params}");
        assert_eq!(reply["error"]["code"], rpc_code, "{params}");
        assert_eq!(
            http_body["error"]["code"], reply["error"]["data"]["code"],
            "{params}"
        );
        assert_eq!(
            http_body["error"]["message"], reply["error"]["message"],
            "{params}"
        );
    }
}
