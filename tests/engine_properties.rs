//! Properties that hold for every capability the engine dispatches to.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use toolhost_mcp::capability::{
    Arguments, CapabilityKind, Content, InputSchema, Outcome, RegistryBuilder, ToolDescriptor,
    ToolResult, ValueType,
};
use toolhost_mcp::engine::{Engine, InvocationRequest};
use toolhost_mcp::error::{ErrorCode, InvocationError};

fn sample(value_type: ValueType) -> Value {
    match value_type {
        ValueType::String => json!("sample"),
        ValueType::Number => json!(1.5),
        ValueType::Integer => json!(2),
        ValueType::Boolean => json!(true),
        ValueType::Object => json!({"key": "value"}),
        ValueType::Array => json!([1, 2]),
    }
}

fn valid_arguments(schema: &InputSchema) -> Arguments {
    schema
        .properties()
        .iter()
        .map(|(name, property)| (name.clone(), sample(property.value_type)))
        .collect()
}

#[test]
fn every_tool_succeeds_on_valid_arguments() {
    let engine = common::engine();

    for tool in engine.registry().tools() {
        if tool.name == "fail" {
            continue;
        }
        let request = InvocationRequest::tool(&tool.name, valid_arguments(&tool.input_schema));
        match engine.invoke(&request) {
            Ok(Outcome::Tool(outcome)) => assert!(!outcome.content.is_empty(), "{}", tool.name),
            other => panic!("{} returned {other:?}", tool.name),
        }
    }
}

#[test]
fn unknown_names_are_unknown_capability() {
    let engine = common::engine();
    let requests = [
        InvocationRequest::tool("ghost", Arguments::new()),
        InvocationRequest::resource("server://ghost"),
        InvocationRequest::prompt("ghost", Arguments::new()),
    ];

    for request in requests {
        let err = engine.invoke(&request).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownCapability, "{:?}", request.kind);
    }
}

#[test]
fn omitting_a_required_field_names_it() {
    let engine = common::engine();

    for tool in engine.registry().tools() {
        let schema = &tool.input_schema;
        for name in schema.properties().keys().filter(|n| schema.is_required(n)) {
            let mut arguments = valid_arguments(schema);
            arguments.remove(name);

            let err = engine
                .invoke(&InvocationRequest::tool(&tool.name, arguments))
                .unwrap_err();
            match err {
                InvocationError::InvalidArguments { field, .. } => assert_eq!(&field, name),
                other => panic!("expected InvalidArguments, got {other:?}"),
            }
        }
    }
}

#[test]
fn listing_is_stable() {
    let engine = common::engine();

    for kind in CapabilityKind::ALL {
        let first = serde_json::to_value(engine.list(kind)).unwrap();
        let second = serde_json::to_value(engine.list(kind)).unwrap();
        assert_eq!(first, second, "{kind}");
        assert_eq!(engine.list(kind).len(), engine.registry().count(kind));
    }
}

#[test]
fn handler_never_sees_invalid_arguments() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = RegistryBuilder::new();
    builder
        .register_tool(
            ToolDescriptor::new(
                "count",
                "Counts calls",
                InputSchema::new().required("n", ValueType::Integer, ""),
            ),
            move |_: &Arguments| -> ToolResult {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Content::text("counted")])
            },
        )
        .unwrap();
    let engine = Engine::new(builder.build());

    let bad = [json!({}), json!({"n": "1"}), json!({"n": 1.5}), json!({"n": null})];
    for arguments in bad {
        let arguments = arguments.as_object().cloned().unwrap();
        assert!(engine
            .invoke(&InvocationRequest::tool("count", arguments))
            .is_err());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let good = json!({"n": 1}).as_object().cloned().unwrap();
    assert!(engine.invoke(&InvocationRequest::tool("count", good)).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_invocations_share_one_engine() {
    let engine = common::engine();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let engine = &engine;
            scope.spawn(move || {
                for j in 0..50 {
                    let message = format!("{i}-{j}");
                    let arguments = json!({"message": &message}).as_object().cloned().unwrap();
                    let outcome = engine
                        .invoke(&InvocationRequest::tool("echo", arguments))
                        .unwrap();
                    let Outcome::Tool(tool) = outcome else {
                        panic!("expected a tool outcome");
                    };
                    assert_eq!(tool.content, vec![Content::text(message)]);
                }
            });
        }
    });
}
