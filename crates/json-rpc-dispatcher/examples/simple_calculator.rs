//! Simple Calculator JSON-RPC Example
//!
//! Registers `add` and `subtract` with a shared parameter-checking stage in front of
//! each, subscribes to the dispatcher's lifecycle events, and runs a few requests
//! (including a batch and a notification) through `handle_message`.

use json_rpc_dispatcher::prelude::*;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

const NOT_A_NUMBER: i64 = 1;

/// First stage: make sure `a` and `b` are numbers and pass them on as a pair
fn operands() -> BoxedHandler {
    sync_fn(|params| {
        let a = params.get("a").and_then(Value::as_f64);
        let b = params.get("b").and_then(Value::as_f64);
        match (a, b) {
            (Some(a), Some(b)) => Ok(json!([a, b])),
            _ => Err(MethodError::new(NOT_A_NUMBER)),
        }
    })
}

fn apply(op: fn(f64, f64) -> f64) -> BoxedHandler {
    handler_fn(move |pair: Value| async move {
        let a = pair[0].as_f64().ok_or_else(MethodError::internal_error)?;
        let b = pair[1].as_f64().ok_or_else(MethodError::internal_error)?;
        Ok(json!({ "result": op(a, b) }))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dispatcher = JsonRpcDispatcher::builder()
        .custom_error(NOT_A_NUMBER, "Operands must be numbers")
        .method("add", [operands(), apply(|a, b| a + b)])
        .method("subtract", [operands(), apply(|a, b| a - b)])
        .build()?;

    dispatcher.events().on(EventKind::Request, |event| {
        if let DispatchEvent::Request(call) = event {
            info!(method = %call["method"], "request");
        }
    });

    let test_requests = [
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"a": 10, "b": 4}, "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": {"a": 2, "b": 3}, "id": 3}"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": "invalid", "b": 5}, "id": 4}"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 1}}"#,
        r#"[
            {"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 2}, "id": 5},
            {"jsonrpc": "2.0", "method": "subtract", "params": {"a": 1, "b": 2}, "id": 6}
        ]"#,
        r#"{"jsonrpc": "2.0", "method""#,
    ];

    for (i, request) in test_requests.iter().enumerate() {
        println!("--- Test {} ---", i + 1);
        println!("Request:  {}", request);
        match dispatcher.handle_message(request).await? {
            Some(response) => println!("Response: {}", response),
            None => println!("Response: (none, notification)"),
        }
    }

    Ok(())
}
