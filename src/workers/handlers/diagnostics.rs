//! Test-only handlers for exercising the pool's dispatch machinery.

use std::time::Duration;

use serde_json::Value;

use super::HandlerTable;

pub(crate) const TABLE: HandlerTable = &[("ECHO", echo), ("STALL", stall), ("PANIC", panic_op)];

fn echo(payload: Value) -> Result<Value, String> {
    Ok(payload)
}

/// Block for `millis` before echoing, to force timeouts and out-of-order
/// responses.
fn stall(payload: Value) -> Result<Value, String> {
    let millis = payload.get("millis").and_then(Value::as_u64).unwrap_or(0);
    std::thread::sleep(Duration::from_millis(millis));
    Ok(payload)
}

fn panic_op(_payload: Value) -> Result<Value, String> {
    panic!("diagnostics handler asked to panic")
}
