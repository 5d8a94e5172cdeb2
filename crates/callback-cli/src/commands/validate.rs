//! Validate command - call a unary callback, rejecting NaN and infinity

use crate::builtins::lookup;
use crate::commands::print_json;
use anyhow::Result;
use callback_bridge::{Bridge, INVALID_RESULT_SENTINEL};
use serde_json::json;

pub fn run(bridge: &Bridge, function: &str, value: f64, json: bool) -> Result<()> {
    let callback = lookup(function)?.callback.as_unary()?;

    // The bridge has already reported the invalid value
    let (result, valid) = match bridge.try_call_with_validation(&callback, value) {
        Ok(result) => (result, true),
        Err(_) => (INVALID_RESULT_SENTINEL, false),
    };

    if json {
        return print_json(&json!({
            "function": function,
            "value": value,
            "result": result,
            "valid": valid,
        }));
    }

    println!("{}", result);
    Ok(())
}
