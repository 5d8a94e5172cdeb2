//! Sum command - add up an int callback over 0..count

use crate::builtins::lookup;
use crate::commands::print_json;
use anyhow::Result;
use callback_bridge::Bridge;
use serde_json::json;

pub fn run(bridge: &Bridge, function: &str, count: i32, json: bool) -> Result<()> {
    let callback = lookup(function)?.callback.as_int()?;

    let total = bridge.sum_callback_results(&callback, count);

    if json {
        return print_json(&json!({
            "function": function,
            "count": count,
            "result": total,
        }));
    }

    println!("{}", total);
    Ok(())
}
