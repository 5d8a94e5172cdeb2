//! Integrate command - trapezoidal rule over a built-in

use crate::builtins::lookup;
use crate::commands::print_json;
use anyhow::Result;
use callback_bridge::Bridge;
use serde_json::json;

pub fn run(bridge: &Bridge, function: &str, from: f64, to: f64, steps: i32, json: bool) -> Result<()> {
    let callback = lookup(function)?.callback.as_unary()?;

    let area = bridge.integrate(&callback, from, to, steps)?;

    if json {
        return print_json(&json!({
            "function": function,
            "from": from,
            "to": to,
            "steps": steps,
            "result": area,
        }));
    }

    println!("{}", area);
    Ok(())
}
