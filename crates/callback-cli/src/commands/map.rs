//! Map command - transform values in place with a unary callback

use crate::builtins::lookup;
use crate::commands::print_json;
use anyhow::Result;
use callback_bridge::Bridge;

pub fn run(bridge: &Bridge, function: &str, mut values: Vec<f64>, json: bool) -> Result<()> {
    let callback = lookup(function)?.callback.as_unary()?;

    bridge.map_array(&callback, &mut values);

    if json {
        return print_json(&values);
    }

    let line: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    println!("{}", line.join(" "));
    Ok(())
}
