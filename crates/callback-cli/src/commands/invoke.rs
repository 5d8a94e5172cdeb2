//! Invoke command - call a built-in through its declared shape

use crate::builtins::lookup;
use crate::commands::{print_json, value_json};
use anyhow::{bail, Context, Result};
use callback_bridge::{Bridge, CValue, CallShape, ExternType};
use serde_json::json;

pub fn run(bridge: &Bridge, function: &str, args: &[String], json: bool) -> Result<()> {
    let builtin = lookup(function)?;
    let values = parse_args(builtin.shape(), args)
        .with_context(|| format!("Invalid arguments for '{}' ({})", function, builtin.shape()))?;

    let result = bridge.invoke_extern(&builtin.callback, &values)?;

    if json {
        return print_json(&json!({
            "function": builtin.name,
            "shape": builtin.shape(),
            "result": value_json(result),
        }));
    }

    match result {
        CValue::Int(i) => println!("{}", i),
        CValue::Double(d) => println!("{}", d),
        CValue::Void => {}
    }
    Ok(())
}

/// Parse raw arguments into boundary values for `shape`
fn parse_args(shape: CallShape, args: &[String]) -> Result<Vec<CValue>> {
    let params = shape.param_types();
    if args.len() != params.len() {
        bail!("expected {} argument(s), got {}", params.len(), args.len());
    }

    params
        .iter()
        .zip(args)
        .map(|(ty, raw)| match ty {
            ExternType::CInt => raw
                .parse::<i32>()
                .map(CValue::Int)
                .with_context(|| format!("'{}' is not an int", raw)),
            ExternType::CDouble => raw
                .parse::<f64>()
                .map(CValue::Double)
                .with_context(|| format!("'{}' is not a double", raw)),
            ExternType::CVoid => bail!("void is not a parameter type"),
        })
        .collect()
}
