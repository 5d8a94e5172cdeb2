//! Functions command - list built-in host functions

use crate::builtins::registry;
use crate::commands::print_json;
use anyhow::Result;
use serde_json::json;

pub fn run(json: bool) -> Result<()> {
    let builtins = registry();

    if json {
        let entries: Vec<_> = builtins
            .iter()
            .map(|builtin| {
                json!({
                    "name": builtin.name,
                    "shape": builtin.shape(),
                    "signature": builtin.shape().signature_key(),
                    "c_typedef": builtin.shape().c_typedef(),
                    "summary": builtin.summary,
                    "has_derivative": builtin.derivative.is_some(),
                })
            })
            .collect();
        return print_json(&entries);
    }

    for builtin in &builtins {
        println!(
            "{:<18} {:<14} {}",
            builtin.name,
            builtin.shape().display_name(),
            builtin.summary
        );
    }
    Ok(())
}
