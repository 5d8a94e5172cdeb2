pub mod functions;
pub mod integrate;
pub mod invoke;
pub mod map;
pub mod root;
pub mod sum;
pub mod validate;

use anyhow::{Context, Result};
use callback_bridge::{Bridge, CValue};
use callback_config::ConfigLoader;
use serde_json::Value;
use std::path::Path;

/// Build the bridge from configuration
///
/// JSON output turns call tracing off so stdout stays machine-readable.
pub fn load_bridge(config_path: Option<&Path>, json: bool) -> Result<Bridge> {
    let mut loader = ConfigLoader::new();
    let mut config = match config_path {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => loader
            .load_from_directory(&std::env::current_dir()?)
            .context("Failed to load configuration")?,
    };

    if json {
        config.set_trace(false);
    }

    Ok(Bridge::from_config(&config))
}

/// Print a value as pretty JSON
pub fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON form of a boundary value (non-finite doubles become null)
pub fn value_json(value: CValue) -> Value {
    match value {
        CValue::Int(i) => Value::from(i),
        CValue::Double(d) => Value::from(d),
        CValue::Void => Value::Null,
    }
}
