//! Root command - Newton-Raphson over a built-in

use crate::builtins::lookup;
use crate::commands::print_json;
use anyhow::{anyhow, Result};
use callback_bridge::{Bridge, RootTermination};

/// Arguments for the root command
#[derive(Debug, Clone)]
pub struct RootArgs {
    pub function: String,
    /// Explicit derivative; defaults to the function's built-in one
    pub derivative: Option<String>,
    pub x0: f64,
    pub max_iter: i32,
}

pub fn run(bridge: &Bridge, args: &RootArgs, json: bool) -> Result<()> {
    let builtin = lookup(&args.function)?;
    let f = builtin.callback.as_unary()?;

    let df = match &args.derivative {
        Some(name) => lookup(name)?.callback.as_unary()?,
        None => builtin.derivative.ok_or_else(|| {
            anyhow!(
                "'{}' has no built-in derivative; pass --derivative <function>",
                args.function
            )
        })?,
    };

    let report = bridge.find_root_report(&f, &df, args.x0, args.max_iter);

    if json {
        return print_json(&report);
    }

    let reason = match report.termination {
        RootTermination::Converged => "converged",
        RootTermination::FlatDerivative => "flat derivative",
        RootTermination::IterationLimit => "iteration limit",
    };
    println!(
        "{} ({} after {} iteration(s))",
        report.root, reason, report.iterations
    );
    Ok(())
}
