use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod builtins;
mod commands;

/// Drive host callbacks through the callback bridge.
///
/// Every function name refers to a built-in `extern "C"` function, passed to
/// the bridge as a raw function pointer exactly as a C host would.
///
/// EXAMPLES:
///     callback-bridge self-test                 Run the library self-test
///     callback-bridge invoke double 21          Call a unary callback
///     callback-bridge integrate square --from 0 --to 1 --steps 1000
///     callback-bridge root square_minus_two --x0 1
///     callback-bridge functions                 List built-in functions
///
/// ENVIRONMENT VARIABLES:
///     CALLBACK_BRIDGE_JSON   Set to '1' for JSON output by default
///     CALLBACK_BRIDGE_TRACE  Set to '0' to disable call tracing
///     CALLBACK_BRIDGE_COLOR  auto, always or never
///     NO_COLOR               Set to disable colored output
#[derive(Parser)]
#[command(name = "callback-bridge")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a bridge.toml (default: search upward from the current directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the library self-test
    ///
    /// Checks the classic 21 * 2 and 15 + 27 calls plus one case per
    /// algorithm. Exits non-zero if any case fails.
    #[command(visible_alias = "t")]
    SelfTest {
        /// Output the report as JSON
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Invoke a built-in function through its declared shape
    ///
    /// EXAMPLES:
    ///     callback-bridge invoke double 21
    ///     callback-bridge invoke add 15 27
    ///     callback-bridge invoke answer
    #[command(visible_alias = "i", allow_negative_numbers = true)]
    Invoke {
        /// Built-in function name
        function: String,
        /// Arguments, parsed according to the function's parameter types
        args: Vec<String>,
        /// Output the result as JSON
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Map a unary function over values
    #[command(allow_negative_numbers = true)]
    Map {
        /// Built-in unary double function
        function: String,
        /// Values to transform, in order
        values: Vec<f64>,
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Integrate a unary function with the trapezoidal rule
    #[command(allow_negative_numbers = true)]
    Integrate {
        /// Built-in unary double function
        function: String,
        /// Lower bound
        #[arg(long)]
        from: f64,
        /// Upper bound
        #[arg(long)]
        to: f64,
        /// Number of trapezoids
        #[arg(long, default_value = "100")]
        steps: i32,
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Find a root with Newton-Raphson
    ///
    /// Uses the function's built-in derivative unless --derivative names one.
    #[command(allow_negative_numbers = true)]
    Root {
        /// Built-in unary double function
        function: String,
        /// Initial guess
        #[arg(long, default_value = "0")]
        x0: f64,
        /// Maximum number of iterations
        #[arg(long, default_value = "50")]
        max_iter: i32,
        /// Built-in function to use as the derivative
        #[arg(long, short = 'd')]
        derivative: Option<String>,
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Sum an int function over 0..count
    #[command(allow_negative_numbers = true)]
    Sum {
        /// Built-in int function
        function: String,
        /// Number of calls
        #[arg(long)]
        count: i32,
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// Call a unary function, substituting -1 for NaN or infinity
    #[command(allow_negative_numbers = true)]
    Validate {
        /// Built-in unary double function
        function: String,
        /// Argument
        value: f64,
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },

    /// List built-in functions and their shapes
    #[command(visible_alias = "ls")]
    Functions {
        #[arg(long, env = "CALLBACK_BRIDGE_JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::SelfTest { json } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::self_test::run(&bridge, json)?;
        }
        Commands::Invoke {
            function,
            args,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::invoke::run(&bridge, &function, &args, json)?;
        }
        Commands::Map {
            function,
            values,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::map::run(&bridge, &function, values, json)?;
        }
        Commands::Integrate {
            function,
            from,
            to,
            steps,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::integrate::run(&bridge, &function, from, to, steps, json)?;
        }
        Commands::Root {
            function,
            x0,
            max_iter,
            derivative,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            let args = commands::root::RootArgs {
                function,
                derivative,
                x0,
                max_iter,
            };
            commands::root::run(&bridge, &args, json)?;
        }
        Commands::Sum {
            function,
            count,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::sum::run(&bridge, &function, count, json)?;
        }
        Commands::Validate {
            function,
            value,
            json,
        } => {
            let bridge = commands::load_bridge(config, json)?;
            commands::validate::run(&bridge, &function, value, json)?;
        }
        Commands::Functions { json } => {
            commands::functions::run(json)?;
        }
    }

    Ok(())
}
