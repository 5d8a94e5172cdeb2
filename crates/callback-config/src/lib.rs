//! Callback Bridge Configuration
//!
//! Provides configuration for the callback bridge:
//! - Bridge configuration (bridge.toml)
//! - Global user configuration (~/.callback-bridge/config.toml)
//! - Environment variable overrides
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.callback-bridge/config.toml)
//! 3. Project config (./bridge.toml, searched upward)
//! 4. Environment variables (CALLBACK_BRIDGE_*, NO_COLOR)
//! 5. CLI flags (handled by caller)
//!
//! # Example
//!
//! ```no_run
//! use callback_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! assert!(config.derivative_epsilon() > 0.0);
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "bridge.toml";

/// Default threshold below which a derivative is treated as zero
pub const DEFAULT_DERIVATIVE_EPSILON: f64 = 1e-10;

/// Default step size below which Newton iteration is considered converged
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::ConfigLoader;
pub use settings::{BridgeConfig, ColorMode, DiagnosticsConfig, RootFindingConfig};
