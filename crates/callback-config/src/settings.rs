//! Bridge Configuration (bridge.toml)
//!
//! Handles the settings file shared by the global (`~/.callback-bridge/config.toml`)
//! and project (`bridge.toml`) layers. Every field is optional; accessors fall back
//! to the built-in defaults.

use crate::{ConfigError, ConfigResult, DEFAULT_CONVERGENCE_TOLERANCE, DEFAULT_DERIVATIVE_EPSILON};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bridge configuration from bridge.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Diagnostic stream settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsConfig>,

    /// Newton-Raphson thresholds
    #[serde(skip_serializing_if = "Option::is_none", rename = "root-finding")]
    pub root_finding: Option<RootFindingConfig>,
}

/// Diagnostic stream settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Trace every direct callback invocation (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,

    /// Colored output for the diagnostic stream (default: auto)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorMode>,
}

/// Color preference for diagnostic output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Parse a color mode from its lowercase name
    pub fn parse(value: &str) -> ConfigResult<Self> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(ConfigError::InvalidValue {
                field: "diagnostics.color".to_string(),
                reason: format!("must be 'auto', 'always', or 'never', got '{}'", other),
            }),
        }
    }
}

/// Newton-Raphson thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RootFindingConfig {
    /// Derivative magnitude treated as zero (default: 1e-10)
    #[serde(skip_serializing_if = "Option::is_none", rename = "derivative-epsilon")]
    pub derivative_epsilon: Option<f64>,

    /// Step size treated as converged (default: 1e-10)
    #[serde(skip_serializing_if = "Option::is_none", rename = "convergence-tolerance")]
    pub convergence_tolerance: Option<f64>,
}

impl BridgeConfig {
    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(root) = &self.root_finding {
            if let Some(eps) = root.derivative_epsilon {
                validate_threshold("root-finding.derivative-epsilon", eps)?;
            }
            if let Some(tol) = root.convergence_tolerance {
                validate_threshold("root-finding.convergence-tolerance", tol)?;
            }
        }
        Ok(())
    }

    /// Merge another config into this one
    ///
    /// Fields set in `other` take precedence; unset fields keep their current value.
    pub fn merge(&mut self, other: &BridgeConfig) {
        if let Some(theirs) = &other.diagnostics {
            let ours = self.diagnostics.get_or_insert_with(Default::default);
            if theirs.trace.is_some() {
                ours.trace = theirs.trace;
            }
            if theirs.color.is_some() {
                ours.color = theirs.color;
            }
        }
        if let Some(theirs) = &other.root_finding {
            let ours = self.root_finding.get_or_insert_with(Default::default);
            if theirs.derivative_epsilon.is_some() {
                ours.derivative_epsilon = theirs.derivative_epsilon;
            }
            if theirs.convergence_tolerance.is_some() {
                ours.convergence_tolerance = theirs.convergence_tolerance;
            }
        }
    }

    /// Whether direct invocations are traced
    pub fn trace_enabled(&self) -> bool {
        self.diagnostics
            .as_ref()
            .and_then(|d| d.trace)
            .unwrap_or(true)
    }

    /// Override call tracing
    pub fn set_trace(&mut self, enabled: bool) {
        self.diagnostics
            .get_or_insert_with(Default::default)
            .trace = Some(enabled);
    }

    /// Effective color mode
    pub fn color_mode(&self) -> ColorMode {
        self.diagnostics
            .as_ref()
            .and_then(|d| d.color)
            .unwrap_or_default()
    }

    /// Override the color mode
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.diagnostics
            .get_or_insert_with(Default::default)
            .color = Some(mode);
    }

    /// Effective derivative epsilon
    pub fn derivative_epsilon(&self) -> f64 {
        self.root_finding
            .as_ref()
            .and_then(|r| r.derivative_epsilon)
            .unwrap_or(DEFAULT_DERIVATIVE_EPSILON)
    }

    /// Effective convergence tolerance
    pub fn convergence_tolerance(&self) -> f64 {
        self.root_finding
            .as_ref()
            .and_then(|r| r.convergence_tolerance)
            .unwrap_or(DEFAULT_CONVERGENCE_TOLERANCE)
    }
}

fn validate_threshold(field: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be a finite positive number, got {}", value),
        });
    }
    Ok(())
}
