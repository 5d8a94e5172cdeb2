//! Diagnostic stream for callback tracing
//!
//! Every direct invocation is observable through a `DiagnosticSink` that the
//! caller injects into the bridge. Sinks observe; they never influence the
//! values the bridge returns.

use crate::shape::{CValue, CallShape};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Call tracing
    Trace,
    /// Invalid results and rejected boundary input
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Trace => f.write_str("TRACE"),
            DiagnosticLevel::Error => f.write_str("ERROR"),
        }
    }
}

/// Diagnostic event types
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// About to call a host callback
    Invoked { shape: CallShape, args: Vec<CValue> },
    /// Host callback returned
    Returned { shape: CallShape, result: CValue },
    /// Array mapping started
    MapStarted { length: usize },
    /// Validation wrapper saw NaN or infinity
    InvalidResult { value: f64 },
    /// Boundary input refused before any callback ran
    Rejected { operation: String, reason: String },
}

impl DiagnosticEvent {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            DiagnosticEvent::Invoked { .. }
            | DiagnosticEvent::Returned { .. }
            | DiagnosticEvent::MapStarted { .. } => DiagnosticLevel::Trace,
            DiagnosticEvent::InvalidResult { .. } | DiagnosticEvent::Rejected { .. } => {
                DiagnosticLevel::Error
            }
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::Invoked { shape, args } => match shape {
                CallShape::Nullary => write!(f, "Calling simple callback"),
                CallShape::VoidUnary => {
                    write!(f, "Calling void callback with {}", join_values(args))
                }
                _ => write!(f, "Calling callback with {}", join_values(args)),
            },
            DiagnosticEvent::Returned { shape, result } => match shape {
                CallShape::VoidUnary => write!(f, "Void callback completed"),
                _ => write!(f, "Callback returned {}", result),
            },
            DiagnosticEvent::MapStarted { length } => {
                write!(f, "Mapping over array of {} elements", length)
            }
            DiagnosticEvent::InvalidResult { value } => {
                write!(f, "Callback returned invalid result ({})", value)
            }
            DiagnosticEvent::Rejected { operation, reason } => {
                write!(f, "{} rejected: {}", operation, reason)
            }
        }
    }
}

fn join_values(values: &[CValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Diagnostic log entry with timestamp
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub timestamp: DateTime<Utc>,
    pub event: DiagnosticEvent,
}

impl DiagnosticEntry {
    /// Create a new entry stamped with the current time
    pub fn new(event: DiagnosticEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    /// Format as log line
    pub fn to_log_line(&self) -> String {
        format!(
            "[{}] {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.event.level(),
            self.event
        )
    }
}

/// Diagnostic sink trait for swappable backends
pub trait DiagnosticSink: Send + Sync {
    /// Record an event
    fn log(&self, event: DiagnosticEvent);

    /// Whether events of `level` are recorded at all
    ///
    /// Lets the bridge skip building events nobody will see.
    fn enabled(&self, level: DiagnosticLevel) -> bool {
        let _ = level;
        true
    }

    /// Get all recorded entries (for testing)
    fn entries(&self) -> Vec<DiagnosticEntry>;

    /// Clear all recorded entries (for testing)
    fn clear(&self);
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<DiagnosticEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Rendered messages, in the order they were logged
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|entry| entry.event.to_string())
            .collect()
    }

    /// Logged events, in order
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.entries().into_iter().map(|entry| entry.event).collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn log(&self, event: DiagnosticEvent) {
        let entry = DiagnosticEntry::new(event);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Null sink (no-op)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _event: DiagnosticEvent) {
        // No-op
    }

    fn enabled(&self, _level: DiagnosticLevel) -> bool {
        false
    }

    fn entries(&self) -> Vec<DiagnosticEntry> {
        Vec::new()
    }

    fn clear(&self) {
        // No-op
    }
}

/// Terminal sink: trace lines to stdout, errors to stderr in red
#[derive(Debug, Clone, Copy)]
pub struct StreamSink {
    min_level: DiagnosticLevel,
    color: ColorChoice,
}

impl StreamSink {
    pub fn new(min_level: DiagnosticLevel, color: ColorChoice) -> Self {
        Self { min_level, color }
    }
}

impl Default for StreamSink {
    fn default() -> Self {
        Self::new(DiagnosticLevel::Trace, ColorChoice::Auto)
    }
}

impl DiagnosticSink for StreamSink {
    fn log(&self, event: DiagnosticEvent) {
        let level = event.level();
        if !self.enabled(level) {
            return;
        }

        // Diagnostic output is advisory: write failures are ignored
        match level {
            DiagnosticLevel::Trace => {
                let mut out = StandardStream::stdout(self.color);
                let _ = writeln!(out, "{}", event);
            }
            DiagnosticLevel::Error => {
                let mut err = StandardStream::stderr(self.color);
                let _ = err.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
                let _ = write!(err, "error");
                let _ = err.reset();
                let _ = writeln!(err, ": {}", event);
            }
        }
    }

    fn enabled(&self, level: DiagnosticLevel) -> bool {
        level >= self.min_level
    }

    fn entries(&self) -> Vec<DiagnosticEntry> {
        Vec::new()
    }

    fn clear(&self) {
        // Nothing retained
    }
}
