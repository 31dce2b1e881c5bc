//! Structured description of a relation that did not hold.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::DiagnosticsConfig;
use crate::formatter::{inspect, line_diff};
use crate::value::Value;

/// Custom rendering for the `actual`/`expected` values of a [`Failure`].
pub type ValueFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// A relation did not hold.
///
/// Implementations build these to describe *why* a relation failed; the
/// dispatcher fills in whatever they leave out (the message, the actual value,
/// the assertion id) before raising it.
#[derive(Clone, Error)]
pub struct Failure {
    /// Id of the assertion that failed, once known.
    pub assertion: Option<String>,
    /// Human-readable description. Empty means "describe the call".
    pub message: String,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    /// Pre-rendered diff supplied by the implementation.
    pub diff: Option<String>,
    /// Whether this failure comes from a negated call that unexpectedly held.
    pub negated: bool,
    formatter: Option<ValueFormatter>,
    diagnostics: DiagnosticsConfig,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            assertion: None,
            message: message.into(),
            actual: None,
            expected: None,
            diff: None,
            negated: false,
            formatter: None,
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// A failure without a message; the dispatcher describes the call instead.
    pub fn unmet() -> Self {
        Self::new(String::new())
    }

    pub fn with_actual(mut self, actual: impl Into<Value>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    /// Render `actual` and `expected` with `formatter` instead of [`inspect`].
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub(crate) fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn has_custom_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    fn format_value(&self, value: &Value, config: &DiagnosticsConfig) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => inspect(value, config),
        }
    }

    /// Render the full diagnostic: message, values, then any diff.
    pub fn render(&self, config: &DiagnosticsConfig) -> String {
        let mut lines = Vec::new();
        if self.message.is_empty() {
            lines.push("assertion failed".to_string());
        } else {
            lines.push(self.message.clone());
        }
        if let Some(actual) = &self.actual {
            lines.push(format!("  actual: {}", self.format_value(actual, config)));
        }
        if let Some(expected) = &self.expected {
            lines.push(format!("  expected: {}", self.format_value(expected, config)));
        }
        if config.show_diff {
            let diff = self.diff.clone().or_else(|| self.text_diff(config));
            if let Some(diff) = diff {
                lines.push(String::new());
                lines.extend(diff.lines().map(|line| format!("  {}", line)));
            }
        }
        lines.join("\n")
    }

    fn text_diff(&self, config: &DiagnosticsConfig) -> Option<String> {
        match (&self.expected, &self.actual) {
            (Some(Value::Str(expected)), Some(Value::Str(actual)))
                if expected.contains('\n') || actual.contains('\n') =>
            {
                Some(line_diff(expected, actual, config.diff_context))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.diagnostics))
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("assertion", &self.assertion)
            .field("message", &self.message)
            .field("actual", &self.actual)
            .field("expected", &self.expected)
            .field("diff", &self.diff)
            .field("negated", &self.negated)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}
