//! Dispatcher configuration.
//!
//! Configuration only shapes diagnostics; it never changes which assertion a
//! call matches or whether it passes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigLoadError;

/// Top-level configuration, loadable from TOML.
///
/// ```toml
/// [diagnostics]
/// max_width = 80
/// show_diff = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    pub diagnostics: DiagnosticsConfig,
}

/// How values and failures are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Maximum display width of a single rendered value (0 = unlimited).
    pub max_width: usize,
    /// Nesting depth beyond which lists and maps are elided.
    pub max_depth: usize,
    /// Append diffs to failures that have one.
    pub show_diff: bool,
    /// Unchanged lines kept around each diff hunk.
    pub diff_context: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_width: 120,
            max_depth: 4,
            show_diff: true,
            diff_context: 3,
        }
    }
}

impl AssertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short single-line values, no diffs.
    pub fn compact() -> Self {
        Self {
            diagnostics: DiagnosticsConfig {
                max_width: 60,
                max_depth: 2,
                show_diff: false,
                diff_context: 0,
            },
        }
    }

    /// Untruncated values and wide diff context.
    pub fn verbose() -> Self {
        Self {
            diagnostics: DiagnosticsConfig {
                max_width: 0,
                max_depth: 16,
                show_diff: true,
                diff_context: 5,
            },
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigLoadError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
