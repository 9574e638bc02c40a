//! Engine configuration: resource bounds for one document's check.
//!
//! The checker's state is proportional to open-element depth and to the
//! active cell set of the current table, both of which pathological input
//! can inflate without bound. These limits turn that into a deterministic
//! [`CheckError`](crate::CheckError) instead of unbounded growth.

use serde::{Deserialize, Serialize};

/// Per-checker resource limits, loadable from a small TOML table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CheckerConfig {
    /// Maximum open-element nesting depth before the document is rejected.
    pub max_depth: usize,
    /// Maximum number of rows processed in a single table.
    pub max_table_rows: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            // Browsers cap parser nesting around 512; we allow well past that
            // so only pathological input trips the limit.
            max_depth: 4096,
            max_table_rows: 65536,
        }
    }
}

impl CheckerConfig {
    /// Parse a config from TOML text, e.g. `max-depth = 256`.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
