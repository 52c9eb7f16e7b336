//! Per-build synthesis report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary of one adapter synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Interface name.
    pub interface: String,
    /// Handler identifier.
    pub handler: String,
    /// Operations compiled to direct dispatch.
    pub direct_ops: usize,
    /// Operations deferring to the generic invoker.
    pub generic_ops: usize,
    /// Operations without a binding for this handler.
    pub unimplemented_ops: usize,
    /// Synthesis duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildReport {
    /// Total number of operations in the adapter.
    pub fn total_ops(&self) -> usize {
        self.direct_ops + self.generic_ops + self.unimplemented_ops
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Adapter Build Report ===")?;
        writeln!(f, "Interface: {}", self.interface)?;
        writeln!(f, "Handler: {}", self.handler)?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;
        writeln!(
            f,
            "Operations: {} total ({} direct, {} generic, {} unimplemented)",
            self.total_ops(),
            self.direct_ops,
            self.generic_ops,
            self.unimplemented_ops,
        )
    }
}
