//! Schema construction options.

use serde::{Deserialize, Serialize};

/// Knobs for how a schema batch is validated and executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Reject columns whose type has no SQL keyword instead of emitting an
    /// empty type token.
    pub strict_types: bool,
    /// Run the whole batch inside one transaction and roll it back on the
    /// first failure. Off by default: statements already executed stay
    /// applied when a later one fails.
    pub transactional: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            strict_types: true,
            transactional: false,
        }
    }
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict type checking.
    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Set all-or-nothing batch execution.
    pub fn transactional(mut self, transactional: bool) -> Self {
        self.transactional = transactional;
        self
    }
}
