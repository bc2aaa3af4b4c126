//! Walker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Walker`](crate::Walker).
///
/// The default configuration imposes no limits, so traversal follows the
/// callbacks' signals alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalkConfig {
    /// Maximum depth to traverse, counting the root's children as depth 1.
    ///
    /// Nodes at this depth are entered and left, but their children are never
    /// requested. `Some(0)` visits nothing.
    /// Default: None (no limit)
    pub max_depth: Option<usize>,
}

impl WalkConfig {
    /// Creates a new `WalkConfig` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum traversal depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Parses a configuration from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns true if children of a node at `depth` must not be requested.
    #[inline]
    pub(crate) fn stops_at(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }
}
