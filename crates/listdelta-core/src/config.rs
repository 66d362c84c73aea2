//! Accumulator configuration.
//!
//! Controls how long the accumulator stays on the linear block list before
//! migrating to the tree. Neither setting changes observable results.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default ceiling on linear blocks before migrating to the tree.
pub const DEFAULT_LINEAR_BLOCK_LIMIT: usize = 64;

/// Tuning knobs for [`EditAccumulator`](crate::EditAccumulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Maximum number of blocks the linear representation may hold.
    pub linear_block_limit: usize,
    /// Start each batch on the linear representation. When false every
    /// batch goes straight to the tree.
    pub prefer_linear: bool,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            linear_block_limit: DEFAULT_LINEAR_BLOCK_LIMIT,
            prefer_linear: true,
        }
    }
}

impl DeltaConfig {
    /// Configuration that always uses the tree.
    pub fn tree_only() -> Self {
        Self {
            prefer_linear: false,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DeltaError::Config` if the text is not a valid configuration object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeltaError;

    #[test]
    fn test_defaults() {
        let config = DeltaConfig::default();
        assert_eq!(config.linear_block_limit, DEFAULT_LINEAR_BLOCK_LIMIT);
        assert!(config.prefer_linear);
        assert!(!DeltaConfig::tree_only().prefer_linear);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DeltaConfig::from_json_str(r#"{"linear_block_limit": 4}"#).unwrap();
        assert_eq!(config.linear_block_limit, 4);
        assert!(config.prefer_linear);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = DeltaConfig::from_json_str(r#"{"prefer_linear": "yes"}"#).unwrap_err();
        assert!(matches!(err, DeltaError::Config { .. }));
    }
}
