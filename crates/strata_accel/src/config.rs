//! Accelerator configuration.

use serde::{Deserialize, Serialize};
use strata_math::Float;

use crate::error::ConfigError;

/// Which accelerator [`create_accel`](crate::create_accel) builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelKind {
    /// Median-split bounding volume hierarchy
    #[default]
    Bvh,
    /// Tests every triangle; reference for correctness checks
    Linear,
}

/// Accelerator configuration.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```ignore
/// let config = AccelConfig::from_json(r#"{ "leaf_size": 4 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelConfig {
    /// Accelerator kind
    pub kind: AccelKind,
    /// Ranges with fewer triangles than this become leaves
    pub leaf_size: usize,
    /// Padding added to every triangle bound on each axis
    pub bound_epsilon: Float,
}

impl AccelConfig {
    pub const DEFAULT_LEAF_SIZE: usize = 10;
    pub const DEFAULT_BOUND_EPSILON: Float = 1e-4;

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can produce a terminating, conservative build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaf_size < 2 {
            return Err(ConfigError::LeafSize(self.leaf_size));
        }
        if !(self.bound_epsilon.is_finite() && self.bound_epsilon >= 0.0) {
            return Err(ConfigError::Epsilon(self.bound_epsilon));
        }
        Ok(())
    }

    /// Leaf size used by a build. Values below 2 would never stop splitting.
    pub(crate) fn build_leaf_size(&self) -> usize {
        self.leaf_size.max(2)
    }

    /// Padding used by a build. Negative or non-finite values would shrink
    /// triangle bounds, so they fall back to the default.
    pub(crate) fn build_bound_epsilon(&self) -> Float {
        if self.bound_epsilon.is_finite() && self.bound_epsilon >= 0.0 {
            self.bound_epsilon
        } else {
            log::warn!(
                "Invalid bound epsilon {}, using {}",
                self.bound_epsilon,
                Self::DEFAULT_BOUND_EPSILON
            );
            Self::DEFAULT_BOUND_EPSILON
        }
    }

    /// Use a different accelerator kind.
    pub fn with_kind(mut self, kind: AccelKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use a different leaf size.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            kind: AccelKind::Bvh,
            leaf_size: Self::DEFAULT_LEAF_SIZE,
            bound_epsilon: Self::DEFAULT_BOUND_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccelConfig::default();
        assert_eq!(config.kind, AccelKind::Bvh);
        assert_eq!(config.leaf_size, 10);
        assert_eq!(config.bound_epsilon, 1e-4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = AccelConfig::from_json(r#"{ "kind": "linear" }"#).unwrap();
        assert_eq!(config.kind, AccelKind::Linear);
        assert_eq!(config.leaf_size, AccelConfig::DEFAULT_LEAF_SIZE);

        let config = AccelConfig::from_json(r#"{ "leaf_size": 4, "bound_epsilon": 0.0 }"#).unwrap();
        assert_eq!(config.kind, AccelKind::Bvh);
        assert_eq!(config.leaf_size, 4);
        assert_eq!(config.bound_epsilon, 0.0);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            AccelConfig::from_json(r#"{ "leaf_size": 1 }"#),
            Err(ConfigError::LeafSize(1))
        ));
        assert!(matches!(
            AccelConfig::from_json(r#"{ "bound_epsilon": -1.0 }"#),
            Err(ConfigError::Epsilon(_))
        ));
        assert!(matches!(
            AccelConfig::from_json(r#"{ "kind": "octree" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_build_values_are_normalised() {
        let config = AccelConfig {
            leaf_size: 0,
            bound_epsilon: -0.01,
            ..Default::default()
        };
        assert_eq!(config.build_leaf_size(), 2);
        assert_eq!(config.build_bound_epsilon(), AccelConfig::DEFAULT_BOUND_EPSILON);

        for bound_epsilon in [Float::NAN, Float::INFINITY] {
            let config = AccelConfig { bound_epsilon, ..Default::default() };
            assert_eq!(config.build_bound_epsilon(), AccelConfig::DEFAULT_BOUND_EPSILON);
        }

        let config = AccelConfig { bound_epsilon: 0.0, ..Default::default() };
        assert_eq!(config.build_bound_epsilon(), 0.0);
    }
}
