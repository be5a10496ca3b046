//! Error types for accelerator construction and configuration.

use strata_core::MeshError;
use strata_math::Float;
use thiserror::Error;

/// Errors raised while building an accelerator.
///
/// Any error aborts the build; the accelerator is left empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Primitive {primitive} has invalid mesh data: {source}")]
    InvalidMesh {
        primitive: usize,
        #[source]
        source: MeshError,
    },
}

/// Result type for accelerator builds.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while loading or validating an [`AccelConfig`](crate::AccelConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse accelerator config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Leaf size must be at least 2, got {0}")]
    LeafSize(usize),

    #[error("Bound epsilon must be finite and non-negative, got {0}")]
    Epsilon(Float),
}
