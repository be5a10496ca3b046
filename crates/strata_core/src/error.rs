//! Mesh validation errors.

use thiserror::Error;

/// Errors describing malformed mesh data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Flat {name} array has length {len}, which is not a multiple of 3")]
    FlatArrayLength { name: &'static str, len: usize },

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh has {found} {attribute} for {expected} vertices")]
    AttributeCount {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
