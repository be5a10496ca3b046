//! Strata Core - scene input for the intersection core.
//!
//! This crate provides the geometry the accelerators consume:
//!
//! - **`Mesh`**: per-vertex positions and attributes plus flat triangle indices
//! - **`Primitive`**: a mesh handle placed in the world by one static transform
//! - **`Scene`**: the insertion-ordered list of primitives
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use strata_core::{Mesh, Primitive, Scene};
//! use strata_math::{translate, Vec3};
//!
//! let mesh = Mesh::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2])?;
//! let mut scene = Scene::new("demo");
//! scene.add_primitive(Primitive::new(Arc::new(mesh), translate(Vec3::Z)));
//! println!("{} triangles", scene.total_triangle_count());
//! ```

pub mod error;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use error::{MeshError, MeshResult};
pub use mesh::Mesh;
pub use scene::{Primitive, Scene};
