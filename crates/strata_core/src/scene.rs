//! Scene types consumed by the accelerators.
//!
//! A scene is a flat list of primitives. Accelerators refer to primitives only
//! by their index in that list, so the scene can be dropped or rebuilt
//! independently as long as the accelerator is rebuilt with it.

use std::sync::Arc;

use strata_math::{Aabb, Mat3, Mat4, Mat4Ext};

use crate::mesh::Mesh;

/// A mesh placed in the world by a single static transform.
///
/// The mesh handle may be absent; such primitives contribute no geometry.
#[derive(Clone, Debug)]
pub struct Primitive {
    /// Primitive name (for diagnostics)
    pub name: String,

    /// Shared mesh geometry
    pub mesh: Option<Arc<Mesh>>,

    /// Object-to-world transform
    transform: Mat4,

    /// Cached inverse-transpose of the upper 3x3 of `transform`
    normal_transform: Mat3,
}

impl Primitive {
    /// Create a primitive from a mesh and its object-to-world transform.
    pub fn new(mesh: Arc<Mesh>, transform: Mat4) -> Self {
        Self::from_parts(Some(mesh), transform)
    }

    /// Create a primitive with no geometry attached.
    pub fn without_mesh(transform: Mat4) -> Self {
        Self::from_parts(None, transform)
    }

    fn from_parts(mesh: Option<Arc<Mesh>>, transform: Mat4) -> Self {
        Self {
            name: String::new(),
            mesh,
            transform,
            normal_transform: transform.normal_matrix(),
        }
    }

    /// Set the primitive name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Object-to-world transform, applied to positions (w=1) and tangents (w=0).
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Transform for normals (inverse-transpose of the linear part).
    pub fn normal_transform(&self) -> &Mat3 {
        &self.normal_transform
    }

    /// Replace the transform. The accelerator must be rebuilt afterwards.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.normal_transform = transform.normal_matrix();
    }

    /// Number of faces contributed to the scene.
    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |mesh| mesh.triangle_count())
    }

    /// World-space bound of the mesh (empty without a mesh).
    pub fn world_bounds(&self) -> Aabb {
        match &self.mesh {
            Some(mesh) => self.transform.transform_aabb(&mesh.bounds),
            None => Aabb::EMPTY,
        }
    }
}

/// A complete scene: the insertion-ordered list of primitives.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Primitives in insertion order; indices are stable identifiers
    pub primitives: Vec<Primitive>,

    /// Scene name (usually from filename)
    pub name: String,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a primitive to the scene and return its index.
    pub fn add_primitive(&mut self, primitive: Primitive) -> usize {
        let index = self.primitives.len();
        self.primitives.push(primitive);
        index
    }

    /// Get a primitive by index.
    pub fn primitive(&self, index: usize) -> Option<&Primitive> {
        self.primitives.get(index)
    }

    /// Get primitive count.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Get total triangle count across all primitives.
    pub fn total_triangle_count(&self) -> usize {
        self.primitives.iter().map(Primitive::triangle_count).sum()
    }

    /// Compute the world-space bounding box of all primitives.
    pub fn world_bounds(&self) -> Aabb {
        self.primitives
            .iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::union(&acc, &p.world_bounds()))
    }
}
