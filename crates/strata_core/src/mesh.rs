//! Triangle mesh geometry.
//!
//! Meshes are stored in object space. Faces are counter-clockwise triplets of
//! indices into the per-vertex arrays; every optional attribute array, when
//! present, has one entry per position.

use strata_math::{safe_normalize, Aabb, Float, Vec2, Vec3};

use crate::error::{MeshError, MeshResult};

/// A mesh consisting of vertex positions, optional vertex attributes, and
/// triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional)
    pub normals: Option<Vec<Vec3>>,

    /// Vertex tangents, the object-space direction of increasing u (optional)
    pub tangents: Option<Vec<Vec3>>,

    /// UV coordinates (optional)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Object-space bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Index ranges are not checked here; see [`Mesh::validate`].
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            tangents: None,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Create a mesh from a flat position array (x, y, z per vertex) and a
    /// flat face array (three indices per face).
    pub fn from_flat(positions: &[Float], indices: &[u32]) -> MeshResult<Self> {
        let positions: &[Vec3] =
            bytemuck::try_cast_slice(positions).map_err(|_| MeshError::FlatArrayLength {
                name: "position",
                len: positions.len(),
            })?;
        if indices.len() % 3 != 0 {
            return Err(MeshError::FlatArrayLength {
                name: "index",
                len: indices.len(),
            });
        }
        Ok(Self::new(positions.to_vec(), indices.to_vec(), None))
    }

    /// Attach UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Attach vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach vertex tangents.
    pub fn with_tangents(mut self, tangents: Vec<Vec3>) -> Self {
        self.tangents = Some(tangents);
        self
    }

    /// Positions as a flat array with stride 3.
    pub fn flat_positions(&self) -> &[Float] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        positions
            .iter()
            .fold(Aabb::EMPTY, |acc, &p| Aabb::union_point(&acc, p))
    }

    /// Check that every face index is in range and every attribute array
    /// matches the vertex count.
    pub fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.positions.len();

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::FlatArrayLength {
                name: "index",
                len: self.indices.len(),
            });
        }

        let attribute_lengths = [
            ("normals", self.normals.as_ref().map(Vec::len)),
            ("tangents", self.tangents.as_ref().map(Vec::len)),
            ("uvs", self.uvs.as_ref().map(Vec::len)),
        ];
        for (attribute, len) in attribute_lengths {
            if let Some(found) = len {
                if found != vertex_count {
                    return Err(MeshError::AttributeCount {
                        attribute,
                        expected: vertex_count,
                        found,
                    });
                }
            }
        }

        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MeshError::FaceIndexOutOfRange {
                face: position / 3,
                index,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Each vertex normal is the normalized, area-weighted average of the
    /// normals of the faces sharing it. Faces with out-of-range indices are
    /// ignored.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            let n = safe_normalize(*normal);
            // Default up normal for isolated or degenerate vertices
            *normal = if n == Vec3::ZERO { Vec3::Y } else { n };
        }

        self.normals = Some(normals);
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex indices of face `j`, or `None` past the last face.
    #[inline]
    pub fn face(&self, j: usize) -> Option<[u32; 3]> {
        let f = self.indices.get(3 * j..3 * j + 3)?;
        Some([f[0], f[1], f[2]])
    }

    /// Object-space vertex positions of face `j`, or `None` when the face or
    /// any of its indices is out of range.
    pub fn face_positions(&self, j: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = self.face(j)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }
}
