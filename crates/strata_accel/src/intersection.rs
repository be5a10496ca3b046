//! Surface geometry at the winning hit.

use strata_core::Scene;
use strata_math::{coordinate_system, safe_normalize, Float, Mat4Ext, Vec2, Vec3};

use crate::hit::Hit;

/// Below this `|det|` the UV parameterisation of a triangle is unusable.
const UV_DET_EPSILON: Float = 1e-9;

/// Parameterisation used when a mesh has no UVs.
const DEFAULT_UVS: [Vec2; 3] = [Vec2::ZERO, Vec2::X, Vec2::Y];

/// Geometry of the surface at a ray hit, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Hit position
    pub p: Vec3,
    /// Ray parameter
    pub t: Float,
    /// Unit normal of the transformed face, counter-clockwise winding
    pub geometric_normal: Vec3,
    /// Interpolated vertex normal, or the geometric normal
    pub shading_normal: Vec3,
    /// Unit tangent along increasing u, orthogonal to the shading normal
    pub dpdu: Vec3,
    /// `shading_normal x dpdu`
    pub dpdv: Vec3,
    /// Texture coordinates
    pub uv: Vec2,
    /// Barycentric weights of the second and third vertex
    pub barycentric: Vec2,
    /// Owning primitive
    pub primitive: usize,
    /// Face within the primitive's mesh
    pub face: usize,
}

impl Intersection {
    /// Reconstruct the surface at `hit`.
    ///
    /// `scene` must be the scene the accelerator was built from. Returns
    /// `None` when the hit no longer refers to a face in it.
    pub fn from_hit(scene: &Scene, hit: &Hit) -> Option<Self> {
        let prim = scene.primitive(hit.primitive)?;
        let mesh = prim.mesh.as_deref()?;
        let [i0, i1, i2] = mesh.face(hit.face)?.map(|i| i as usize);
        let local = mesh.face_positions(hit.face)?;

        let transform = prim.transform();
        let [p0, p1, p2] = local.map(|p| transform.transform_point(p));

        let b = [1.0 - hit.uv.x - hit.uv.y, hit.uv.x, hit.uv.y];
        let gather = |values: &[Vec3]| -> Option<Vec3> {
            Some(*values.get(i0)? * b[0] + *values.get(i1)? * b[1] + *values.get(i2)? * b[2])
        };

        let geometric_normal = safe_normalize((p1 - p0).cross(p2 - p0));

        let shading_normal = mesh
            .normals
            .as_deref()
            .and_then(gather)
            .map(|n| safe_normalize(*prim.normal_transform() * n))
            .filter(|n| *n != Vec3::ZERO)
            .unwrap_or(geometric_normal);

        let uvs = match mesh.uvs.as_deref() {
            Some(uvs) => [*uvs.get(i0)?, *uvs.get(i1)?, *uvs.get(i2)?],
            None => DEFAULT_UVS,
        };
        let uv = uvs[0] * b[0] + uvs[1] * b[1] + uvs[2] * b[2];

        let tangent = mesh
            .tangents
            .as_deref()
            .and_then(gather)
            .map(|t| transform.transform_direction(t))
            .and_then(|t| orthogonal_unit(t, shading_normal))
            .or_else(|| {
                uv_tangent([p0, p1, p2], uvs).and_then(|t| orthogonal_unit(t, shading_normal))
            });
        let dpdu = match tangent {
            Some(t) => t,
            None => coordinate_system(shading_normal).0,
        };

        Some(Self {
            p: hit.p,
            t: hit.t,
            geometric_normal,
            shading_normal,
            dpdu,
            dpdv: shading_normal.cross(dpdu),
            uv,
            barycentric: hit.uv,
            primitive: hit.primitive,
            face: hit.face,
        })
    }
}

/// World-space direction of increasing u over the triangle.
fn uv_tangent(p: [Vec3; 3], uv: [Vec2; 3]) -> Option<Vec3> {
    let duv02 = uv[0] - uv[2];
    let duv12 = uv[1] - uv[2];
    let dp02 = p[0] - p[2];
    let dp12 = p[1] - p[2];

    let det = duv02.x * duv12.y - duv02.y * duv12.x;
    if !(det.abs() > UV_DET_EPSILON) {
        return None;
    }
    Some((dp02 * duv12.y - dp12 * duv02.y) / det)
}

/// `t` with its component along the unit vector `n` removed, normalized.
fn orthogonal_unit(t: Vec3, n: Vec3) -> Option<Vec3> {
    let t = safe_normalize(t - n * n.dot(t));
    (t != Vec3::ZERO).then_some(t)
}
