// Transform builders and helpers for Mat4
//
// Matrices are column major and act on column vectors: `(a * b) * p == a * (b * p)`.

use crate::{consts, safe_normalize, Aabb, Float, Mat3, Mat4, Vec3};

/// Convert degrees to radians.
#[inline]
pub fn radians(deg: Float) -> Float {
    deg * consts::PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn degrees(rad: Float) -> Float {
    rad * 180.0 / consts::PI
}

/// Translation by `v`.
pub fn translate(v: Vec3) -> Mat4 {
    Mat4::from_translation(v)
}

/// Rotation of `angle` radians around `axis` (right handed).
///
/// The axis does not need to be normalized. A zero axis yields the identity.
pub fn rotate(angle: Float, axis: Vec3) -> Mat4 {
    let axis = safe_normalize(axis);
    if axis == Vec3::ZERO {
        return Mat4::IDENTITY;
    }
    Mat4::from_axis_angle(axis, angle)
}

/// Non-uniform scale by the components of `v`.
pub fn scale(v: Vec3) -> Mat4 {
    Mat4::from_scale(v)
}

/// `m * translate(v)`: translation applied before `m`.
pub fn translate_by(m: &Mat4, v: Vec3) -> Mat4 {
    *m * translate(v)
}

/// `m * rotate(angle, axis)`: rotation applied before `m`.
pub fn rotate_by(m: &Mat4, angle: Float, axis: Vec3) -> Mat4 {
    *m * rotate(angle, axis)
}

/// `m * scale(v)`: scale applied before `m`.
pub fn scale_by(m: &Mat4, v: Vec3) -> Mat4 {
    *m * scale(v)
}

/// Extension trait for Mat4 to provide the point/vector/normal distinction
/// the intersection core relies on.
pub trait Mat4Ext {
    /// Transform a point (implicit w=1). Translation applies.
    fn transform_point(&self, p: Vec3) -> Vec3;

    /// Transform a direction (implicit w=0). Translation does not apply.
    fn transform_direction(&self, v: Vec3) -> Vec3;

    /// Matrix that maps object-space normals to world space: the
    /// inverse-transpose of the upper 3x3. A singular upper 3x3 is returned
    /// unchanged.
    fn normal_matrix(&self) -> Mat3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    #[inline]
    fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).truncate()
    }

    #[inline]
    fn transform_direction(&self, v: Vec3) -> Vec3 {
        (*self * v.extend(0.0)).truncate()
    }

    fn normal_matrix(&self) -> Mat3 {
        let linear = Mat3::from_mat4(*self);
        let det = linear.determinant();
        if det == 0.0 || !det.is_finite() {
            return linear;
        }
        linear.inverse().transpose()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }
        aabb.corners()
            .iter()
            .fold(Aabb::EMPTY, |acc, &corner| Aabb::union_point(&acc, self.transform_point(corner)))
    }
}
