use crate::{Vec3, Vec3L};

/// Normalize `v`, returning the zero vector when `v` has zero or non-finite length.
///
/// Callers that need a direction must check for the zero result themselves.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Dot product evaluated on 4-lane registers.
///
/// Gives the same value as `a.dot(b)` up to the rounding of `Float`.
#[inline]
pub fn lane_dot(a: Vec3, b: Vec3) -> crate::Float {
    Vec3L::from(a).dot(Vec3L::from(b))
}

/// Build two unit vectors orthogonal to the unit vector `n` and to each other.
pub fn coordinate_system(n: Vec3) -> (Vec3, Vec3) {
    let s = if n.x.abs() > n.y.abs() {
        Vec3::new(-n.z, 0.0, n.x) / (n.x * n.x + n.z * n.z).sqrt()
    } else {
        Vec3::new(0.0, n.z, -n.y) / (n.y * n.y + n.z * n.z).sqrt()
    };
    (s, n.cross(s))
}
