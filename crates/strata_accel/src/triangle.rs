//! Precomputed triangles for ray intersection.
//!
//! Uses the Möller-Trumbore algorithm. Vertices are stored as a base point
//! and two edges in lane vectors so the cross and dot products run on SIMD
//! registers.

use strata_math::{Aabb, Float, Interval, Ray, Vec3, Vec3L};

/// A world-space triangle prepared for repeated intersection tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriAccel {
    p0: Vec3L,
    e1: Vec3L,
    e2: Vec3L,
    /// Length of `e1 x e2`, twice the triangle area
    area2: Float,
    /// Index of the owning primitive in the scene
    pub primitive: usize,
    /// Face index within the primitive's mesh
    pub face: usize,
    degenerate: bool,
}

impl TriAccel {
    /// Precompute a triangle from its world-space vertices.
    ///
    /// Triangles with zero or non-finite area are kept (so face indices stay
    /// dense) but never report a hit.
    pub fn load(p0: Vec3, p1: Vec3, p2: Vec3, primitive: usize, face: usize) -> Self {
        let p0 = Vec3L::from(p0);
        let e1 = Vec3L::from(p1) - p0;
        let e2 = Vec3L::from(p2) - p0;
        let area2 = e1.cross(e2).length();
        let edge_scale = e1.length() * e2.length();

        // Also catches NaN and zero-length edges
        let degenerate = !(area2 > Float::EPSILON * edge_scale) || !edge_scale.is_finite();

        Self {
            p0,
            e1,
            e2,
            area2,
            primitive,
            face,
            degenerate,
        }
    }

    /// True when the triangle can never be hit.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// The three world-space vertices.
    pub fn vertices(&self) -> [Vec3; 3] {
        [
            Vec3::from(self.p0),
            Vec3::from(self.p0 + self.e1),
            Vec3::from(self.p0 + self.e2),
        ]
    }

    /// Two-sided ray test.
    ///
    /// Returns `(u, v, t)` where the hit point is
    /// `(1 - u - v) * p0 + u * p1 + v * p2 = ray.at(t)` and `t` lies in
    /// `ray_t` (bounds inclusive).
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(Float, Float, Float)> {
        if self.degenerate {
            return None;
        }

        let d = Vec3L::from(ray.direction);
        let h = d.cross(self.e2);
        let det = self.e1.dot(h);

        // Ray is parallel to the triangle plane. The largest component
        // stands in for |d| since the length overflows for huge directions.
        let d_scale = d.abs().max_element();
        if !det.is_finite() || !(det.abs() / d_scale > Float::EPSILON * self.area2) {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = Vec3L::from(ray.origin) - self.p0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.e1);
        let v = inv_det * d.dot(q);
        if !(v >= 0.0 && u + v <= 1.0) {
            return None;
        }

        let t = inv_det * self.e2.dot(q);
        if !t.is_finite() || !ray_t.contains(t) {
            return None;
        }

        Some((u, v, t))
    }
}

/// Exact bound of three vertices.
#[inline]
pub fn vertex_bound(p0: Vec3, p1: Vec3, p2: Vec3) -> Aabb {
    Aabb::union_point(&Aabb::from_points(p0, p1), p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> TriAccel {
        TriAccel::load(Vec3::ZERO, Vec3::X, Vec3::Y, 0, 0)
    }

    #[test]
    fn test_centroid_hit() {
        let tri = unit_triangle();
        let centroid = Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        let ray = Ray::new(centroid + Vec3::Z * 2.0, -Vec3::Z);

        let (u, v, t) = tri.intersect(&ray, Interval::from_min(0.0)).unwrap();
        assert!((u - 1.0 / 3.0).abs() < 1e-5);
        assert!((v - 1.0 / 3.0).abs() < 1e-5);
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_two_sided() {
        let tri = unit_triangle();
        let from_below = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        let (_, _, t) = tri.intersect(&from_below, Interval::from_min(0.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_barycentric_mapping() {
        let p = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 0.0), Vec3::new(1.0, 4.0, 0.0)];
        let tri = TriAccel::load(p[0], p[1], p[2], 0, 0);
        let target = p[0] * 0.5 + p[1] * 0.2 + p[2] * 0.3;
        let ray = Ray::new(target + Vec3::Z, -Vec3::Z);

        let (u, v, t) = tri.intersect(&ray, Interval::from_min(0.0)).unwrap();
        let hit = p[0] * (1.0 - u - v) + p[1] * u + p[2] * v;
        assert!((hit - ray.at(t)).length() < 1e-5);
        assert!((u - 0.2).abs() < 1e-5);
        assert!((v - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_misses() {
        let tri = unit_triangle();
        let down = -Vec3::Z;

        // Outside the edges
        assert!(tri.intersect(&Ray::new(Vec3::new(0.8, 0.8, 1.0), down), Interval::UNIVERSE).is_none());
        assert!(tri.intersect(&Ray::new(Vec3::new(-0.1, 0.5, 1.0), down), Interval::UNIVERSE).is_none());
        // Parallel to the plane
        assert!(tri.intersect(&Ray::new(Vec3::new(0.2, 0.2, 0.0), Vec3::X), Interval::UNIVERSE).is_none());
        // Outside the interval
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), down);
        assert!(tri.intersect(&ray, Interval::new(0.0, 0.5)).is_none());
        assert!(tri.intersect(&ray, Interval::new(1.5, 3.0)).is_none());
        // Interval bounds are inclusive
        assert!(tri.intersect(&ray, Interval::new(0.0, 1.0)).is_some());
    }

    #[test]
    fn test_degenerate_never_hits() {
        let collinear = TriAccel::load(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, 0, 0);
        let collapsed = TriAccel::load(Vec3::ONE, Vec3::ONE, Vec3::ONE, 0, 0);
        let broken = TriAccel::load(Vec3::ZERO, Vec3::new(Float::NAN, 0.0, 0.0), Vec3::Y, 0, 0);

        for tri in [collinear, collapsed, broken] {
            assert!(tri.is_degenerate());
            let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
            assert!(tri.intersect(&ray, Interval::UNIVERSE).is_none());
        }
        assert!(!unit_triangle().is_degenerate());
    }

    #[test]
    fn test_direction_scale_does_not_matter() {
        let tri = unit_triangle();
        for scale in [1e-20, 1.0, 1e19, 1e20, 1e30] {
            let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z * scale);
            let (u, v, t) = tri.intersect(&ray, Interval::from_min(0.0)).unwrap();
            assert!((u - 0.2).abs() < 1e-5);
            assert!((v - 0.2).abs() < 1e-5);
            assert!((t * scale - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_nan_ray_misses() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.2, Float::NAN, 1.0), -Vec3::Z);
        assert!(tri.intersect(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_vertex_bound_is_exact() {
        let (a, b, c) = (Vec3::new(1.0, -2.0, 0.5), Vec3::new(-3.0, 4.0, 0.5), Vec3::new(0.0, 0.0, 2.0));
        let bound = vertex_bound(a, b, c);
        assert_eq!(bound.min, Vec3::new(-3.0, -2.0, 0.5));
        assert_eq!(bound.max, Vec3::new(1.0, 4.0, 2.0));

        let padded = bound.padded(0.25);
        assert_eq!(padded.min, bound.min - Vec3::splat(0.25));
        assert_eq!(padded.max, bound.max + Vec3::splat(0.25));
    }

    #[test]
    fn test_vertices_roundtrip() {
        let tri = TriAccel::load(Vec3::Z, Vec3::X, Vec3::Y, 3, 7);
        assert_eq!(tri.vertices(), [Vec3::Z, Vec3::X, Vec3::Y]);
        assert_eq!((tri.primitive, tri.face), (3, 7));
    }
}
