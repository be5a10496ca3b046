use crate::{Float, Interval, Ray, Vec3};

/// Axis-aligned bounding box, stored as its two extreme corners.
///
/// The default box is [`Aabb::EMPTY`] (`min = +inf`, `max = -inf`), so folding
/// points or boxes into it with [`Aabb::union_point`] / [`Aabb::union`] always
/// produces the tight enclosing box, whatever the fold order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Minimal box enclosing both boxes.
    pub fn union(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Minimal box enclosing `a` and the point `p`.
    pub fn union_point(a: &Aabb, p: Vec3) -> Self {
        Self {
            min: a.min.min(p),
            max: a.max.max(p),
        }
    }

    /// Grow the box outward by `eps` on every axis.
    pub fn padded(&self, eps: Float) -> Self {
        Self {
            min: self.min - Vec3::splat(eps),
            max: self.max + Vec3::splat(eps),
        }
    }

    /// True when the box contains no point.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True when `other` lies completely inside this box (boundaries included).
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Clip `ray_t` against the box with the slab method.
    ///
    /// Returns the part of `ray_t` that lies inside the box, or `None` when the
    /// ray misses it within `ray_t`. A zero direction component divides to a
    /// signed infinity; when that produces NaN (origin exactly on the slab
    /// plane) the axis leaves the interval unchanged.
    pub fn hit_interval(&self, r: &Ray, mut ray_t: Interval) -> Option<Interval> {
        for axis in 0..3 {
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * adinv;
            let mut t1 = (self.max[axis] - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // Float::max/min return the non-NaN operand
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return None;
            }
        }

        Some(ray_t)
    }

    /// Test if a ray intersects this AABB within the given interval.
    #[inline]
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        self.hit_interval(r, ray_t).is_some()
    }

    /// The empty box; identity element of [`Aabb::union`].
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(Float::INFINITY),
        max: Vec3::splat(Float::NEG_INFINITY),
    };
}
