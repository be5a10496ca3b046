//! Hit records and traversal instrumentation.

use strata_math::{Float, Interval, Ray, Vec2, Vec3};

use crate::triangle::TriAccel;

/// The nearest triangle hit along a ray.
///
/// Carries only what traversal knows. Surface geometry is reconstructed on
/// demand with [`Intersection::from_hit`](crate::Intersection::from_hit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the triangle in the accelerator
    pub triangle: usize,
    /// Index of the owning primitive in the scene
    pub primitive: usize,
    /// Face index within the primitive's mesh
    pub face: usize,
    /// Ray parameter of the hit
    pub t: Float,
    /// Barycentric weights of the second and third vertex
    pub uv: Vec2,
    /// World-space hit point, `origin + t * direction`
    pub p: Vec3,
}

/// True when a query can produce a hit at all.
#[inline]
pub(crate) fn accepts_query(ray: &Ray, ray_t: Interval) -> bool {
    ray.is_traceable() && !ray_t.is_empty()
}

/// Best candidate found so far during a query.
pub(crate) struct Closest {
    /// Query interval, upper bound shrunk to the best `t`
    pub window: Interval,
    best: Option<(usize, Float, Float)>,
}

impl Closest {
    pub fn new(ray_t: Interval) -> Self {
        Self {
            window: ray_t,
            best: None,
        }
    }

    /// Test one triangle and keep it if it is nearer than the current best.
    #[inline]
    pub fn test(&mut self, index: usize, triangle: &TriAccel, ray: &Ray) -> bool {
        match triangle.intersect(ray, self.window) {
            Some((u, v, t)) => {
                self.window = self.window.with_max(t);
                self.best = Some((index, u, v));
                true
            }
            None => false,
        }
    }

    /// Turn the winning candidate into a [`Hit`].
    pub fn finish(self, triangles: &[TriAccel], ray: &Ray) -> Option<Hit> {
        let (index, u, v) = self.best?;
        let triangle = triangles.get(index)?;
        let t = self.window.max;
        Some(Hit {
            triangle: index,
            primitive: triangle.primitive,
            face: triangle.face,
            t,
            uv: Vec2::new(u, v),
            p: ray.at(t),
        })
    }
}

/// Receives callbacks while a BVH is traversed.
///
/// `()` is the no-op observer used by uninstrumented queries.
pub trait TraversalObserver {
    /// A node's bound was tested; `entered` is true when the ray hit it.
    fn visit_node(&mut self, _node: usize, _entered: bool) {}

    /// A triangle was tested against the ray.
    fn test_triangle(&mut self, _triangle: usize) {}
}

impl TraversalObserver for () {}

/// Observer that records the traversal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose bound was tested
    pub nodes_visited: usize,
    /// Nodes whose bound the ray hit
    pub entered: Vec<usize>,
    /// Triangles tested, in test order
    pub tested: Vec<usize>,
}

impl TraversalObserver for TraversalStats {
    fn visit_node(&mut self, node: usize, entered: bool) {
        self.nodes_visited += 1;
        if entered {
            self.entered.push(node);
        }
    }

    fn test_triangle(&mut self, triangle: usize) {
        self.tested.push(triangle);
    }
}
