//! Linear accelerator: tests every triangle for every ray.
//!
//! Slow but trivially correct, so it serves as the reference the BVH is
//! checked against.

use std::sync::Arc;

use strata_core::Scene;
use strata_math::{Aabb, Float, Interval, Ray};

use crate::config::{AccelConfig, AccelKind};
use crate::error::BuildResult;
use crate::flatten::flatten_scene;
use crate::hit::{accepts_query, Closest, Hit};
use crate::report::{BuildEvent, BuildReporter, BuildStats, LogReporter};
use crate::triangle::TriAccel;

/// A flat list of triangles.
pub struct LinearAccel {
    bound_epsilon: Float,
    triangles: Vec<TriAccel>,
    bbox: Aabb,
    reporter: Arc<dyn BuildReporter>,
}

impl LinearAccel {
    /// Create an empty accelerator. Only `bound_epsilon` is read from `config`.
    pub fn new(config: &AccelConfig) -> Self {
        Self {
            bound_epsilon: config.build_bound_epsilon(),
            triangles: Vec::new(),
            bbox: Aabb::EMPTY,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Send build diagnostics to `reporter` instead of the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn BuildReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Flatten `scene`, replacing the previous contents.
    pub fn build(&mut self, scene: &Scene) -> BuildResult<BuildStats> {
        self.triangles.clear();
        self.bbox = Aabb::EMPTY;

        let flat = flatten_scene(scene, self.bound_epsilon, self.reporter.as_ref())?;
        self.bbox = flat
            .bounds
            .iter()
            .fold(Aabb::EMPTY, |acc, b| Aabb::union(&acc, b));
        self.triangles = flat.triangles;

        let stats = flat.stats;
        self.reporter.report(&BuildEvent::Finished {
            kind: AccelKind::Linear,
            stats,
        });
        Ok(stats)
    }

    /// Find the nearest hit with `t` in `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        if !accepts_query(ray, ray_t) || !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let mut closest = Closest::new(ray_t);
        for (i, triangle) in self.triangles.iter().enumerate() {
            closest.test(i, triangle, ray);
        }
        closest.finish(&self.triangles, ray)
    }

    /// Flattened triangles, in scene order.
    pub fn triangles(&self) -> &[TriAccel] {
        &self.triangles
    }

    /// Get the number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the accelerator holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bound of every triangle.
    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl std::fmt::Debug for LinearAccel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearAccel")
            .field("bound_epsilon", &self.bound_epsilon)
            .field("triangles", &self.triangles.len())
            .finish()
    }
}
