//! Accelerator selection.

use std::sync::Arc;

use strata_core::Scene;
use strata_math::{Interval, Ray};

use crate::bvh::Bvh;
use crate::config::{AccelConfig, AccelKind};
use crate::error::BuildResult;
use crate::hit::Hit;
use crate::intersection::Intersection;
use crate::linear::LinearAccel;
use crate::report::{BuildReporter, BuildStats, LogReporter};

/// A spatial index answering nearest-hit queries over a scene.
///
/// `build` takes `&mut self` and queries take `&self`, so a built
/// accelerator can be shared across threads for querying.
pub trait Accel: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> AccelKind;

    /// Index every triangle of `scene`, discarding any previous build.
    fn build(&mut self, scene: &Scene) -> BuildResult<BuildStats>;

    /// Nearest hit with `t` in `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit>;

    /// Nearest hit with its surface geometry. `scene` must be the scene
    /// passed to the last build.
    fn intersect(&self, scene: &Scene, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let hit = self.hit(ray, ray_t)?;
        Intersection::from_hit(scene, &hit)
    }
}

impl Accel for Bvh {
    fn kind(&self) -> AccelKind {
        AccelKind::Bvh
    }

    fn build(&mut self, scene: &Scene) -> BuildResult<BuildStats> {
        Bvh::build(self, scene)
    }

    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        Bvh::hit(self, ray, ray_t)
    }
}

impl Accel for LinearAccel {
    fn kind(&self) -> AccelKind {
        AccelKind::Linear
    }

    fn build(&mut self, scene: &Scene) -> BuildResult<BuildStats> {
        LinearAccel::build(self, scene)
    }

    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        LinearAccel::hit(self, ray, ray_t)
    }
}

/// Create an unbuilt accelerator that reports to the log.
pub fn create_accel(config: &AccelConfig) -> Box<dyn Accel> {
    create_accel_with_reporter(config, Arc::new(LogReporter))
}

/// Create an unbuilt accelerator that reports to `reporter`.
pub fn create_accel_with_reporter(
    config: &AccelConfig,
    reporter: Arc<dyn BuildReporter>,
) -> Box<dyn Accel> {
    match config.kind {
        AccelKind::Bvh => Box::new(Bvh::new(config).with_reporter(reporter)),
        AccelKind::Linear => Box::new(LinearAccel::new(config).with_reporter(reporter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Mesh, Primitive};
    use strata_math::{Float, Mat4, Vec3};

    fn one_triangle() -> Scene {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], None);
        let mut scene = Scene::new("one");
        scene.add_primitive(Primitive::new(Arc::new(mesh), Mat4::IDENTITY));
        scene
    }

    #[test]
    fn test_factory_kinds() {
        for kind in [AccelKind::Bvh, AccelKind::Linear] {
            let accel = create_accel(&AccelConfig::default().with_kind(kind));
            assert_eq!(accel.kind(), kind);
        }
    }

    #[test]
    fn test_intersect_through_trait() {
        let scene = one_triangle();
        for kind in [AccelKind::Bvh, AccelKind::Linear] {
            let mut accel = create_accel(&AccelConfig::default().with_kind(kind));
            accel.build(&scene).unwrap();

            let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z);
            let its = accel.intersect(&scene, &ray, Interval::from_min(0.0)).unwrap();
            assert_eq!((its.primitive, its.face), (0, 0));
            assert!((its.p - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-6);

            // Rejected queries
            assert!(accel.hit(&ray, Interval::new(1.0, 0.0)).is_none());
            assert!(accel.hit(&Ray::new(ray.origin, Vec3::ZERO), Interval::UNIVERSE).is_none());
        }
    }

    #[test]
    fn test_huge_direction_hits() {
        let scene = one_triangle();
        for kind in [AccelKind::Bvh, AccelKind::Linear] {
            let mut accel = create_accel(&AccelConfig::default().with_kind(kind));
            accel.build(&scene).unwrap();

            let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z * 1e20);
            let hit = accel.hit(&ray, Interval::from_min(0.0)).unwrap();
            assert!((hit.t * 1e20 - 1.0).abs() < 1e-5);
            assert!((hit.p - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_invalid_bound_epsilon_still_hits() {
        let scene = one_triangle();
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z);

        for bound_epsilon in [-0.01, Float::NAN, Float::NEG_INFINITY] {
            for kind in [AccelKind::Bvh, AccelKind::Linear] {
                let config = AccelConfig {
                    kind,
                    bound_epsilon,
                    ..Default::default()
                };
                assert!(config.validate().is_err());

                let mut accel = create_accel(&config);
                accel.build(&scene).unwrap();
                let hit = accel.hit(&ray, Interval::from_min(0.0)).unwrap();
                assert!((hit.t - 1.0).abs() < 1e-6);
            }
        }

        // Bounds are still padded outward
        let mut bvh = Bvh::new(&AccelConfig {
            bound_epsilon: -0.01,
            ..Default::default()
        });
        bvh.build(&scene).unwrap();
        let bound = bvh.bounding_box();
        assert_eq!(bound.min, Vec3::splat(-AccelConfig::DEFAULT_BOUND_EPSILON));
        assert_eq!(bound.max.x, 1.0 + AccelConfig::DEFAULT_BOUND_EPSILON);
    }
}
