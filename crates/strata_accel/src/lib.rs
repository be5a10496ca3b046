//! Strata Accel - nearest-hit ray queries over triangle scenes.
//!
//! This crate turns a [`strata_core::Scene`] into a spatial index and answers
//! ray queries against it:
//!
//! - **`TriAccel`**: world-space triangles precomputed for Möller-Trumbore tests
//! - **`Bvh`**: median-split bounding volume hierarchy over those triangles
//! - **`LinearAccel`**: brute-force reference accelerator
//! - **`Intersection`**: surface geometry reconstructed for the winning hit
//!
//! Build once with `&mut self`, then query from any number of threads.
//!
//! # Example
//!
//! ```ignore
//! use strata_accel::{create_accel, AccelConfig};
//! use strata_math::{Interval, Ray, Vec3};
//!
//! let mut accel = create_accel(&AccelConfig::default());
//! accel.build(&scene)?;
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
//! if let Some(its) = accel.intersect(&scene, &ray, Interval::from_min(1e-4)) {
//!     println!("hit face {} at t = {}", its.face, its.t);
//! }
//! ```

pub mod accel;
pub mod bvh;
pub mod config;
pub mod error;
mod flatten;
pub mod hit;
pub mod intersection;
pub mod linear;
pub mod report;
pub mod triangle;

// Re-export commonly used types
pub use accel::{create_accel, create_accel_with_reporter, Accel};
pub use bvh::{Bvh, BvhNode};
pub use config::{AccelConfig, AccelKind};
pub use error::{BuildError, BuildResult, ConfigError};
pub use hit::{Hit, TraversalObserver, TraversalStats};
pub use intersection::Intersection;
pub use linear::LinearAccel;
pub use report::{BuildEvent, BuildReporter, BuildStats, LogReporter};
pub use triangle::{vertex_bound, TriAccel};
