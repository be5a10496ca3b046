//! Strata math - vectors, matrices, bounds and rays for the intersection core.
//!
//! Vector and matrix types come from `glam`. The whole workspace works in one
//! scalar precision, chosen at build time: `f32` by default, `f64` with the
//! `f64` feature. Code should name the aliases exported here (`Float`, `Vec3`,
//! `Mat4`, ...) rather than the concrete glam types.

// Re-export glam for callers that need the concrete types
pub use glam;

#[cfg(not(feature = "f64"))]
mod precision {
    /// Scalar type used across the workspace.
    pub type Float = f32;

    pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

    /// 3-vector laid out in a 4-lane SIMD register.
    pub type Vec3L = glam::Vec3A;

    pub use std::f32::consts;
}

#[cfg(feature = "f64")]
mod precision {
    /// Scalar type used across the workspace.
    pub type Float = f64;

    pub use glam::{
        DMat3 as Mat3, DMat4 as Mat4, DQuat as Quat, DVec2 as Vec2, DVec3 as Vec3, DVec4 as Vec4,
    };

    /// glam has no aligned double 3-vector; lanes fall back to the plain type.
    pub type Vec3L = glam::DVec3;

    pub use std::f64::consts;
}

pub use precision::*;

mod aabb;
mod interval;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{
    degrees, radians, rotate, rotate_by, scale, scale_by, translate, translate_by, Mat4Ext,
};
pub use vector::{coordinate_system, lane_dot, safe_normalize};
