//! Shared detection routines
//!
//! Geometry that more than one volume needs lives here so each shape module
//! only has to describe itself.
//!
//! # Architecture
//!
//! - `closest`: closest points on segments and triangles
//! - `sat`: interval projections and the per-axis swept interval test
//! - `ray`: ray/segment roots against spheres, cone sides and slabs
//! - `gjk`: distance between support mappings, and the conservative
//!   advancement sweep built on it

pub mod closest;
pub mod sat;
pub mod ray;
pub mod gjk;

use crate::foundation::math::{tolerance, Vec3};

/// First contact found by a swept test
///
/// `lambda` is the fraction of the displacement travelled at first touch, in
/// `[0, 1]`. `normal` is a unit vector pointing from the stationary volume
/// toward the moving one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the displacement at first contact
    pub lambda: f32,
    /// Contact normal, from the stationary volume toward the moving one
    pub normal: Vec3,
}

impl SweepHit {
    /// Creates a hit, clamping `lambda` into `[0, 1]`
    pub fn new(lambda: f32, normal: Vec3) -> Self {
        Self {
            lambda: lambda.clamp(0.0, tolerance::NO_COLLISION),
            normal,
        }
    }

    /// Contact at the start of the displacement
    pub fn touching(normal: Vec3) -> Self {
        Self { lambda: 0.0, normal }
    }

    /// The same contact seen from the other volume
    #[must_use]
    pub fn reversed(self) -> Self {
        Self { lambda: self.lambda, normal: -self.normal }
    }
}

/// Scalar form of a sweep result: `lambda`, or [`tolerance::NO_COLLISION`]
pub fn lambda_or_miss(hit: Option<SweepHit>) -> f32 {
    hit.map_or(tolerance::NO_COLLISION, |hit| hit.lambda)
}

/// Normal for volumes that already overlap when the sweep starts
///
/// Separation of the centers, else against the displacement, else the
/// default axis.
pub fn overlap_normal(moving_center: &Vec3, fixed_center: &Vec3, displacement: &Vec3) -> Vec3 {
    let separation = moving_center - fixed_center;
    if separation.magnitude_squared() > tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON {
        return separation.normalize();
    }
    if displacement.magnitude_squared() > tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON {
        return -displacement.normalize();
    }
    Vec3::y()
}
