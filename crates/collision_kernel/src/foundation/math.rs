//! Math utilities and types
//!
//! Provides the nalgebra aliases, the named tolerances every collision
//! routine shares, and a few scalar helpers.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Named tolerances
///
/// Every comparison against "almost zero" in the kernel goes through one of
/// these. Units are given per constant.
pub mod tolerance {
    /// Scalar result meaning "no contact within the displacement".
    pub const NO_COLLISION: f32 = 1.0;

    /// Length slack for containment and contact decisions (world units).
    pub const POSITION_EPSILON: f32 = 1e-6;

    /// Squared length below which an unnormalized direction counts as zero.
    pub const DIRECTION_EPSILON: f32 = 1e-6;

    /// Dot product magnitude below which a direction is parallel to a plane
    /// or perpendicular to an axis.
    pub const PARALLEL_EPSILON: f32 = 1e-6;

    /// Displacement component too small to close a gap (world units).
    pub const SPEED_EPSILON: f32 = 1e-9;

    /// End radii closer than this make a capsule or cylinder untapered.
    pub const TAPER_EPSILON: f32 = 1e-5;

    /// Rotation angle below which an orientation is the identity (radians).
    pub const ORIENTATION_EPSILON: f32 = 1e-6;

    /// Separation at or below which two convex volumes touch (world units).
    pub const CONTACT_EPSILON: f32 = 1e-5;

    /// Relative progress below which a GJK distance search has converged.
    pub const GJK_RELATIVE_EPSILON: f32 = 1e-5;
}

/// Math utility functions
pub mod utils {
    use super::{constants, tolerance, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp negative sizes to zero
    pub fn non_negative(value: f32) -> f32 {
        value.max(0.0)
    }

    /// Normalize a direction, or return `fallback` when it is too short
    pub fn normalize_or(direction: &Vec3, fallback: Vec3) -> Vec3 {
        if direction.magnitude_squared() < tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON {
            fallback
        } else {
            direction.normalize()
        }
    }

    /// Normalize a direction, or `None` when it is too short to carry one
    pub fn try_direction(direction: &Vec3) -> Option<Vec3> {
        if direction.magnitude_squared() < tolerance::DIRECTION_EPSILON {
            None
        } else {
            Some(direction.normalize())
        }
    }

    /// Build an orientation from Euler angles in degrees (roll, pitch, yaw)
    pub fn orientation_from_degrees(angles: &Vec3) -> Quat {
        Quat::from_euler_angles(
            deg_to_rad(angles.x),
            deg_to_rad(angles.y),
            deg_to_rad(angles.z),
        )
    }

    /// Real roots of `a t^2 + b t + c = 0` in ascending order
    ///
    /// Uses the cancellation-free form so short displacements keep their
    /// precision. A zero `a` degrades to the linear equation.
    pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
        if a == 0.0 {
            if b == 0.0 {
                return None;
            }
            let t = -c / b;
            return Some((t, t));
        }
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let q = -0.5 * (b + discriminant.sqrt().copysign(b));
        if q == 0.0 {
            return Some((0.0, 0.0));
        }
        let t0 = q / a;
        let t1 = c / q;
        Some((t0.min(t1), t0.max(t1)))
    }
}
