//! Local coordinate frames
//!
//! Boxes, capsules and cylinders evaluate every query in their own frame:
//! origin at the shape position, axes taken from its orientation. Local Y is
//! the long axis of capsules and cylinders.

use crate::foundation::math::{tolerance, Quat, Vec3};

/// Orthonormal frame derived from a position and an orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Vec3,
    axes: [Vec3; 3],
    oriented: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }
}

impl Frame {
    /// Build the frame of a shape at `origin` rotated by `orientation`
    pub fn new(origin: Vec3, orientation: Quat) -> Self {
        let oriented = orientation.angle() > tolerance::ORIENTATION_EPSILON;
        let axes = if oriented {
            [orientation * Vec3::x(), orientation * Vec3::y(), orientation * Vec3::z()]
        } else {
            [Vec3::x(), Vec3::y(), Vec3::z()]
        };
        Self { origin, axes, oriented }
    }

    /// Frame origin in world space
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The three world-space unit axes (local X, Y, Z)
    pub fn axes(&self) -> &[Vec3; 3] {
        &self.axes
    }

    /// World-space direction of one local axis
    pub fn axis(&self, index: usize) -> Vec3 {
        self.axes[index]
    }

    /// False when the axes coincide with the world axes
    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    /// Move the frame without touching its axes
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// World point to local coordinates
    pub fn world_to_local(&self, point: &Vec3) -> Vec3 {
        let offset = point - self.origin;
        if self.oriented {
            self.normal_world_to_local(&offset)
        } else {
            offset
        }
    }

    /// Local coordinates to world point
    pub fn local_to_world(&self, point: &Vec3) -> Vec3 {
        self.origin + self.normal_local_to_world(point)
    }

    /// World direction to local direction (no translation)
    pub fn normal_world_to_local(&self, direction: &Vec3) -> Vec3 {
        if !self.oriented {
            return *direction;
        }
        Vec3::new(
            self.axes[0].dot(direction),
            self.axes[1].dot(direction),
            self.axes[2].dot(direction),
        )
    }

    /// Local direction to world direction (no translation)
    pub fn normal_local_to_world(&self, direction: &Vec3) -> Vec3 {
        if !self.oriented {
            return *direction;
        }
        self.axes[0] * direction.x + self.axes[1] * direction.y + self.axes[2] * direction.z
    }

    /// Half-length of the projection of a box with these axes onto `axis`
    pub fn project_extents(&self, axis: &Vec3, half_extents: &Vec3) -> f32 {
        self.axes[0].dot(axis).abs() * half_extents.x
            + self.axes[1].dot(axis).abs() * half_extents.y
            + self.axes[2].dot(axis).abs() * half_extents.z
    }
}

/// Distance from the local Y axis and the unit direction away from it
///
/// Points on the axis report local X so callers always get a unit vector.
pub fn radial_split(local: &Vec3) -> (f32, Vec3) {
    let rho = local.x.hypot(local.z);
    if rho <= tolerance::POSITION_EPSILON {
        (rho, Vec3::x())
    } else {
        (rho, Vec3::new(local.x / rho, 0.0, local.z / rho))
    }
}
