//! Collision volumes
//!
//! Every shape is a plain value type owning only its own parameters and the
//! derived fields its setters keep current. `CollisionVolume` closes the set
//! of shapes into one enum so pair tests dispatch with a single match.
//!
//! # Conventions
//!
//! - Swept tests move the receiver by the displacement against a stationary
//!   argument. Contact normals point from the stationary volume toward the
//!   moving one.
//! - Rays are segments: `origin + direction * t` for `t` in `[0, 1]`.
//! - Pairs without a dedicated routine fall back to GJK distance and
//!   conservative advancement over support mappings.

pub mod frame;
pub mod sphere;
pub mod oriented_box;
pub mod capsule;
pub mod cylinder;
pub mod triangle;
pub mod frustum;

pub use capsule::CollisionCapsule;
pub use cylinder::CollisionCylinder;
pub use frame::Frame;
pub use frustum::{CollisionFrustum, DepthRange, Plane};
pub use oriented_box::CollisionBox;
pub use sphere::CollisionSphere;
pub use triangle::CollisionTriangle;

use crate::detection::gjk::{advance_sweep, convex_hits, SupportMap};
use crate::detection::{lambda_or_miss, SweepHit};
use crate::foundation::math::Vec3;

/// How one volume relates to a containing region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Containment {
    /// No overlap at all
    Outside,
    /// Overlapping the boundary
    Partial,
    /// Entirely within
    Inside,
}

/// Tag of a volume without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeKind {
    /// [`CollisionSphere`]
    Sphere,
    /// [`CollisionBox`]
    Box,
    /// [`CollisionCapsule`]
    Capsule,
    /// [`CollisionCylinder`]
    Cylinder,
    /// [`CollisionTriangle`]
    Triangle,
    /// [`CollisionFrustum`]
    Frustum,
}

impl VolumeKind {
    /// Lowercase display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Cylinder => "cylinder",
            Self::Triangle => "triangle",
            Self::Frustum => "frustum",
        }
    }
}

/// Per-shape callbacks for [`CollisionVolume::accept`]
///
/// Every method defaults to doing nothing, so visitors only implement the
/// shapes they care about.
pub trait VolumeVisitor {
    /// Called for a sphere
    fn visit_sphere(&mut self, _sphere: &CollisionSphere) {}
    /// Called for a box
    fn visit_box(&mut self, _cube: &CollisionBox) {}
    /// Called for a capsule
    fn visit_capsule(&mut self, _capsule: &CollisionCapsule) {}
    /// Called for a cylinder
    fn visit_cylinder(&mut self, _cylinder: &CollisionCylinder) {}
    /// Called for a triangle
    fn visit_triangle(&mut self, _triangle: &CollisionTriangle) {}
    /// Called for a frustum
    fn visit_frustum(&mut self, _frustum: &CollisionFrustum) {}
}

/// Any collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionVolume {
    /// Sphere
    Sphere(CollisionSphere),
    /// Oriented box
    Box(CollisionBox),
    /// Possibly tapered capsule
    Capsule(CollisionCapsule),
    /// Possibly tapered cylinder
    Cylinder(CollisionCylinder),
    /// Triangle
    Triangle(CollisionTriangle),
    /// View frustum
    Frustum(CollisionFrustum),
}

impl From<CollisionSphere> for CollisionVolume {
    fn from(sphere: CollisionSphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<CollisionBox> for CollisionVolume {
    fn from(cube: CollisionBox) -> Self {
        Self::Box(cube)
    }
}

impl From<CollisionCapsule> for CollisionVolume {
    fn from(capsule: CollisionCapsule) -> Self {
        Self::Capsule(capsule)
    }
}

impl From<CollisionCylinder> for CollisionVolume {
    fn from(cylinder: CollisionCylinder) -> Self {
        Self::Cylinder(cylinder)
    }
}

impl From<CollisionTriangle> for CollisionVolume {
    fn from(triangle: CollisionTriangle) -> Self {
        Self::Triangle(triangle)
    }
}

impl From<CollisionFrustum> for CollisionVolume {
    fn from(frustum: CollisionFrustum) -> Self {
        Self::Frustum(frustum)
    }
}

impl CollisionVolume {
    /// Which shape this is
    pub fn kind(&self) -> VolumeKind {
        match self {
            Self::Sphere(_) => VolumeKind::Sphere,
            Self::Box(_) => VolumeKind::Box,
            Self::Capsule(_) => VolumeKind::Capsule,
            Self::Cylinder(_) => VolumeKind::Cylinder,
            Self::Triangle(_) => VolumeKind::Triangle,
            Self::Frustum(_) => VolumeKind::Frustum,
        }
    }

    /// Hands the concrete shape to the matching visitor method
    pub fn accept(&self, visitor: &mut dyn VolumeVisitor) {
        match self {
            Self::Sphere(sphere) => visitor.visit_sphere(sphere),
            Self::Box(cube) => visitor.visit_box(cube),
            Self::Capsule(capsule) => visitor.visit_capsule(capsule),
            Self::Cylinder(cylinder) => visitor.visit_cylinder(cylinder),
            Self::Triangle(triangle) => visitor.visit_triangle(triangle),
            Self::Frustum(frustum) => visitor.visit_frustum(frustum),
        }
    }

    /// Static overlap test; `a.hits(b) == b.hits(a)`
    pub fn hits(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.hits_sphere(b),

            (Self::Sphere(sphere), Self::Box(cube)) | (Self::Box(cube), Self::Sphere(sphere)) => {
                cube.hits_sphere(sphere)
            }
            (Self::Box(a), Self::Box(b)) => a.hits_box(b),

            (Self::Sphere(sphere), Self::Capsule(capsule)) | (Self::Capsule(capsule), Self::Sphere(sphere)) => {
                capsule.hits_sphere(sphere)
            }
            (Self::Sphere(sphere), Self::Cylinder(cylinder)) | (Self::Cylinder(cylinder), Self::Sphere(sphere)) => {
                cylinder.hits_sphere(sphere)
            }
            (Self::Capsule(a), Self::Capsule(b)) => a
                .hits_uniform_capsule(b)
                .unwrap_or_else(|| self.generic_hits(other)),

            (Self::Sphere(sphere), Self::Triangle(triangle)) | (Self::Triangle(triangle), Self::Sphere(sphere)) => {
                triangle.hits_sphere(sphere)
            }
            (Self::Box(cube), Self::Triangle(triangle)) | (Self::Triangle(triangle), Self::Box(cube)) => {
                triangle.hits_box(cube)
            }
            (Self::Triangle(a), Self::Triangle(b)) => a.hits_triangle(b),

            (Self::Frustum(_), Self::Frustum(_)) => self.generic_hits(other),
            (Self::Frustum(frustum), shape) | (shape, Self::Frustum(frustum)) => frustum.hits_support(shape),

            _ => self.generic_hits(other),
        }
    }

    fn generic_hits(&self, other: &Self) -> bool {
        log::trace!(
            "{} vs {}: generic convex overlap test",
            self.kind().name(),
            other.kind().name()
        );
        convex_hits(self, other)
    }

    /// This volume moving by `displacement` against a stationary `other`
    ///
    /// Returns the first contact, or `None` when the volumes do not touch
    /// within the displacement. Already overlapping volumes report
    /// `lambda == 0`.
    pub fn move_hits(&self, other: &Self, displacement: &Vec3) -> Option<SweepHit> {
        let reverse = -displacement;
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.move_hits_sphere(b, displacement),

            (Self::Sphere(sphere), Self::Box(cube)) => cube.sphere_move_hits(sphere, displacement),
            (Self::Box(cube), Self::Sphere(sphere)) => {
                cube.sphere_move_hits(sphere, &reverse).map(SweepHit::reversed)
            }
            (Self::Box(a), Self::Box(b)) => b.box_move_hits(a, displacement),

            (Self::Sphere(sphere), Self::Capsule(capsule)) => capsule.sphere_move_hits(sphere, displacement),
            (Self::Capsule(capsule), Self::Sphere(sphere)) => {
                capsule.sphere_move_hits(sphere, &reverse).map(SweepHit::reversed)
            }

            (Self::Sphere(sphere), Self::Triangle(triangle)) => triangle.sphere_move_hits(sphere, displacement),
            (Self::Triangle(triangle), Self::Sphere(sphere)) => {
                triangle.sphere_move_hits(sphere, &reverse).map(SweepHit::reversed)
            }
            (Self::Box(cube), Self::Triangle(triangle)) => triangle.box_move_hits(cube, displacement),
            (Self::Triangle(triangle), Self::Box(cube)) => {
                triangle.box_move_hits(cube, &reverse).map(SweepHit::reversed)
            }
            (Self::Triangle(a), Self::Triangle(b)) => b.triangle_move_hits(a, displacement),

            (Self::Frustum(_), Self::Frustum(_)) => self.generic_move_hits(other, displacement),
            (shape, Self::Frustum(frustum)) => frustum.move_hits_support(shape, displacement),
            (Self::Frustum(frustum), shape) => {
                frustum.move_hits_support(shape, &reverse).map(SweepHit::reversed)
            }

            _ => self.generic_move_hits(other, displacement),
        }
    }

    fn generic_move_hits(&self, other: &Self, displacement: &Vec3) -> Option<SweepHit> {
        log::trace!(
            "{} vs {}: conservative advancement sweep",
            self.kind().name(),
            other.kind().name()
        );
        advance_sweep(self, other, displacement)
    }

    /// Scalar form of [`Self::move_hits`]: lambda, or `NO_COLLISION`
    pub fn move_distance(&self, other: &Self, displacement: &Vec3) -> f32 {
        lambda_or_miss(self.move_hits(other, displacement))
    }

    /// A point moving by `displacement` against this volume
    pub fn point_move_hits(&self, point: &Vec3, displacement: &Vec3) -> Option<SweepHit> {
        match self {
            Self::Box(cube) => cube.point_move_hits(point, displacement),
            Self::Triangle(triangle) => triangle.point_move_hits(point, displacement),
            _ => {
                let lambda = self.ray_hits(point, displacement)?;
                let contact = point + displacement * lambda;
                Some(SweepHit::new(lambda, self.normal_at_point(&contact)))
            }
        }
    }

    /// Whether `point` lies inside or on the volume (never for triangles)
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        match self {
            Self::Sphere(sphere) => sphere.is_point_inside(point),
            Self::Box(cube) => cube.is_point_inside(point),
            Self::Capsule(capsule) => capsule.is_point_inside(point),
            Self::Cylinder(cylinder) => cylinder.is_point_inside(point),
            Self::Triangle(triangle) => triangle.is_point_inside(point),
            Self::Frustum(frustum) => frustum.is_point_inside(point),
        }
    }

    /// Closest point on the volume surface
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.closest_point_to(point),
            Self::Box(cube) => cube.closest_point_to(point),
            Self::Capsule(capsule) => capsule.closest_point_to(point),
            Self::Cylinder(cylinder) => cylinder.closest_point_to(point),
            Self::Triangle(triangle) => triangle.closest_point_to(point),
            Self::Frustum(frustum) => frustum.closest_point_to(point),
        }
    }

    /// Outward unit normal of the surface near `point`
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.normal_at_point(point),
            Self::Box(cube) => cube.normal_at_point(point),
            Self::Capsule(capsule) => capsule.normal_at_point(point),
            Self::Cylinder(cylinder) => cylinder.normal_at_point(point),
            Self::Triangle(triangle) => triangle.normal_at_point(point),
            Self::Frustum(frustum) => frustum.normal_at_point(point),
        }
    }

    /// Entry fraction of the segment `origin..origin + direction`
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        match self {
            Self::Sphere(sphere) => sphere.ray_hits(origin, direction),
            Self::Box(cube) => cube.ray_hits(origin, direction),
            Self::Capsule(capsule) => capsule.ray_hits(origin, direction),
            Self::Cylinder(cylinder) => cylinder.ray_hits(origin, direction),
            Self::Triangle(triangle) => triangle.ray_hits(origin, direction),
            Self::Frustum(frustum) => frustum.ray_hits(origin, direction),
        }
    }

    /// A sphere containing the whole volume
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        match self {
            Self::Sphere(sphere) => sphere.enclosing_sphere(),
            Self::Box(cube) => cube.enclosing_sphere(),
            Self::Capsule(capsule) => capsule.enclosing_sphere(),
            Self::Cylinder(cylinder) => cylinder.enclosing_sphere(),
            Self::Triangle(triangle) => triangle.enclosing_sphere(),
            Self::Frustum(frustum) => frustum.enclosing_sphere(),
        }
    }

    /// An axis-aligned box containing the whole volume
    pub fn enclosing_box(&self) -> CollisionBox {
        match self {
            Self::Sphere(sphere) => sphere.enclosing_box(),
            Self::Box(cube) => cube.enclosing_box(),
            Self::Capsule(capsule) => capsule.enclosing_box(),
            Self::Cylinder(cylinder) => cylinder.enclosing_box(),
            Self::Triangle(triangle) => triangle.enclosing_box(),
            Self::Frustum(frustum) => frustum.enclosing_box(),
        }
    }
}

impl SupportMap for CollisionVolume {
    fn support(&self, direction: &Vec3) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.support(direction),
            Self::Box(cube) => cube.support(direction),
            Self::Capsule(capsule) => capsule.support(direction),
            Self::Cylinder(cylinder) => cylinder.support(direction),
            Self::Triangle(triangle) => triangle.support(direction),
            Self::Frustum(frustum) => frustum.support(direction),
        }
    }

    fn center(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => SupportMap::center(sphere),
            Self::Box(cube) => SupportMap::center(cube),
            Self::Capsule(capsule) => SupportMap::center(capsule),
            Self::Cylinder(cylinder) => SupportMap::center(cylinder),
            Self::Triangle(triangle) => SupportMap::center(triangle),
            Self::Frustum(frustum) => SupportMap::center(frustum),
        }
    }
}
