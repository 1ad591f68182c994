//! Cylinder volume
//!
//! A (possibly tapered) cylinder along its local Y axis with flat caps at
//! `-half_height` (bottom radius) and `+half_height` (top radius). In the
//! meridian plane through a point the solid is a trapezoid; distances and
//! normals come from its three real boundary segments.

use super::frame::{radial_split, Frame};
use super::oriented_box::CollisionBox;
use super::sphere::CollisionSphere;
use crate::detection::gjk::SupportMap;
use crate::detection::ray::{cone_side_roots, first_in_unit_range, plane_y_root};
use crate::foundation::math::{tolerance, utils, Quat, Vec3};
use nalgebra::Vector2;

type Vec2 = Vector2<f32>;

/// Possibly tapered cylinder along its local Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionCylinder {
    frame: Frame,
    orientation: Quat,
    half_height: f32,
    top_radius: f32,
    bottom_radius: f32,
    tapered: bool,
}

impl Default for CollisionCylinder {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity(), 1.0, 0.5, 0.5)
    }
}

impl CollisionCylinder {
    /// Creates a cylinder; negative sizes are clamped to zero
    pub fn new(position: Vec3, orientation: Quat, half_height: f32, top_radius: f32, bottom_radius: f32) -> Self {
        let top_radius = utils::non_negative(top_radius);
        let bottom_radius = utils::non_negative(bottom_radius);
        Self {
            frame: Frame::new(position, orientation),
            orientation,
            half_height: utils::non_negative(half_height),
            top_radius,
            bottom_radius,
            tapered: (top_radius - bottom_radius).abs() > tolerance::TAPER_EPSILON,
        }
    }

    /// Untapered cylinder
    pub fn uniform(position: Vec3, orientation: Quat, half_height: f32, radius: f32) -> Self {
        Self::new(position, orientation, half_height, radius, radius)
    }

    /// Cylinder position (midpoint of the axis)
    pub fn position(&self) -> Vec3 {
        self.frame.origin()
    }

    /// Cylinder orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Half the distance between the caps
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Radius of the cap at `+half_height`
    pub fn top_radius(&self) -> f32 {
        self.top_radius
    }

    /// Radius of the cap at `-half_height`
    pub fn bottom_radius(&self) -> f32 {
        self.bottom_radius
    }

    /// Whether the cap radii differ
    pub fn is_tapered(&self) -> bool {
        self.tapered
    }

    /// Whether the axis differs from world Y
    pub fn is_oriented(&self) -> bool {
        self.frame.is_oriented()
    }

    /// Local frame of the cylinder
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Moves the cylinder
    pub fn set_position(&mut self, position: Vec3) {
        self.frame.set_origin(position);
    }

    /// Rotates the cylinder
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.frame = Frame::new(self.position(), orientation);
    }

    /// Changes the half height, clamping negatives to zero
    pub fn set_half_height(&mut self, half_height: f32) {
        self.half_height = utils::non_negative(half_height);
    }

    /// Changes both cap radii, clamping negatives to zero
    pub fn set_radii(&mut self, top_radius: f32, bottom_radius: f32) {
        *self = Self::new(self.position(), self.orientation, self.half_height, top_radius, bottom_radius);
    }

    /// Radius of the cross-section at local height `y`
    pub fn radius_at(&self, y: f32) -> f32 {
        if self.half_height <= tolerance::POSITION_EPSILON {
            return self.top_radius.max(self.bottom_radius);
        }
        let t = ((y + self.half_height) / (2.0 * self.half_height)).clamp(0.0, 1.0);
        self.bottom_radius + (self.top_radius - self.bottom_radius) * t
    }

    /// Signed distance in the meridian plane and the outward local normal
    fn probe(&self, local: &Vec3) -> (f32, Vec3) {
        let h = self.half_height;
        let (rho, radial) = radial_split(local);
        let q = Vec2::new(rho, local.y);

        let bottom_rim = Vec2::new(self.bottom_radius, -h);
        let top_rim = Vec2::new(self.top_radius, h);
        let rise = top_rim - bottom_rim;
        let side_normal = utils::normalize_or(&Vec3::new(rise.y, -rise.x, 0.0), Vec3::x());
        let segments = [
            (Vec2::new(0.0, -h), bottom_rim, Vec2::new(0.0, -1.0)),
            (bottom_rim, top_rim, Vec2::new(side_normal.x, side_normal.y)),
            (top_rim, Vec2::new(0.0, h), Vec2::new(0.0, 1.0)),
        ];

        let mut best = (f32::INFINITY, Vec2::zeros(), Vec2::y());
        for (start, end, outward) in segments {
            let closest = closest_on_segment_2d(&q, &start, &end);
            let distance = (q - closest).magnitude();
            if distance < best.0 {
                best = (distance, closest, outward);
            }
        }
        let (distance, closest, outward) = best;

        let inside = local.y.abs() <= h && rho <= self.radius_at(local.y);
        let normal_2d = if inside || distance < tolerance::POSITION_EPSILON {
            outward
        } else {
            (q - closest) / distance
        };
        let normal = radial * normal_2d.x + Vec3::y() * normal_2d.y;
        (if inside { -distance } else { distance }, normal)
    }

    /// Signed distance to the surface, negative inside
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.probe(&self.frame.world_to_local(point)).0
    }

    /// Whether `point` lies inside or on the cylinder
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        let local = self.frame.world_to_local(point);
        let (rho, _) = radial_split(&local);
        local.y.abs() <= self.half_height && rho <= self.radius_at(local.y)
    }

    /// Closest point on the cylinder surface
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        let local = self.frame.world_to_local(point);
        let (distance, normal) = self.probe(&local);
        self.frame.local_to_world(&(local - normal * distance))
    }

    /// Outward normal of the surface point nearest to `point`
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        let (_, normal) = self.probe(&self.frame.world_to_local(point));
        self.frame.normal_local_to_world(&normal)
    }

    /// Entry fraction of the segment `origin..origin + direction`
    ///
    /// Side crossings count between the caps; cap crossings count inside
    /// the cap disk.
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        if self.is_point_inside(origin) {
            return Some(0.0);
        }
        let o = self.frame.world_to_local(origin);
        let v = self.frame.normal_world_to_local(direction);
        let h = self.half_height;

        let mut candidates = [f32::NAN; 4];
        if h > tolerance::POSITION_EPSILON {
            let slope = (self.top_radius - self.bottom_radius) / (2.0 * h);
            let rho0 = self.bottom_radius + slope * (o.y + h);
            let rho1 = slope * v.y;
            for (slot, root) in cone_side_roots(&o, &v, rho0, rho1).into_iter().enumerate() {
                if let Some(t) = root.filter(|t| (o.y + v.y * t).abs() <= h) {
                    candidates[slot] = t;
                }
            }
        }
        for (slot, (height, radius)) in [(-h, self.bottom_radius), (h, self.top_radius)].into_iter().enumerate() {
            if let Some(t) = plane_y_root(&o, &v, height) {
                let p = o + v * t;
                if p.x * p.x + p.z * p.z <= radius * radius {
                    candidates[2 + slot] = t;
                }
            }
        }
        first_in_unit_range(candidates.into_iter().filter(|t| !t.is_nan()))
    }

    /// Sphere around the position reaching both rims
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        let radius = self.half_height.hypot(self.top_radius.max(self.bottom_radius));
        CollisionSphere::new(self.position(), radius)
    }

    /// Axis-aligned bounds of both cap disks
    pub fn enclosing_box(&self) -> CollisionBox {
        let axis = self.frame.axis(1);
        let spread = axis.map(|u| (1.0 - u * u).max(0.0).sqrt());
        let top = self.frame.local_to_world(&Vec3::new(0.0, self.half_height, 0.0));
        let bottom = self.frame.local_to_world(&Vec3::new(0.0, -self.half_height, 0.0));
        let min = (top - spread * self.top_radius).inf(&(bottom - spread * self.bottom_radius));
        let max = (top + spread * self.top_radius).sup(&(bottom + spread * self.bottom_radius));
        CollisionBox::from_bounds(&min, &max)
    }

    /// Static overlap with a sphere
    pub fn hits_sphere(&self, sphere: &CollisionSphere) -> bool {
        self.signed_distance(&sphere.center()) <= sphere.radius()
    }
}

fn closest_on_segment_2d(point: &Vec2, start: &Vec2, end: &Vec2) -> Vec2 {
    let edge = end - start;
    let length_squared = edge.magnitude_squared();
    if length_squared <= f32::MIN_POSITIVE {
        return *start;
    }
    let t = ((point - start).dot(&edge) / length_squared).clamp(0.0, 1.0);
    start + edge * t
}

impl SupportMap for CollisionCylinder {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let local = self.frame.normal_world_to_local(direction);
        let flat = Vec3::new(local.x, 0.0, local.z);
        let radial = utils::normalize_or(&flat, Vec3::zeros());
        let top = Vec3::new(0.0, self.half_height, 0.0) + radial * self.top_radius;
        let bottom = Vec3::new(0.0, -self.half_height, 0.0) + radial * self.bottom_radius;
        let best = if top.dot(&local) >= bottom.dot(&local) { top } else { bottom };
        self.frame.local_to_world(&best)
    }

    fn center(&self) -> Vec3 {
        self.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    fn upright(half_height: f32, top: f32, bottom: f32) -> CollisionCylinder {
        CollisionCylinder::new(Vec3::zeros(), Quat::identity(), half_height, top, bottom)
    }

    #[test]
    fn test_taper_and_radius_profile() {
        let cone = upright(1.0, 0.0, 1.0);
        assert!(cone.is_tapered());
        assert_relative_eq!(cone.radius_at(-1.0), 1.0);
        assert_relative_eq!(cone.radius_at(0.0), 0.5);
        assert_relative_eq!(cone.radius_at(1.0), 0.0);
        assert!(!upright(1.0, 0.5, 0.5).is_tapered());
    }

    #[test]
    fn test_signed_distance_regions() {
        let cylinder = upright(1.0, 1.0, 1.0);
        assert_relative_eq!(cylinder.signed_distance(&Vec3::new(3.0, 0.0, 0.0)), 2.0);
        assert_relative_eq!(cylinder.signed_distance(&Vec3::new(0.0, 4.0, 0.0)), 3.0);
        assert_relative_eq!(cylinder.signed_distance(&Vec3::new(4.0, 5.0, 0.0)), 5.0);
        assert_relative_eq!(cylinder.signed_distance(&Vec3::new(0.0, 0.8, 0.0)), -0.2, epsilon = 1e-6);
        assert_relative_eq!(cylinder.normal_at_point(&Vec3::new(0.0, 0.8, 0.0)), Vec3::y());
        assert_relative_eq!(cylinder.normal_at_point(&Vec3::new(0.0, 0.2, -0.9)), -Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_cone_side_normal() {
        let cone = upright(1.0, 0.0, 1.0);
        let normal = cone.normal_at_point(&Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(normal, Vec3::new(2.0, 1.0, 0.0).normalize(), epsilon = 1e-6);
        assert!(cone.is_point_inside(&Vec3::new(0.4, 0.0, 0.0)));
        assert!(!cone.is_point_inside(&Vec3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn test_closest_point_lies_on_surface() {
        let cylinder = upright(1.0, 0.5, 1.5);
        for point in [Vec3::new(3.0, 0.2, 1.0), Vec3::new(0.1, -3.0, 0.0), Vec3::new(0.2, 0.1, 0.0)] {
            let surface = cylinder.closest_point_to(&point);
            assert!(cylinder.signed_distance(&surface).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rays() {
        let cylinder = upright(1.0, 1.0, 1.0);
        let side = cylinder.ray_hits(&Vec3::new(-5.0, 0.0, 0.0), &Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(side, 0.4, epsilon = 1e-6);
        let cap = cylinder.ray_hits(&Vec3::new(0.5, 5.0, 0.0), &Vec3::new(0.0, -10.0, 0.0)).unwrap();
        assert_relative_eq!(cap, 0.4, epsilon = 1e-6);
        assert!(cylinder.ray_hits(&Vec3::new(-5.0, 1.5, 0.0), &Vec3::new(10.0, 0.0, 0.0)).is_none());

        let cone = upright(1.0, 0.0, 1.0);
        let slanted = cone.ray_hits(&Vec3::new(-5.0, 0.0, 0.0), &Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(slanted, 0.45, epsilon = 1e-6);
    }

    #[test]
    fn test_enclosing_box_of_lying_cylinder() {
        let cylinder = CollisionCylinder::uniform(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::z_axis(), PI * 0.5),
            2.0,
            0.5,
        );
        let bounds = cylinder.enclosing_box();
        assert_relative_eq!(bounds.half_extents(), Vec3::new(2.0, 0.5, 0.5), epsilon = 1e-5);
        assert_relative_eq!(cylinder.enclosing_sphere().radius(), 4.25_f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_support_picks_rim() {
        let cylinder = upright(1.0, 0.5, 1.0);
        assert_relative_eq!(cylinder.support(&Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(cylinder.support(&Vec3::new(1.0, -0.1, 0.0)), Vec3::new(1.0, -1.0, 0.0));
    }
}
