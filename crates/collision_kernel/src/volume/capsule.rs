//! Capsule volume
//!
//! A capsule is the convex hull of two spheres on its local Y axis: the
//! bottom sphere at `-half_height` and the top sphere at `+half_height`.
//! Different end radii make it tapered (a rounded cone). Containment,
//! closest point and normal all come from the exact signed distance in the
//! meridian plane through the point.

use super::frame::{radial_split, Frame};
use super::oriented_box::CollisionBox;
use super::sphere::CollisionSphere;
use crate::detection::closest::segment_segment_distance_squared;
use crate::detection::gjk::SupportMap;
use crate::detection::ray::{cone_side_roots, first_in_unit_range, sphere_roots};
use crate::detection::SweepHit;
use crate::foundation::math::{tolerance, utils, Quat, Vec3};

/// Possibly tapered capsule along its local Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionCapsule {
    frame: Frame,
    orientation: Quat,
    half_height: f32,
    top_radius: f32,
    bottom_radius: f32,
    tapered: bool,
}

impl Default for CollisionCapsule {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity(), 1.0, 0.5, 0.5)
    }
}

/// Signed distance of a local point and the outward local normal there
#[derive(Debug, Clone, Copy)]
struct Probe {
    distance: f32,
    normal: Vec3,
}

impl CollisionCapsule {
    /// Creates a capsule; negative sizes are clamped to zero
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

    /// Untapered capsule
    pub fn uniform(position: Vec3, orientation: Quat, half_height: f32, radius: f32) -> Self {
        Self::new(position, orientation, half_height, radius, radius)
    }

    /// Capsule position (midpoint of the axis)
    pub fn position(&self) -> Vec3 {
        self.frame.origin()
    }

    /// Capsule orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Half the distance between the end sphere centers
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Radius of the end at `+half_height`
    pub fn top_radius(&self) -> f32 {
        self.top_radius
    }

    /// Radius of the end at `-half_height`
    pub fn bottom_radius(&self) -> f32 {
        self.bottom_radius
    }

    /// Whether the end radii differ
    pub fn is_tapered(&self) -> bool {
        self.tapered
    }

    /// Whether the axis differs from world Y
    pub fn is_oriented(&self) -> bool {
        self.frame.is_oriented()
    }

    /// Local frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Moves the capsule
    pub fn set_position(&mut self, position: Vec3) {
        self.frame.set_origin(position);
    }

    /// Rotates the capsule
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.frame = Frame::new(self.position(), orientation);
    }

    /// Changes the half height, clamping negatives to zero
    pub fn set_half_height(&mut self, half_height: f32) {
        self.half_height = utils::non_negative(half_height);
    }

    /// Changes both end radii, clamping negatives to zero
    pub fn set_radii(&mut self, top_radius: f32, bottom_radius: f32) {
        *self = Self::new(self.position(), self.orientation, self.half_height, top_radius, bottom_radius);
    }

    /// World center of the top end sphere
    pub fn top_center(&self) -> Vec3 {
        self.frame.local_to_world(&Vec3::new(0.0, self.half_height, 0.0))
    }

    /// World center of the bottom end sphere
    pub fn bottom_center(&self) -> Vec3 {
        self.frame.local_to_world(&Vec3::new(0.0, -self.half_height, 0.0))
    }

    /// The same capsule with both radii grown by `amount`
    #[must_use]
    pub fn inflated(&self, amount: f32) -> Self {
        Self::new(
            self.position(),
            self.orientation,
            self.half_height,
            self.top_radius + amount,
            self.bottom_radius + amount,
        )
    }

    /// Slope terms of the side: `(b, a)` with `b = (r_bottom - r_top) / height`
    /// and `a = sqrt(1 - b^2)`; `None` when one end sphere swallows the other
    fn side_slope(&self) -> Option<(f32, f32)> {
        let height = 2.0 * self.half_height;
        let difference = self.bottom_radius - self.top_radius;
        if height <= tolerance::POSITION_EPSILON || difference.abs() >= height {
            return None;
        }
        let b = difference / height;
        Some((b, (1.0 - b * b).sqrt()))
    }

    fn probe(&self, local: &Vec3) -> Probe {
        let h = self.half_height;
        let bottom = Vec3::new(0.0, -h, 0.0);
        let top = Vec3::new(0.0, h, 0.0);
        let around = |center: Vec3, radius: f32, fallback: Vec3| Probe {
            distance: (local - center).magnitude() - radius,
            normal: utils::normalize_or(&(local - center), fallback),
        };

        let Some((b, a)) = self.side_slope() else {
            return if self.bottom_radius >= self.top_radius {
                around(bottom, self.bottom_radius, -Vec3::y())
            } else {
                around(top, self.top_radius, Vec3::y())
            };
        };

        let (rho, radial) = radial_split(local);
        let y = local.y + h;
        let k = -b * rho + a * y;
        if k < 0.0 {
            around(bottom, self.bottom_radius, -Vec3::y())
        } else if k > a * 2.0 * h {
            around(top, self.top_radius, Vec3::y())
        } else {
            Probe {
                distance: a * rho + b * y - self.bottom_radius,
                normal: radial * a + Vec3::y() * b,
            }
        }
    }

    /// Signed distance to the surface, negative inside
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.probe(&self.frame.world_to_local(point)).distance
    }

    /// Whether `point` lies inside or on the capsule
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        self.signed_distance(point) <= 0.0
    }

    /// Closest point on the capsule surface
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        let local = self.frame.world_to_local(point);
        let probe = self.probe(&local);
        self.frame.local_to_world(&(local - probe.normal * probe.distance))
    }

    /// Outward normal of the surface point nearest to `point`
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        let probe = self.probe(&self.frame.world_to_local(point));
        self.frame.normal_local_to_world(&probe.normal)
    }

    /// Entry fraction of the segment `origin..origin + direction`
    ///
    /// Candidates are the crossings of both end spheres and of the cone
    /// side, each kept only on the part of the surface it actually forms.
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        let o = self.frame.world_to_local(origin);
        if self.probe(&o).distance <= 0.0 {
            return Some(0.0);
        }
        let v = self.frame.normal_world_to_local(direction);
        let h = self.half_height;
        let bottom = Vec3::new(0.0, -h, 0.0);
        let top = Vec3::new(0.0, h, 0.0);

        let Some((b, a)) = self.side_slope() else {
            let (center, radius) = if self.bottom_radius >= self.top_radius {
                (bottom, self.bottom_radius)
            } else {
                (top, self.top_radius)
            };
            let (enter, _) = sphere_roots(&o, &v, &center, radius)?;
            return (0.0..=1.0).contains(&enter).then_some(enter);
        };

        let k_at = |t: f32| {
            let p = o + v * t;
            let (rho, _) = radial_split(&p);
            -b * rho + a * (p.y + h)
        };
        let k_top = a * 2.0 * h;

        let mut candidates = [f32::NAN; 6];
        if let Some((t0, t1)) = sphere_roots(&o, &v, &bottom, self.bottom_radius) {
            candidates[0] = t0;
            candidates[1] = t1;
        }
        if let Some((t0, t1)) = sphere_roots(&o, &v, &top, self.top_radius) {
            candidates[2] = t0;
            candidates[3] = t1;
        }
        let rho0 = (self.bottom_radius - b * (o.y + h)) / a;
        let rho1 = -b * v.y / a;
        let [s0, s1] = cone_side_roots(&o, &v, rho0, rho1);
        candidates[4] = s0.unwrap_or(f32::NAN);
        candidates[5] = s1.unwrap_or(f32::NAN);

        let on_surface = |(index, t): &(usize, f32)| {
            let k = k_at(*t);
            match index {
                0 | 1 => k <= 0.0,
                2 | 3 => k >= k_top,
                _ => (0.0..=k_top).contains(&k),
            }
        };
        first_in_unit_range(
            candidates
                .into_iter()
                .enumerate()
                .filter(|(_, t)| !t.is_nan())
                .filter(on_surface)
                .map(|(_, t)| t),
        )
    }

    /// Sphere around the position reaching both ends
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        CollisionSphere::new(self.position(), self.half_height + self.top_radius.max(self.bottom_radius))
    }

    /// Axis-aligned bounds of both end spheres
    pub fn enclosing_box(&self) -> CollisionBox {
        let top = self.top_center();
        let bottom = self.bottom_center();
        let min = (top - Vec3::repeat(self.top_radius)).inf(&(bottom - Vec3::repeat(self.bottom_radius)));
        let max = (top + Vec3::repeat(self.top_radius)).sup(&(bottom + Vec3::repeat(self.bottom_radius)));
        CollisionBox::from_bounds(&min, &max)
    }

    /// Static overlap with a sphere
    pub fn hits_sphere(&self, sphere: &CollisionSphere) -> bool {
        self.signed_distance(&sphere.center()) <= sphere.radius()
    }

    /// Static overlap of two untapered capsules by axis segment distance;
    /// `None` when either is tapered
    pub fn hits_uniform_capsule(&self, other: &Self) -> Option<bool> {
        if self.tapered || other.tapered {
            return None;
        }
        let reach = self.top_radius + other.top_radius;
        let distance_squared = segment_segment_distance_squared(
            &self.bottom_center(),
            &self.top_center(),
            &other.bottom_center(),
            &other.top_center(),
        );
        Some(distance_squared <= reach * reach)
    }

    /// A sphere moving by `displacement` against this capsule
    ///
    /// The capsule grown by the sphere radius is again a capsule, so the
    /// sweep is the sphere center's ray against it.
    pub fn sphere_move_hits(&self, sphere: &CollisionSphere, displacement: &Vec3) -> Option<SweepHit> {
        let center = sphere.center();
        if self.hits_sphere(sphere) {
            return Some(SweepHit::touching(self.normal_at_point(&center)));
        }
        let lambda = self.inflated(sphere.radius()).ray_hits(&center, displacement)?;
        Some(SweepHit::new(lambda, self.normal_at_point(&(center + displacement * lambda))))
    }
}

impl SupportMap for CollisionCapsule {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let unit = utils::normalize_or(direction, Vec3::y());
        let top = self.top_center() + unit * self.top_radius;
        let bottom = self.bottom_center() + unit * self.bottom_radius;
        if top.dot(&unit) >= bottom.dot(&unit) { top } else { bottom }
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

    fn upright(half_height: f32, top: f32, bottom: f32) -> CollisionCapsule {
        CollisionCapsule::new(Vec3::zeros(), Quat::identity(), half_height, top, bottom)
    }

    #[test]
    fn test_taper_flag_and_clamping() {
        assert!(!upright(1.0, 0.5, 0.5).is_tapered());
        assert!(upright(1.0, 0.5, 0.8).is_tapered());
        let mut capsule = upright(-1.0, -0.5, 0.3);
        assert_eq!(capsule.half_height(), 0.0);
        assert_eq!(capsule.top_radius(), 0.0);
        capsule.set_radii(0.3, 0.3);
        assert!(!capsule.is_tapered());
    }

    #[test]
    fn test_uniform_signed_distance() {
        let capsule = upright(1.0, 0.5, 0.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(2.0, 0.0, 0.0)), 1.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(0.0, 3.0, 0.0)), 1.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::zeros()), -0.5);
        assert!(capsule.is_point_inside(&Vec3::new(0.0, 1.4, 0.0)));
        assert!(!capsule.is_point_inside(&Vec3::new(0.4, 1.4, 0.0)));
    }

    #[test]
    fn test_tapered_side_normal_leans_toward_small_end() {
        let capsule = upright(1.0, 0.25, 0.75);
        let normal = capsule.normal_at_point(&Vec3::new(2.0, 0.0, 0.0));
        assert!(normal.x > 0.0 && normal.y > 0.0);
        assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-6);
        // Surface point of the side: distance zero there.
        let surface = capsule.closest_point_to(&Vec3::new(2.0, 0.0, 0.0));
        assert!(capsule.signed_distance(&surface).abs() < 1e-5);
    }

    #[test]
    fn test_swallowed_end_is_a_sphere() {
        let capsule = upright(0.25, 0.1, 2.0);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(3.0, -0.25, 0.0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotated_capsule_lies_along_x() {
        let capsule = CollisionCapsule::uniform(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_axis_angle(&Vec3::z_axis(), PI * 0.5),
            2.0,
            0.5,
        );
        assert!(capsule.is_point_inside(&Vec3::new(2.3, 1.0, 0.0)));
        assert!(!capsule.is_point_inside(&Vec3::new(0.0, 1.6, 0.0)));
        let bounds = capsule.enclosing_box();
        assert_relative_eq!(bounds.half_extents(), Vec3::new(2.5, 0.5, 0.5), epsilon = 1e-5);
    }

    #[test]
    fn test_ray_hits_side_and_cap() {
        let capsule = upright(1.0, 0.5, 0.5);
        let side = capsule.ray_hits(&Vec3::new(-4.0, 0.5, 0.0), &Vec3::new(8.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(side, 3.5 / 8.0, epsilon = 1e-6);
        let cap = capsule.ray_hits(&Vec3::new(0.0, 5.0, 0.0), &Vec3::new(0.0, -8.0, 0.0)).unwrap();
        assert_relative_eq!(cap, 3.5 / 8.0, epsilon = 1e-6);
        assert!(capsule.ray_hits(&Vec3::new(-4.0, 0.5, 0.0), &Vec3::new(2.0, 0.0, 0.0)).is_none());
        assert_eq!(capsule.ray_hits(&Vec3::zeros(), &Vec3::x()), Some(0.0));
    }

    #[test]
    fn test_ray_hits_tapered_side() {
        let capsule = upright(1.0, 0.5, 1.0);
        let origin = Vec3::new(-4.0, 0.0, 0.0);
        let t = capsule.ray_hits(&origin, &Vec3::new(8.0, 0.0, 0.0)).unwrap();
        let point = origin + Vec3::new(8.0, 0.0, 0.0) * t;
        assert!(capsule.signed_distance(&point).abs() < 1e-4);
        assert!(point.x < -0.7 && point.x > -0.8);
    }

    #[test]
    fn test_uniform_pair_distance() {
        let a = upright(1.0, 0.5, 0.5);
        let b = CollisionCapsule::uniform(
            Vec3::new(0.9, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::x_axis(), PI * 0.5),
            1.0,
            0.5,
        );
        assert_eq!(a.hits_uniform_capsule(&b), Some(true));
        let c = CollisionCapsule::uniform(Vec3::new(1.1, 0.0, 0.0), Quat::identity(), 1.0, 0.5);
        assert_eq!(a.hits_uniform_capsule(&c), Some(false));
        assert_eq!(a.hits_uniform_capsule(&upright(1.0, 0.2, 0.5)), None);
    }

    #[test]
    fn test_sphere_sweep_against_side() {
        let capsule = upright(1.0, 0.5, 0.5);
        let sphere = CollisionSphere::new(Vec3::new(-5.0, 0.0, 0.0), 0.5);
        let hit = capsule.sphere_move_hits(&sphere, &Vec3::new(8.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 4.0 / 8.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1e-6);
    }
}
