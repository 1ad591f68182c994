//! Oriented box volume
//!
//! A box is a center, non-negative half-extents and an orientation. Boxes
//! whose orientation is the identity take axis-aligned fast paths.

use super::frame::Frame;
use super::sphere::CollisionSphere;
use super::Containment;
use crate::detection::gjk::SupportMap;
use crate::detection::ray::{first_in_unit_range, sphere_roots, slab_entry};
use crate::detection::sat::{candidate_axis, Interval, IntervalSweep};
use crate::detection::SweepHit;
use crate::foundation::math::{tolerance, utils, Quat, Vec3};

/// Box with half-extents along its three local axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    half_extents: Vec3,
    orientation: Quat,
    frame: Frame,
}

impl Default for CollisionBox {
    fn default() -> Self {
        Self::axis_aligned(Vec3::zeros(), Vec3::repeat(1.0))
    }
}

impl CollisionBox {
    /// Creates a box; negative half-extents are clamped to zero
    pub fn new(center: Vec3, half_extents: Vec3, orientation: Quat) -> Self {
        Self {
            half_extents: half_extents.map(utils::non_negative),
            orientation,
            frame: Frame::new(center, orientation),
        }
    }

    /// Creates a box aligned with the world axes
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center, half_extents, Quat::identity())
    }

    /// Smallest axis-aligned box holding both corners
    pub fn from_bounds(min: &Vec3, max: &Vec3) -> Self {
        Self::axis_aligned((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Box center
    pub fn center(&self) -> Vec3 {
        self.frame.origin()
    }

    /// Half-extents along the local axes
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Box orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Local frame of the box
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// World-space unit axis `index` (0 = X, 1 = Y, 2 = Z)
    pub fn axis(&self, index: usize) -> Vec3 {
        self.frame.axis(index)
    }

    /// False when the box is aligned with the world axes
    pub fn is_oriented(&self) -> bool {
        self.frame.is_oriented()
    }

    /// Moves the box
    pub fn set_center(&mut self, center: Vec3) {
        self.frame.set_origin(center);
    }

    /// Changes the half-extents, clamping negatives to zero
    pub fn set_half_extents(&mut self, half_extents: Vec3) {
        self.half_extents = half_extents.map(utils::non_negative);
    }

    /// Rotates the box and rebuilds its axes
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.frame = Frame::new(self.center(), orientation);
    }

    /// Minimum corner of an axis-aligned box
    pub fn min(&self) -> Vec3 {
        self.center() - self.half_extents
    }

    /// Maximum corner of an axis-aligned box
    pub fn max(&self) -> Vec3 {
        self.center() + self.half_extents
    }

    /// The eight corners in world space
    pub fn corners(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        std::array::from_fn(|i| {
            let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
            self.frame.local_to_world(&Vec3::new(sign(1) * h.x, sign(2) * h.y, sign(4) * h.z))
        })
    }

    /// Half-length of the box projected onto `axis`
    pub fn project_extents(&self, axis: &Vec3) -> f32 {
        self.frame.project_extents(axis, &self.half_extents)
    }

    /// Projection of the box onto `axis`
    pub fn interval(&self, axis: &Vec3) -> Interval {
        Interval::around(axis.dot(&self.center()), self.project_extents(axis))
    }

    /// Whether `point` lies inside or on the box
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        let local = self.frame.world_to_local(point);
        (0..3).all(|i| local[i].abs() <= self.half_extents[i])
    }

    /// Closest point on the box surface
    ///
    /// Outside points are clamped onto the box; inside points move out
    /// through the nearest face.
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        let h = self.half_extents;
        let mut local = self.frame.world_to_local(point);
        let outside = (0..3).any(|i| local[i].abs() > h[i]);
        if outside {
            for i in 0..3 {
                local[i] = local[i].clamp(-h[i], h[i]);
            }
        } else {
            let axis = Self::least_penetration_axis(&local, &h);
            local[axis] = if local[axis] < 0.0 { -h[axis] } else { h[axis] };
        }
        self.frame.local_to_world(&local)
    }

    fn least_penetration_axis(local: &Vec3, half_extents: &Vec3) -> usize {
        (0..3)
            .min_by(|&a, &b| {
                let depth_a = half_extents[a] - local[a].abs();
                let depth_b = half_extents[b] - local[b].abs();
                depth_a.total_cmp(&depth_b)
            })
            .unwrap_or(0)
    }

    /// Outward surface normal for a point on or near the box
    ///
    /// On a face this is the face axis. On an edge or corner it is the
    /// direction from the box to the point, or the sum of the touching face
    /// axes when that direction is degenerate. Inside, it is the axis of the
    /// nearest face.
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        let h = self.half_extents;
        let local = self.frame.world_to_local(point);
        let sides = local.zip_map(&h, |p, h| {
            if p >= h - tolerance::POSITION_EPSILON {
                1.0
            } else if p <= -h + tolerance::POSITION_EPSILON {
                -1.0
            } else {
                0.0
            }
        });
        let side_count = sides.iter().filter(|s| **s != 0.0).count();

        let local_normal = match side_count {
            0 => {
                let axis = Self::least_penetration_axis(&local, &h);
                let mut normal = Vec3::zeros();
                normal[axis] = if local[axis] < 0.0 { -1.0 } else { 1.0 };
                normal
            }
            1 => sides,
            _ => {
                let clamped = local.zip_map(&h, |p, h| p.clamp(-h, h));
                let offset = local - clamped;
                if offset.magnitude() < tolerance::POSITION_EPSILON {
                    sides.normalize()
                } else {
                    offset.normalize()
                }
            }
        };
        self.frame.normal_local_to_world(&local_normal)
    }

    /// Entry fraction of the segment `origin..origin + direction`
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        let local_origin = self.frame.world_to_local(origin);
        let local_direction = self.frame.normal_world_to_local(direction);
        slab_entry(&local_origin, &local_direction, &self.half_extents)
    }

    /// Sphere through the corners
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        CollisionSphere::new(self.center(), self.half_extents.magnitude())
    }

    /// Axis-aligned box around the (possibly rotated) box
    pub fn enclosing_box(&self) -> Self {
        if !self.is_oriented() {
            return Self::axis_aligned(self.center(), self.half_extents);
        }
        let half = Vec3::from_fn(|i, _| {
            (0..3)
                .map(|j| self.frame.axis(j)[i].abs() * self.half_extents[j])
                .sum()
        });
        Self::axis_aligned(self.center(), half)
    }

    /// Squared distance from `point` to the solid box
    pub fn distance_squared_to(&self, point: &Vec3) -> f32 {
        let local = self.frame.world_to_local(point);
        (0..3)
            .map(|i| {
                let excess = local[i].abs() - self.half_extents[i];
                if excess > 0.0 { excess * excess } else { 0.0 }
            })
            .sum()
    }

    /// Static overlap with a sphere
    pub fn hits_sphere(&self, sphere: &CollisionSphere) -> bool {
        self.distance_squared_to(&sphere.center()) <= sphere.square_radius()
    }

    /// Static overlap with another box
    ///
    /// Axis-aligned pairs compare per-axis extents; otherwise the 15 box
    /// separating axes are tried.
    pub fn hits_box(&self, other: &Self) -> bool {
        let offset = other.center() - self.center();
        if !self.is_oriented() && !other.is_oriented() {
            return (0..3).all(|i| offset[i].abs() <= self.half_extents[i] + other.half_extents[i]);
        }
        box_pair_axes(&self.frame, &other.frame)
            .all(|axis| offset.dot(&axis).abs() <= self.project_extents(&axis) + other.project_extents(&axis))
    }

    /// A ball of `radius` centered at `center`, moving by `displacement`
    /// against this fixed box
    ///
    /// Works in the box frame. The first contact is the earliest touch of a
    /// face the ball approaches from outside, one of the twelve edges, or
    /// one of the eight corners.
    pub fn swept_ball_hits(&self, center: &Vec3, radius: f32, displacement: &Vec3) -> Option<SweepHit> {
        if self.distance_squared_to(center) <= radius * radius {
            return Some(SweepHit::touching(self.normal_at_point(center)));
        }

        let h = self.half_extents;
        let start = self.frame.world_to_local(center);
        let motion = self.frame.normal_world_to_local(displacement);
        let at = |t: f32| start + motion * t;
        let signs = [-1.0_f32, 1.0];

        let mut candidates: Vec<f32> = Vec::with_capacity(26);

        for i in 0..3 {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            for side in signs {
                let outside = side * start[i] - (h[i] + radius);
                if outside <= 0.0 {
                    continue;
                }
                // Separated along this axis for good unless moving back.
                let approach = side * motion[i];
                if approach >= -tolerance::SPEED_EPSILON {
                    return None;
                }
                let t = -outside / approach;
                if t > tolerance::NO_COLLISION {
                    return None;
                }
                let p = at(t);
                if p[j].abs() <= h[j] && p[k].abs() <= h[k] {
                    candidates.push(t);
                }
            }
        }

        // Edges run along axis i at (side_j * h_j, side_k * h_k).
        for i in 0..3 {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            let a = motion[j] * motion[j] + motion[k] * motion[k];
            if a < tolerance::SPEED_EPSILON {
                continue;
            }
            for side_j in signs {
                for side_k in signs {
                    let oj = start[j] - side_j * h[j];
                    let ok = start[k] - side_k * h[k];
                    let b = 2.0 * (oj * motion[j] + ok * motion[k]);
                    let c = oj * oj + ok * ok - radius * radius;
                    if let Some((t, _)) = utils::solve_quadratic(a, b, c) {
                        if at(t)[i].abs() <= h[i] {
                            candidates.push(t);
                        }
                    }
                }
            }
        }

        for corner in 0..8 {
            let side = |bit: usize| if corner & bit == 0 { -1.0 } else { 1.0 };
            let position = Vec3::new(side(1) * h.x, side(2) * h.y, side(4) * h.z);
            if let Some((t, _)) = sphere_roots(&start, &motion, &position, radius) {
                candidates.push(t);
            }
        }

        let lambda = first_in_unit_range(candidates)?;
        let contact = center + displacement * lambda;
        Some(SweepHit::new(lambda, self.normal_at_point(&contact)))
    }

    /// A sphere moving by `displacement` against this fixed box
    pub fn sphere_move_hits(&self, sphere: &CollisionSphere, displacement: &Vec3) -> Option<SweepHit> {
        self.swept_ball_hits(&sphere.center(), sphere.radius(), displacement)
    }

    /// A point moving by `displacement` against this fixed box
    pub fn point_move_hits(&self, point: &Vec3, displacement: &Vec3) -> Option<SweepHit> {
        self.swept_ball_hits(point, 0.0, displacement)
    }

    /// `moving` translated by `displacement` against this fixed box
    ///
    /// Interval sweep over the box separating axes: the contact starts at
    /// the latest axis entry, provided no axis has been left before then.
    pub fn box_move_hits(&self, moving: &Self, displacement: &Vec3) -> Option<SweepHit> {
        let mut sweep = IntervalSweep::new();
        let axis_count = if self.is_oriented() || moving.is_oriented() { 15 } else { 3 };
        for axis in box_pair_axes(&moving.frame, &self.frame).take(axis_count) {
            if !sweep.add_axis(&axis, moving.interval(&axis), self.interval(&axis), displacement.dot(&axis)) {
                return None;
            }
        }
        sweep.finish()
    }

    /// Relation of `other` to this box, both treated as axis-aligned
    pub fn classify_aabb(&self, other: &Self) -> Containment {
        let (outer_min, outer_max) = (self.min(), self.max());
        let (inner_min, inner_max) = (other.min(), other.max());
        if (0..3).any(|i| inner_max[i] < outer_min[i] || inner_min[i] > outer_max[i]) {
            return Containment::Outside;
        }
        if (0..3).all(|i| inner_min[i] >= outer_min[i] && inner_max[i] <= outer_max[i]) {
            Containment::Inside
        } else {
            Containment::Partial
        }
    }
}

/// The 15 separating axes of two boxes: 3 + 3 face axes, then the edge
/// cross products that are not degenerate
fn box_pair_axes<'a>(a: &'a Frame, b: &'a Frame) -> impl Iterator<Item = Vec3> + 'a {
    let faces = a.axes().iter().chain(b.axes().iter()).copied();
    let edges = a
        .axes()
        .iter()
        .flat_map(move |edge_a| b.axes().iter().map(move |edge_b| edge_a.cross(edge_b)))
        .filter_map(|axis| candidate_axis(&axis));
    faces.chain(edges)
}

impl SupportMap for CollisionBox {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let local = self.frame.normal_world_to_local(direction);
        let corner = local.zip_map(&self.half_extents, |d, h| if d >= 0.0 { h } else { -h });
        self.frame.local_to_world(&corner)
    }

    fn center(&self) -> Vec3 {
        self.frame.origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    fn unit_box(center: Vec3) -> CollisionBox {
        CollisionBox::axis_aligned(center, Vec3::repeat(1.0))
    }

    fn tilted_box(center: Vec3) -> CollisionBox {
        CollisionBox::new(center, Vec3::repeat(1.0), Quat::from_axis_angle(&Vec3::z_axis(), PI * 0.25))
    }

    #[test]
    fn test_negative_extents_clamped() {
        let mut cube = CollisionBox::axis_aligned(Vec3::zeros(), Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(cube.half_extents(), Vec3::new(0.0, 2.0, 0.0));
        cube.set_half_extents(Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(cube.half_extents(), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_orientation_setter_rebuilds_axes() {
        let mut cube = unit_box(Vec3::new(1.0, 2.0, 3.0));
        assert!(!cube.is_oriented());
        cube.set_orientation(Quat::from_axis_angle(&Vec3::y_axis(), PI * 0.5));
        assert!(cube.is_oriented());
        assert_relative_eq!(cube.axis(0), -Vec3::z(), epsilon = 1e-6);
        assert_relative_eq!(cube.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_sphere_overlap() {
        let cube = unit_box(Vec3::zeros());
        assert!(cube.hits_sphere(&CollisionSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.6)));
        assert!(!cube.hits_sphere(&CollisionSphere::new(Vec3::new(1.5, 1.5, 0.0), 0.6)));
        assert!(cube.hits_sphere(&CollisionSphere::new(Vec3::new(1.5, 1.5, 0.0), 0.75)));
    }

    #[test]
    fn test_box_overlap_axis_aligned_and_rotated() {
        let a = unit_box(Vec3::zeros());
        assert!(a.hits_box(&unit_box(Vec3::new(2.0, 0.0, 0.0))));
        assert!(!a.hits_box(&unit_box(Vec3::new(2.1, 0.0, 0.0))));

        // Diamond reaches sqrt(2) along X.
        assert!(a.hits_box(&tilted_box(Vec3::new(2.3, 0.0, 0.0))));
        assert!(!a.hits_box(&tilted_box(Vec3::new(2.5, 0.0, 0.0))));
        // Separated only along a face diagonal of the tilted box.
        assert!(!a.hits_box(&tilted_box(Vec3::new(2.2, 2.2, 0.0))));
    }

    #[test]
    fn test_box_sweep_face_contact() {
        let a = unit_box(Vec3::zeros());
        let b = unit_box(Vec3::new(3.0, 0.0, 0.0));
        let hit = b.box_move_hits(&a, &Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1e-6);

        assert!(b.box_move_hits(&a, &Vec3::new(0.9, 0.0, 0.0)).is_none());
        assert!(b.box_move_hits(&a, &Vec3::new(2.0, 2.5, 0.0)).is_none());
    }

    #[test]
    fn test_box_sweep_with_rotation() {
        let moving = tilted_box(Vec3::zeros());
        let fixed = unit_box(Vec3::new(4.0, 0.0, 0.0));
        let hit = fixed.box_move_hits(&moving, &Vec3::new(4.0, 0.0, 0.0)).unwrap();
        // Diamond tip at sqrt(2) meets the face at x = 3.
        assert_relative_eq!(hit.lambda, (3.0 - 2.0_f32.sqrt()) / 4.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_concentric_boxes_touch_at_start() {
        let a = unit_box(Vec3::zeros());
        let hit = a.box_move_hits(&a, &Vec3::new(0.0, 7.0, 0.0)).unwrap();
        assert_eq!(hit.lambda, 0.0);
        assert_relative_eq!(hit.normal.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_sweep_face_edge_corner() {
        let cube = unit_box(Vec3::zeros());

        let face = cube
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(-4.0, 0.5, 0.0), 1.0), &Vec3::new(4.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(face.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(face.normal, -Vec3::x(), epsilon = 1e-6);

        // Slides past the +X+Y edge: contact when the center is 1 away from it.
        let edge = cube
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(4.0, 1.5, 0.0), 1.0), &Vec3::new(-4.0, 0.0, 0.0))
            .unwrap();
        let expected_x = 1.0 + (1.0_f32 - 0.25).sqrt();
        assert_relative_eq!(edge.lambda, (4.0 - expected_x) / 4.0, epsilon = 1e-5);
        assert!(edge.normal.x > 0.0 && edge.normal.y > 0.0 && edge.normal.z.abs() < 1e-5);

        let corner = cube
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(3.0, 3.0, 3.0), 0.5), &Vec3::new(-3.0, -3.0, -3.0))
            .unwrap();
        let travel = 2.0 * 3.0_f32.sqrt() - 0.5;
        assert_relative_eq!(corner.lambda, travel / (3.0 * 3.0_f32.sqrt()), epsilon = 1e-5);
        assert_relative_eq!(corner.normal, Vec3::repeat(1.0).normalize(), epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_sweep_crossing_to_far_edge() {
        // Starts above y = 0 and dives past it onto the +X-Y edge
        let cube = unit_box(Vec3::zeros());
        let ball = CollisionSphere::new(Vec3::new(5.0, 0.5, 0.0), 0.5);
        let hit = cube.sphere_move_hits(&ball, &Vec3::new(-4.0, -2.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.9, epsilon = 1e-5);
        assert_relative_eq!(hit.normal, Vec3::new(0.8, -0.6, 0.0), epsilon = 1e-4);

        // Same path, box turned upside down about X
        let flipped = CollisionBox::new(Vec3::zeros(), Vec3::repeat(1.0), Quat::from_axis_angle(&Vec3::x_axis(), PI));
        let hit = flipped.sphere_move_hits(&ball, &Vec3::new(-4.0, -2.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.9, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_sweep_from_inside() {
        let cube = CollisionBox::axis_aligned(Vec3::zeros(), Vec3::new(2.0, 1.0, 3.0));
        let hit = cube
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(0.2, 0.1, 0.0), 0.1), &Vec3::x())
            .unwrap();
        assert_eq!(hit.lambda, 0.0);
        assert_relative_eq!(hit.normal, Vec3::y());
    }

    #[test]
    fn test_point_sweep() {
        let cube = tilted_box(Vec3::new(0.0, 0.0, 5.0));
        let hit = cube.point_move_hits(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.4, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, -Vec3::z(), epsilon = 1e-6);
        assert!(cube.point_move_hits(&Vec3::new(3.0, 0.0, 0.0), &Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn test_normal_at_point_cases() {
        let cube = unit_box(Vec3::zeros());
        assert_relative_eq!(cube.normal_at_point(&Vec3::new(1.0, 0.2, -0.3)), Vec3::x());
        assert_relative_eq!(cube.normal_at_point(&Vec3::new(0.1, 0.9, 0.0)), Vec3::y());
        let edge = cube.normal_at_point(&Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(edge, Vec3::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-6);
        let outside = cube.normal_at_point(&Vec3::new(2.0, 3.0, 0.0));
        assert_relative_eq!(outside, Vec3::new(1.0, 2.0, 0.0).normalize(), epsilon = 1e-6);
        assert_relative_eq!(cube.normal_at_point(&Vec3::zeros()).magnitude(), 1.0);
    }

    #[test]
    fn test_closest_point_and_rays() {
        let cube = unit_box(Vec3::zeros());
        assert_relative_eq!(cube.closest_point_to(&Vec3::new(3.0, 0.5, -4.0)), Vec3::new(1.0, 0.5, -1.0));
        assert_relative_eq!(cube.closest_point_to(&Vec3::new(0.1, -0.8, 0.0)), Vec3::new(0.1, -1.0, 0.0));

        let tilted = tilted_box(Vec3::zeros());
        let entry = tilted.ray_hits(&Vec3::new(-4.0, 0.0, 0.0), &Vec3::new(8.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(entry, (4.0 - 2.0_f32.sqrt()) / 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_enclosing_volumes() {
        let tilted = tilted_box(Vec3::new(1.0, 0.0, 0.0));
        let aabb = tilted.enclosing_box();
        assert!(!aabb.is_oriented());
        assert_relative_eq!(aabb.half_extents(), Vec3::new(2.0_f32.sqrt(), 2.0_f32.sqrt(), 1.0), epsilon = 1e-5);
        assert_relative_eq!(tilted.enclosing_sphere().radius(), 3.0_f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_classify_aabb() {
        let outer = CollisionBox::axis_aligned(Vec3::zeros(), Vec3::repeat(4.0));
        assert_eq!(outer.classify_aabb(&unit_box(Vec3::zeros())), Containment::Inside);
        assert_eq!(outer.classify_aabb(&unit_box(Vec3::new(4.0, 0.0, 0.0))), Containment::Partial);
        assert_eq!(outer.classify_aabb(&unit_box(Vec3::new(6.0, 0.0, 0.0))), Containment::Outside);
    }
}
