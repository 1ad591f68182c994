//! Triangle volume
//!
//! Triangles are infinitely thin: nothing is ever inside one, so only
//! surface queries and intersections apply. The normal follows the corner
//! winding, `(c2 - c1) x (c3 - c2)`.

use super::oriented_box::CollisionBox;
use super::sphere::CollisionSphere;
use crate::detection::closest::{closest_point_on_triangle_edges, point_in_triangle};
use crate::detection::gjk::SupportMap;
use crate::detection::ray::{first_in_unit_range, sphere_roots};
use crate::detection::sat::{candidate_axis, Interval, IntervalSweep};
use crate::detection::SweepHit;
use crate::foundation::math::{tolerance, utils, Vec3};

/// Triangle with cached plane and edge directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionTriangle {
    corners: [Vec3; 3],
    normal: Vec3,
    edges: [Vec3; 3],
    distance: f32,
}

impl Default for CollisionTriangle {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::x(), Vec3::y())
    }
}

impl CollisionTriangle {
    /// Creates a triangle from three corners
    pub fn new(corner1: Vec3, corner2: Vec3, corner3: Vec3) -> Self {
        let mut triangle = Self {
            corners: [corner1, corner2, corner3],
            normal: Vec3::z(),
            edges: [Vec3::zeros(); 3],
            distance: 0.0,
        };
        triangle.update_plane();
        triangle
    }

    fn update_plane(&mut self) {
        let [c1, c2, c3] = self.corners;
        // Collinear corners have no plane; any fixed unit normal keeps the
        // separating axis tests sound.
        self.normal = utils::normalize_or(&(c2 - c1).cross(&(c3 - c2)), Vec3::y());
        self.edges = [
            utils::normalize_or(&(c2 - c1), Vec3::zeros()),
            utils::normalize_or(&(c3 - c2), Vec3::zeros()),
            utils::normalize_or(&(c1 - c3), Vec3::zeros()),
        ];
        self.distance = self.normal.dot(&c1);
    }

    /// The three corners
    pub fn corners(&self) -> &[Vec3; 3] {
        &self.corners
    }

    /// Unit face normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Unit edge directions `c1 -> c2`, `c2 -> c3`, `c3 -> c1`
    pub fn edges(&self) -> &[Vec3; 3] {
        &self.edges
    }

    /// Plane offset, `normal . corner1`
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Average of the corners
    pub fn centroid(&self) -> Vec3 {
        (self.corners[0] + self.corners[1] + self.corners[2]) / 3.0
    }

    /// Replaces all corners and recomputes the plane
    pub fn set_corners(&mut self, corner1: Vec3, corner2: Vec3, corner3: Vec3) {
        self.corners = [corner1, corner2, corner3];
        self.update_plane();
    }

    /// Signed distance from the triangle plane
    pub fn plane_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Always false; a triangle has no interior
    pub fn is_point_inside(&self, _point: &Vec3) -> bool {
        false
    }

    /// Closest point on the triangle
    ///
    /// The plane projection when it lands inside, otherwise the nearest
    /// point on the edges.
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        let projected = point - self.normal * self.plane_distance(point);
        if point_in_triangle(&projected, &self.corners, &self.normal) {
            projected
        } else {
            closest_point_on_triangle_edges(point, &self.corners)
        }
    }

    /// Face normal on the side of `point`
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        if self.plane_distance(point) < 0.0 { -self.normal } else { self.normal }
    }

    /// Entry fraction of the segment `origin..origin + direction`
    ///
    /// Möller-Trumbore, with the direction left at its segment length so `t`
    /// comes out as a fraction.
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        let [v0, v1, v2] = self.corners;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = direction.cross(&edge2);
        let a = edge1.dot(&h);
        if a.abs() < tolerance::PARALLEL_EPSILON * direction.magnitude() * edge1.magnitude() * edge2.magnitude() {
            return None;
        }

        let f = 1.0 / a;
        let s = origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (0.0..=1.0).contains(&t).then_some(t)
    }

    /// Sphere around the centroid reaching every corner
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        let center = self.centroid();
        let radius = self
            .corners
            .iter()
            .map(|corner| (corner - center).magnitude())
            .fold(0.0, f32::max);
        CollisionSphere::new(center, radius)
    }

    /// Axis-aligned bounds of the corners
    pub fn enclosing_box(&self) -> CollisionBox {
        let [c1, c2, c3] = self.corners;
        CollisionBox::from_bounds(&c1.inf(&c2).inf(&c3), &c1.sup(&c2).sup(&c3))
    }

    /// Projection of the triangle onto `axis`
    pub fn interval(&self, axis: &Vec3) -> Interval {
        Interval::of_points(axis, &self.corners)
    }

    /// Static overlap with a sphere
    pub fn hits_sphere(&self, sphere: &CollisionSphere) -> bool {
        let center = sphere.center();
        (self.closest_point_to(&center) - center).magnitude_squared() <= sphere.square_radius()
    }

    /// Static overlap with a box
    ///
    /// Separating axes: the face normal, the three box axes and the nine
    /// products of triangle edges with box axes.
    pub fn hits_box(&self, cube: &CollisionBox) -> bool {
        self.box_axes(cube)
            .all(|axis| cube.interval(&axis).overlaps(&self.interval(&axis)))
    }

    /// Static overlap with another triangle
    ///
    /// Both face normals, the nine edge products, and the in-plane edge
    /// normals that separate coplanar triangles.
    pub fn hits_triangle(&self, other: &Self) -> bool {
        self.triangle_axes(other)
            .all(|axis| self.interval(&axis).overlaps(&other.interval(&axis)))
    }

    fn box_axes<'a>(&'a self, cube: &'a CollisionBox) -> impl Iterator<Item = Vec3> + 'a {
        let edge_products = self.edges.iter().flat_map(move |edge| {
            cube.frame().axes().iter().map(move |axis| edge.cross(axis))
        });
        std::iter::once(self.normal)
            .chain(cube.frame().axes().iter().copied())
            .chain(edge_products.filter_map(|axis| candidate_axis(&axis)))
    }

    fn triangle_axes<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = Vec3> + 'a {
        let edge_products = self
            .edges
            .iter()
            .flat_map(move |a| other.edges.iter().map(move |b| a.cross(b)));
        let own_in_plane = self.edges.iter().map(move |edge| self.normal.cross(edge));
        let other_in_plane = other.edges.iter().map(move |edge| other.normal.cross(edge));
        [self.normal, other.normal]
            .into_iter()
            .chain(edge_products.chain(own_in_plane).chain(other_in_plane).filter_map(|axis| candidate_axis(&axis)))
    }

    /// A point moving by `displacement` against this triangle
    ///
    /// Crosses the plane, then keeps the crossing only when it lies inside
    /// the triangle. The normal faces the side the point came from.
    pub fn point_move_hits(&self, point: &Vec3, displacement: &Vec3) -> Option<SweepHit> {
        let start = self.plane_distance(point);
        let approach = displacement.dot(&self.normal);
        let facing = if approach > 0.0 { -self.normal } else { self.normal };

        if start.abs() <= tolerance::POSITION_EPSILON {
            return point_in_triangle(point, &self.corners, &self.normal)
                .then_some(SweepHit::touching(facing));
        }
        if approach.abs() < tolerance::PARALLEL_EPSILON {
            return None;
        }
        let lambda = -start / approach;
        if !(0.0..=tolerance::NO_COLLISION).contains(&lambda) {
            return None;
        }
        let crossing = point + displacement * lambda;
        point_in_triangle(&crossing, &self.corners, &self.normal).then(|| SweepHit::new(lambda, facing))
    }

    /// A sphere moving by `displacement` against this triangle
    ///
    /// The triangle grown by the radius is a slab, three edge cylinders and
    /// three corner spheres; the first contact is the earliest entry into
    /// any of them.
    pub fn sphere_move_hits(&self, sphere: &CollisionSphere, displacement: &Vec3) -> Option<SweepHit> {
        let center = sphere.center();
        let radius = sphere.radius();
        let facing = if displacement.dot(&self.normal) > 0.0 { -self.normal } else { self.normal };

        let closest = self.closest_point_to(&center);
        if (center - closest).magnitude_squared() <= radius * radius {
            return Some(SweepHit::touching(utils::normalize_or(&(center - closest), facing)));
        }

        let mut candidates = [f32::NAN; 7];

        let start = self.plane_distance(&center);
        let approach = displacement.dot(&self.normal);
        if approach.abs() >= tolerance::PARALLEL_EPSILON && start.abs() > radius {
            let t = (radius.copysign(start) - start) / approach;
            let touch = center + displacement * t;
            let projected = touch - self.normal * self.plane_distance(&touch);
            if point_in_triangle(&projected, &self.corners, &self.normal) {
                candidates[0] = t;
            }
        }

        for i in 0..3 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 3];
            candidates[1 + i] = edge_cylinder_entry(&center, displacement, &a, &b, radius).unwrap_or(f32::NAN);
            candidates[4 + i] = sphere_roots(&center, displacement, &a, radius).map_or(f32::NAN, |(t, _)| t);
        }

        let lambda = first_in_unit_range(candidates.into_iter().filter(|t| !t.is_nan()))?;
        let touch = center + displacement * lambda;
        let normal = utils::normalize_or(&(touch - self.closest_point_to(&touch)), facing);
        Some(SweepHit::new(lambda, normal))
    }

    /// A box moving by `displacement` against this triangle
    ///
    /// Interval sweep over the same axes as the static test; the contact
    /// begins at the latest axis entry unless some axis was already left.
    pub fn box_move_hits(&self, cube: &CollisionBox, displacement: &Vec3) -> Option<SweepHit> {
        let mut sweep = IntervalSweep::new();
        for axis in self.box_axes(cube) {
            let moving = cube.interval(&axis);
            if !sweep.add_axis(&axis, moving, self.interval(&axis), displacement.dot(&axis)) {
                return None;
            }
        }
        sweep.finish()
    }

    /// Another triangle moving by `displacement` against this one
    pub fn triangle_move_hits(&self, other: &Self, displacement: &Vec3) -> Option<SweepHit> {
        let mut sweep = IntervalSweep::new();
        for axis in self.triangle_axes(other) {
            if !sweep.add_axis(&axis, other.interval(&axis), self.interval(&axis), displacement.dot(&axis)) {
                return None;
            }
        }
        sweep.finish()
    }
}

/// Entry of a moving point into the side of the cylinder of `radius` around
/// the segment `a..b`, counted only between the segment ends
fn edge_cylinder_entry(origin: &Vec3, direction: &Vec3, a: &Vec3, b: &Vec3, radius: f32) -> Option<f32> {
    let axis = b - a;
    let length = axis.magnitude();
    if length < tolerance::POSITION_EPSILON {
        return None;
    }
    let axis = axis / length;
    let offset = origin - a;
    let offset_perp = offset - axis * offset.dot(&axis);
    let direction_perp = direction - axis * direction.dot(&axis);

    let qa = direction_perp.magnitude_squared();
    if qa < tolerance::SPEED_EPSILON {
        return None;
    }
    let qb = 2.0 * offset_perp.dot(&direction_perp);
    let qc = offset_perp.magnitude_squared() - radius * radius;
    let (t, _) = utils::solve_quadratic(qa, qb, qc)?;
    let along = (offset + direction * t).dot(&axis);
    (0.0..=length).contains(&along).then_some(t)
}

impl SupportMap for CollisionTriangle {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let mut best = self.corners[0];
        for corner in &self.corners[1..] {
            if corner.dot(direction) > best.dot(direction) {
                best = *corner;
            }
        }
        best
    }

    fn center(&self) -> Vec3 {
        self.centroid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::PI, Quat};
    use approx::assert_relative_eq;

    fn floor_triangle() -> CollisionTriangle {
        CollisionTriangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_derived_plane() {
        let triangle = floor_triangle();
        assert_relative_eq!(triangle.normal(), Vec3::z());
        assert_relative_eq!(triangle.edges()[0], Vec3::x());
        assert_relative_eq!(triangle.distance(), 0.0);
        assert!(!triangle.is_point_inside(&Vec3::zeros()));
    }

    #[test]
    fn test_set_corners_recomputes_plane() {
        let mut triangle = floor_triangle();
        triangle.set_corners(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 1.0, 2.0), Vec3::new(1.0, 0.0, 2.0));
        assert_relative_eq!(triangle.normal(), -Vec3::z());
        assert_relative_eq!(triangle.distance(), -2.0);
    }

    #[test]
    fn test_point_falls_through_center() {
        let triangle = floor_triangle();
        let hit = triangle
            .point_move_hits(&Vec3::new(0.0, 0.0, 2.0), &Vec3::new(0.0, 0.0, -4.0))
            .unwrap();
        assert_relative_eq!(hit.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vec3::z());
        let crossing = Vec3::new(0.0, 0.0, 2.0) + Vec3::new(0.0, 0.0, -4.0) * hit.lambda;
        assert_relative_eq!(triangle.closest_point_to(&crossing), crossing, epsilon = 1e-6);
    }

    #[test]
    fn test_point_misses_outside_or_short() {
        let triangle = floor_triangle();
        assert!(triangle.point_move_hits(&Vec3::new(0.9, 0.9, 2.0), &Vec3::new(0.0, 0.0, -4.0)).is_none());
        assert!(triangle.point_move_hits(&Vec3::new(0.0, 0.0, 2.0), &Vec3::new(0.0, 0.0, -1.0)).is_none());
        assert!(triangle.point_move_hits(&Vec3::new(0.0, 0.0, 2.0), &Vec3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_closest_point_and_sphere() {
        let triangle = floor_triangle();
        assert_relative_eq!(triangle.closest_point_to(&Vec3::new(0.0, 0.0, 3.0)), Vec3::zeros());
        assert_relative_eq!(triangle.closest_point_to(&Vec3::new(0.0, -3.0, 1.0)), Vec3::new(0.0, -1.0, 0.0));
        assert!(triangle.hits_sphere(&CollisionSphere::new(Vec3::new(0.0, 0.0, 0.9), 1.0)));
        assert!(!triangle.hits_sphere(&CollisionSphere::new(Vec3::new(0.0, -2.5, 0.0), 1.0)));
    }

    #[test]
    fn test_sphere_sweep_onto_face_and_edge() {
        let triangle = floor_triangle();
        let face = triangle
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0), &Vec3::new(0.0, 0.0, -4.0))
            .unwrap();
        assert_relative_eq!(face.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(face.normal, Vec3::z(), epsilon = 1e-6);

        // Center passes 0.5 below the y = -1 edge; contact at sqrt(0.75) above it.
        let edge = triangle
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(0.0, -1.5, 3.0), 1.0), &Vec3::new(0.0, 0.0, -4.0))
            .unwrap();
        assert_relative_eq!(edge.lambda, (3.0 - 0.75_f32.sqrt()) / 4.0, epsilon = 1e-5);
        assert!(edge.normal.y < 0.0 && edge.normal.z > 0.0);

        assert!(triangle
            .sphere_move_hits(&CollisionSphere::new(Vec3::new(0.0, -2.5, 3.0), 1.0), &Vec3::new(0.0, 0.0, -4.0))
            .is_none());
    }

    #[test]
    fn test_box_overlap() {
        let triangle = floor_triangle();
        assert!(triangle.hits_box(&CollisionBox::axis_aligned(Vec3::new(0.0, 0.0, 0.5), Vec3::repeat(0.6))));
        assert!(!triangle.hits_box(&CollisionBox::axis_aligned(Vec3::new(0.0, 0.0, 0.7), Vec3::repeat(0.6))));
        // Diamond just off the slanted edge.
        let rotated = CollisionBox::new(
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.3, 0.3, 0.3),
            Quat::from_axis_angle(&Vec3::z_axis(), PI * 0.25),
        );
        assert!(!triangle.hits_box(&rotated));
    }

    #[test]
    fn test_box_sweep_lands_on_face() {
        let triangle = floor_triangle();
        let cube = CollisionBox::axis_aligned(Vec3::new(0.0, 0.0, 2.5), Vec3::repeat(0.5));
        let hit = triangle.box_move_hits(&cube, &Vec3::new(0.0, 0.0, -4.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vec3::z(), epsilon = 1e-6);

        let beside = CollisionBox::axis_aligned(Vec3::new(3.0, 0.0, 2.5), Vec3::repeat(0.5));
        assert!(triangle.box_move_hits(&beside, &Vec3::new(0.0, 0.0, -4.0)).is_none());
    }

    #[test]
    fn test_triangles_coplanar_and_crossing() {
        let triangle = floor_triangle();
        let shifted = CollisionTriangle::new(
            Vec3::new(1.5, 0.5, 0.0),
            Vec3::new(3.0, 0.5, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        );
        assert!(!triangle.hits_triangle(&shifted));

        let crossing = CollisionTriangle::new(
            Vec3::new(0.0, -2.0, -1.0),
            Vec3::new(0.0, 2.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert!(triangle.hits_triangle(&crossing));

        let hit = triangle
            .triangle_move_hits(&shifted, &Vec3::new(-2.0, 0.0, 0.0))
            .unwrap();
        assert!(hit.lambda > 0.0 && hit.lambda < 1.0);
    }

    #[test]
    fn test_rays_and_bounds() {
        let triangle = floor_triangle();
        let t = triangle.ray_hits(&Vec3::new(0.0, 0.0, 4.0), &Vec3::new(0.0, 0.0, -8.0)).unwrap();
        assert_relative_eq!(t, 0.5);
        assert!(triangle.ray_hits(&Vec3::new(0.0, 0.0, 4.0), &Vec3::new(0.0, 0.0, -2.0)).is_none());

        let bounds = triangle.enclosing_box();
        assert_relative_eq!(bounds.center(), Vec3::zeros());
        assert_relative_eq!(bounds.half_extents(), Vec3::new(1.0, 1.0, 0.0));
        let sphere = triangle.enclosing_sphere();
        for corner in triangle.corners() {
            assert!(sphere.is_point_inside(&(sphere.center() + (corner - sphere.center()) * 0.999)));
        }
    }
}
