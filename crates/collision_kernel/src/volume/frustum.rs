//! View frustum volume
//!
//! Six planes with normals pointing into the volume, in the order left,
//! right, bottom, top, near, far. The eight corners are derived from plane
//! triples whenever the planes change.
//!
//! Tests against other volumes are conservative: a volume is rejected only
//! when it lies entirely behind one plane. Near the frustum edges this can
//! report a hit for a volume that is just outside.

use super::oriented_box::CollisionBox;
use super::sphere::CollisionSphere;
use super::Containment;
use crate::detection::closest::closest_point_on_segment;
use crate::detection::gjk::SupportMap;
use crate::detection::sat::{Interval, IntervalSweep};
use crate::detection::SweepHit;
use crate::foundation::math::{tolerance, utils, Mat4, Vec3, Vec4};

/// Index of the left plane
pub const PLANE_LEFT: usize = 0;
/// Index of the right plane
pub const PLANE_RIGHT: usize = 1;
/// Index of the bottom plane
pub const PLANE_BOTTOM: usize = 2;
/// Index of the top plane
pub const PLANE_TOP: usize = 3;
/// Index of the near plane
pub const PLANE_NEAR: usize = 4;
/// Index of the far plane
pub const PLANE_FAR: usize = 5;

/// Plane `normal . p + distance = 0` with a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self { normal: Vec3::y(), distance: 0.0 }
    }
}

impl Plane {
    /// Creates a plane, normalizing `normal` and scaling `distance` with it
    ///
    /// A degenerate normal yields the default axis.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let length = normal.magnitude();
        if length <= tolerance::POSITION_EPSILON {
            return Self { normal: Vec3::y(), distance };
        }
        Self { normal: normal / length, distance: distance / length }
    }

    /// Plane through `point` facing `normal`
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let normal = utils::normalize_or(normal, Vec3::y());
        Self { normal, distance: -normal.dot(point) }
    }

    fn from_row(row: &Vec4) -> Self {
        Self::new(row.xyz(), row.w)
    }

    /// Unit normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Offset of the plane along its normal
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Signed distance of `point`, positive on the normal side
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Clip-space depth range of a projection matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthRange {
    /// OpenGL convention, near at -1
    #[default]
    MinusOneToOne,
    /// Direct3D and Vulkan convention, near at 0
    ZeroToOne,
}

/// Frustum bounded by six inward-facing planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionFrustum {
    planes: [Plane; 6],
    corners: [Vec3; 8],
}

impl Default for CollisionFrustum {
    fn default() -> Self {
        let rays = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ];
        Self::from_corner_rays(&Vec3::zeros(), &rays, 0.1)
    }
}

impl CollisionFrustum {
    /// Frustum from explicit planes (left, right, bottom, top, near, far)
    pub fn from_planes(planes: [Plane; 6]) -> Self {
        let mut frustum = Self { planes, corners: [Vec3::zeros(); 8] };
        frustum.update_corners();
        frustum
    }

    /// Frustum of a view-projection matrix
    ///
    /// Planes are read straight from the matrix rows, so world-space planes
    /// come out of a combined view-projection matrix.
    pub fn from_matrix(matrix: &Mat4, depth: DepthRange) -> Self {
        let row = |i: usize| -> Vec4 { matrix.row(i).transpose() };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        let near = match depth {
            DepthRange::MinusOneToOne => r3 + r2,
            DepthRange::ZeroToOne => r2,
        };
        Self::from_planes([
            Plane::from_row(&(r3 + r0)),
            Plane::from_row(&(r3 - r0)),
            Plane::from_row(&(r3 + r1)),
            Plane::from_row(&(r3 - r1)),
            Plane::from_row(&near),
            Plane::from_row(&(r3 - r2)),
        ])
    }

    /// Frustum from an eye point and four corner rays
    ///
    /// Rays run bottom-left, bottom-right, top-right, top-left and reach the
    /// far plane; `near` is the distance of the near plane along the view
    /// direction.
    pub fn from_corner_rays(eye: &Vec3, rays: &[Vec3; 4], near: f32) -> Self {
        let forward = utils::normalize_or(&rays.iter().sum::<Vec3>(), -Vec3::z());
        let side = |a: &Vec3, b: &Vec3| {
            let normal = a.cross(b);
            let normal = if normal.dot(&forward) < 0.0 { -normal } else { normal };
            Plane::from_point_normal(eye, &normal)
        };
        let [bottom_left, bottom_right, top_right, top_left] = rays;
        let far = rays.iter().map(|ray| ray.dot(&forward)).sum::<f32>() * 0.25;
        let near = utils::non_negative(near).min(far);

        Self::from_planes([
            side(top_left, bottom_left),
            side(bottom_right, top_right),
            side(bottom_left, bottom_right),
            side(top_right, top_left),
            Plane::from_point_normal(&(eye + forward * near), &forward),
            Plane::from_point_normal(&(eye + forward * far), &-forward),
        ])
    }

    /// Replaces the planes and recomputes the corners
    pub fn set_planes(&mut self, planes: [Plane; 6]) {
        self.planes = planes;
        self.update_corners();
    }

    /// Rebuilds the frustum from a view-projection matrix
    pub fn set_matrix(&mut self, matrix: &Mat4, depth: DepthRange) {
        *self = Self::from_matrix(matrix, depth);
    }

    /// Rebuilds the frustum from an eye point, corner rays and near distance
    pub fn set_corner_rays(&mut self, eye: &Vec3, rays: &[Vec3; 4], near: f32) {
        *self = Self::from_corner_rays(eye, rays, near);
    }

    fn update_corners(&mut self) {
        for (index, corner) in self.corners.iter_mut().enumerate() {
            let horizontal = &self.planes[PLANE_LEFT + (index & 1)];
            let vertical = &self.planes[PLANE_BOTTOM + ((index >> 1) & 1)];
            let depth = &self.planes[PLANE_NEAR + ((index >> 2) & 1)];
            *corner = intersect_planes(horizontal, vertical, depth).unwrap_or_else(Vec3::zeros);
        }
    }

    /// The six planes
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// One plane by index (see the `PLANE_*` constants)
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// Corner points; bit 0 selects right, bit 1 top, bit 2 far
    pub fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }

    fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        (0..8_usize).flat_map(move |from| {
            [1_usize, 2, 4]
                .into_iter()
                .filter(move |bit| from & bit == 0)
                .map(move |bit| (self.corners[from], self.corners[from | bit]))
        })
    }

    fn nearest_plane(&self, point: &Vec3) -> (usize, f32) {
        self.planes
            .iter()
            .map(|plane| plane.signed_distance(point))
            .enumerate()
            .fold((PLANE_NEAR, f32::INFINITY), |best, (index, distance)| {
                if distance < best.1 { (index, distance) } else { best }
            })
    }

    /// Whether `point` is on the inner side of every plane
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= -tolerance::POSITION_EPSILON)
    }

    /// Relation of a sphere to the frustum
    pub fn classify_sphere(&self, sphere: &CollisionSphere) -> Containment {
        let mut containment = Containment::Inside;
        for plane in &self.planes {
            let distance = plane.signed_distance(&sphere.center());
            if distance < -sphere.radius() {
                return Containment::Outside;
            }
            if distance < sphere.radius() {
                containment = Containment::Partial;
            }
        }
        containment
    }

    /// Relation of a box to the frustum
    pub fn classify_box(&self, cube: &CollisionBox) -> Containment {
        let mut containment = Containment::Inside;
        for plane in &self.planes {
            let distance = plane.signed_distance(&cube.center());
            let extent = cube.project_extents(&plane.normal);
            if distance + extent < 0.0 {
                return Containment::Outside;
            }
            if distance - extent < 0.0 {
                containment = Containment::Partial;
            }
        }
        containment
    }

    /// Closest point on the frustum surface
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        if self.is_point_inside(point) {
            let (index, distance) = self.nearest_plane(point);
            return point - self.planes[index].normal * distance;
        }

        let on_faces = self.planes.iter().filter_map(|plane| {
            let projected = point - plane.normal * plane.signed_distance(point);
            self.is_point_inside(&projected).then_some(projected)
        });
        let on_edges = self
            .edges()
            .map(|(start, end)| closest_point_on_segment(point, &start, &end));

        on_faces
            .chain(on_edges)
            .map(|candidate| ((candidate - point).magnitude_squared(), candidate))
            .fold((f32::INFINITY, self.corners[0]), |best, candidate| {
                if candidate.0 < best.0 { candidate } else { best }
            })
            .1
    }

    /// Outward normal of the plane `point` is nearest to (or furthest behind)
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        let (index, _) = self.nearest_plane(point);
        -self.planes[index].normal
    }

    /// Entry fraction of the segment `origin..origin + direction`
    ///
    /// Convex clipping against the six half-spaces.
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        let mut enter = 0.0_f32;
        let mut exit = 1.0_f32;
        for plane in &self.planes {
            let distance = plane.signed_distance(origin);
            let approach = plane.normal.dot(direction);
            if approach.abs() < tolerance::PARALLEL_EPSILON {
                if distance < -tolerance::POSITION_EPSILON {
                    return None;
                }
                continue;
            }
            let t = -distance / approach;
            if approach > 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
            if enter > exit {
                return None;
            }
        }
        Some(enter)
    }

    /// Sphere around the corner centroid
    pub fn enclosing_sphere(&self) -> CollisionSphere {
        let center = SupportMap::center(self);
        let radius = self
            .corners
            .iter()
            .map(|corner| (corner - center).magnitude())
            .fold(0.0_f32, f32::max);
        CollisionSphere::new(center, radius)
    }

    /// Axis-aligned bounds of the corners
    pub fn enclosing_box(&self) -> CollisionBox {
        let first = self.corners[0];
        let (min, max) = self.corners[1..]
            .iter()
            .fold((first, first), |(min, max), corner| (min.inf(corner), max.sup(corner)));
        CollisionBox::from_bounds(&min, &max)
    }

    /// Conservative static test against any convex volume
    ///
    /// The volume is rejected when its farthest point along some plane
    /// normal is still behind that plane.
    pub fn hits_support<S>(&self, shape: &S) -> bool
    where
        S: SupportMap + ?Sized,
    {
        self.planes.iter().all(|plane| {
            plane.signed_distance(&shape.support(&plane.normal)) >= -tolerance::POSITION_EPSILON
        })
    }

    /// `shape` translated by `displacement` against this fixed frustum
    ///
    /// Each plane is a half-space; the shape enters the frustum's plane
    /// bounds at the latest half-space entry, unless it has already left
    /// one of them.
    pub fn move_hits_support<S>(&self, shape: &S, displacement: &Vec3) -> Option<SweepHit>
    where
        S: SupportMap + ?Sized,
    {
        let mut sweep = IntervalSweep::new();
        for plane in &self.planes {
            let axis = plane.normal;
            let moving = Interval::new(
                axis.dot(&shape.support(&-axis)),
                axis.dot(&shape.support(&axis)),
            );
            let fixed = Interval::above(-plane.distance - tolerance::POSITION_EPSILON);
            if !sweep.add_axis(&axis, moving, fixed, displacement.dot(&axis)) {
                return None;
            }
        }
        sweep.finish()
    }
}

/// Point shared by three planes, `None` when two of them are parallel
fn intersect_planes(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
    let bc = b.normal.cross(&c.normal);
    let denominator = a.normal.dot(&bc);
    if denominator.abs() < tolerance::PARALLEL_EPSILON {
        return None;
    }
    let ca = c.normal.cross(&a.normal);
    let ab = a.normal.cross(&b.normal);
    Some(-(bc * a.distance + ca * b.distance + ab * c.distance) / denominator)
}

impl SupportMap for CollisionFrustum {
    fn support(&self, direction: &Vec3) -> Vec3 {
        self.corners
            .iter()
            .copied()
            .fold((f32::NEG_INFINITY, self.corners[0]), |best, corner| {
                let reach = corner.dot(direction);
                if reach > best.0 { (reach, corner) } else { best }
            })
            .1
    }

    fn center(&self) -> Vec3 {
        self.corners.iter().sum::<Vec3>() / 8.0
    }
}
