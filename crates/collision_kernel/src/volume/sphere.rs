//! Sphere volume

use super::oriented_box::CollisionBox;
use crate::detection::gjk::SupportMap;
use crate::detection::ray::sphere_roots;
use crate::detection::{overlap_normal, SweepHit};
use crate::foundation::math::{tolerance, utils, Vec3};

/// Sphere given by center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSphere {
    center: Vec3,
    radius: f32,
    square_radius: f32,
}

impl Default for CollisionSphere {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 1.0)
    }
}

impl CollisionSphere {
    /// Creates a sphere; a negative radius is clamped to zero
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = utils::non_negative(radius);
        Self { center, radius, square_radius: radius * radius }
    }

    /// Sphere center
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Cached squared radius
    pub fn square_radius(&self) -> f32 {
        self.square_radius
    }

    /// Moves the sphere
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Changes the radius, clamping negatives to zero
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = utils::non_negative(radius);
        self.square_radius = self.radius * self.radius;
    }

    /// Whether `point` lies inside or on the sphere
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        (point - self.center).magnitude_squared() <= self.square_radius
    }

    /// Closest point on the sphere surface
    pub fn closest_point_to(&self, point: &Vec3) -> Vec3 {
        self.center + self.normal_at_point(point) * self.radius
    }

    /// Outward normal through `point`; the default axis at the center
    pub fn normal_at_point(&self, point: &Vec3) -> Vec3 {
        utils::normalize_or(&(point - self.center), Vec3::y())
    }

    /// Entry fraction of the segment `origin..origin + direction`
    pub fn ray_hits(&self, origin: &Vec3, direction: &Vec3) -> Option<f32> {
        if self.is_point_inside(origin) {
            return Some(0.0);
        }
        let (enter, _) = sphere_roots(origin, direction, &self.center, self.radius)?;
        (0.0..=1.0).contains(&enter).then_some(enter)
    }

    /// The sphere itself
    pub fn enclosing_sphere(&self) -> Self {
        *self
    }

    /// Axis-aligned box around the sphere
    pub fn enclosing_box(&self) -> CollisionBox {
        CollisionBox::axis_aligned(self.center, Vec3::repeat(self.radius))
    }

    /// Static overlap with another sphere
    pub fn hits_sphere(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        (self.center - other.center).magnitude_squared() <= reach * reach
    }

    /// This sphere moving by `displacement` against a fixed `other`
    pub fn move_hits_sphere(&self, other: &Self, displacement: &Vec3) -> Option<SweepHit> {
        let reach = self.radius + other.radius;
        let separation = self.center - other.center;
        if separation.magnitude_squared() <= reach * reach {
            return Some(SweepHit::touching(overlap_normal(&self.center, &other.center, displacement)));
        }

        let (enter, _) = sphere_roots(&self.center, displacement, &other.center, reach)?;
        if !(0.0..=tolerance::NO_COLLISION).contains(&enter) {
            return None;
        }
        let contact = separation + displacement * enter;
        Some(SweepHit::new(enter, utils::normalize_or(&contact, -Vec3::y())))
    }
}

impl SupportMap for CollisionSphere {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let length = direction.magnitude();
        if length <= f32::MIN_POSITIVE {
            return self.center;
        }
        self.center + direction * (self.radius / length)
    }

    fn center(&self) -> Vec3 {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negative_radius_is_clamped() {
        let mut sphere = CollisionSphere::new(Vec3::zeros(), -2.0);
        assert_eq!(sphere.radius(), 0.0);
        sphere.set_radius(3.0);
        assert_relative_eq!(sphere.square_radius(), 9.0);
        sphere.set_radius(-1.0);
        assert_eq!(sphere.square_radius(), 0.0);
    }

    #[test]
    fn test_overlapping_spheres_hit() {
        let a = CollisionSphere::new(Vec3::zeros(), 1.0);
        let b = CollisionSphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        assert!(a.hits_sphere(&b));
        assert!(b.hits_sphere(&a));
    }

    #[test]
    fn test_sweep_meets_halfway() {
        let a = CollisionSphere::new(Vec3::zeros(), 1.0);
        let b = CollisionSphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(!a.hits_sphere(&b));

        let hit = a.move_hits_sphere(&b, &Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_sweep_misses() {
        let a = CollisionSphere::new(Vec3::zeros(), 1.0);
        let b = CollisionSphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(a.move_hits_sphere(&b, &Vec3::new(0.5, 0.0, 0.0)).is_none());
        assert!(a.move_hits_sphere(&b, &Vec3::new(-2.0, 0.0, 0.0)).is_none());
        assert!(a.move_hits_sphere(&b, &Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_coincident_centers_use_displacement() {
        let a = CollisionSphere::new(Vec3::zeros(), 1.0);
        let hit = a.move_hits_sphere(&a, &Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(hit.lambda, 0.0);
        assert_relative_eq!(hit.normal, -Vec3::z());
    }

    #[test]
    fn test_surface_queries() {
        let sphere = CollisionSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(sphere.closest_point_to(&Vec3::new(1.0, 5.0, 0.0)), Vec3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(sphere.closest_point_to(&Vec3::new(1.5, 0.0, 0.0)), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(sphere.normal_at_point(&sphere.center()), Vec3::y());
        assert_relative_eq!(sphere.ray_hits(&Vec3::new(-5.0, 0.0, 0.0), &Vec3::new(10.0, 0.0, 0.0)).unwrap(), 0.4);
        assert_eq!(sphere.ray_hits(&Vec3::new(1.0, 0.5, 0.0), &Vec3::x()), Some(0.0));
        assert!(sphere.ray_hits(&Vec3::new(-5.0, 0.0, 0.0), &Vec3::new(2.0, 0.0, 0.0)).is_none());
    }
}
