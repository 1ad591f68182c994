//! GJK distance and conservative advancement
//!
//! Pairs without a dedicated routine are answered from support mappings
//! alone. `gjk_distance` finds the point of the Minkowski difference
//! `A - B` nearest the origin; its length is the separation and its
//! direction points from B toward A. `advance_sweep` turns repeated
//! distance queries into a time of impact for a translating volume.

use super::closest::closest_triangle_weights;
use super::{overlap_normal, SweepHit};
use crate::foundation::math::{tolerance, Vec3};

const MAX_ITERATIONS: usize = 64;
const MAX_ADVANCE_STEPS: usize = 128;
/// Tetrahedron volume, relative to its longest edge cubed, below which it
/// counts as flat
const FLATNESS: f32 = 1e-4;

/// Convex volume described by its farthest point in any direction
pub trait SupportMap {
    /// Farthest point of the volume along `direction` (need not be unit)
    fn support(&self, direction: &Vec3) -> Vec3;

    /// A point inside the volume, used to seed searches
    fn center(&self) -> Vec3;
}

/// Outcome of a distance query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GjkResult {
    /// Nearest point of `A - B` to the origin (from B toward A)
    pub closest: Vec3,
    /// True when the volumes touch or overlap
    pub intersecting: bool,
}

impl GjkResult {
    /// Separation distance, zero when intersecting
    pub fn distance(&self) -> f32 {
        if self.intersecting { 0.0 } else { self.closest.magnitude() }
    }
}

#[derive(Debug, Clone, Copy)]
struct Simplex {
    points: [Vec3; 4],
    len: usize,
}

impl Simplex {
    fn single(point: Vec3) -> Self {
        Self { points: [point; 4], len: 1 }
    }

    fn push(&mut self, point: Vec3) {
        self.points[self.len] = point;
        self.len += 1;
    }

    fn contains(&self, point: &Vec3, tolerance_squared: f32) -> bool {
        self.points[..self.len]
            .iter()
            .any(|p| (p - point).magnitude_squared() <= tolerance_squared)
    }

    fn from_weighted(points: &[Vec3], weights: &[f32]) -> (Vec3, Self) {
        let mut reduced = Self { points: [Vec3::zeros(); 4], len: 0 };
        let mut closest = Vec3::zeros();
        for (point, weight) in points.iter().zip(weights) {
            if *weight > 0.0 {
                reduced.push(*point);
                closest += point * *weight;
            }
        }
        if reduced.len == 0 {
            reduced.push(points[0]);
            closest = points[0];
        }
        (closest, reduced)
    }

    /// Nearest point to the origin and the smallest sub-simplex holding it;
    /// `None` when the origin is enclosed by a tetrahedron.
    fn closest_to_origin(&self) -> Option<(Vec3, Self)> {
        let p = &self.points;
        match self.len {
            1 => Some((p[0], *self)),
            2 => {
                let edge = p[1] - p[0];
                let length_squared = edge.magnitude_squared();
                let t = if length_squared <= f32::MIN_POSITIVE {
                    0.0
                } else {
                    (-p[0].dot(&edge) / length_squared).clamp(0.0, 1.0)
                };
                Some(Self::from_weighted(&p[..2], &[1.0 - t, t]))
            }
            3 => {
                let weights = closest_triangle_weights(&Vec3::zeros(), &p[0], &p[1], &p[2]);
                Some(Self::from_weighted(&p[..3], &weights))
            }
            _ => closest_on_tetrahedron(p),
        }
    }
}

fn signed_volume(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> f32 {
    (b - a).dot(&(c - a).cross(&(d - a)))
}

/// Nearest point of a tetrahedron to the origin, `None` when it encloses
/// the origin
///
/// Enclosure is decided from the barycentric coordinates of the origin, and
/// only for tetrahedra whose volume is clearly above rounding noise; flat
/// ones are answered by their nearest face.
fn closest_on_tetrahedron(p: &[Vec3; 4]) -> Option<(Vec3, Simplex)> {
    const FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];

    let origin = Vec3::zeros();
    let volume = signed_volume(&p[0], &p[1], &p[2], &p[3]);
    let scale = (1..4)
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .map(|(i, j)| (p[i] - p[j]).magnitude())
        .fold(0.0_f32, f32::max);
    if volume.abs() > FLATNESS * scale * scale * scale {
        let weights = [
            signed_volume(&origin, &p[1], &p[2], &p[3]),
            signed_volume(&p[0], &origin, &p[2], &p[3]),
            signed_volume(&p[0], &p[1], &origin, &p[3]),
            signed_volume(&p[0], &p[1], &p[2], &origin),
        ];
        if weights.iter().all(|weight| weight * volume.signum() >= 0.0) {
            return None;
        }
    }

    FACES
        .iter()
        .map(|&[i, j, k]| {
            let face = [p[i], p[j], p[k]];
            let weights = closest_triangle_weights(&origin, &face[0], &face[1], &face[2]);
            Simplex::from_weighted(&face, &weights)
        })
        .min_by(|(a, _), (b, _)| a.magnitude_squared().total_cmp(&b.magnitude_squared()))
}

/// Support point of `A - B` with A translated by `offset`
fn minkowski_support<A, B>(a: &A, b: &B, offset: &Vec3, direction: &Vec3) -> Vec3
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    a.support(direction) + offset - b.support(&-direction)
}

/// Distance between `a` (translated by `offset`) and `b`
pub fn gjk_distance<A, B>(a: &A, b: &B, offset: &Vec3) -> GjkResult
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let contact_squared = tolerance::CONTACT_EPSILON * tolerance::CONTACT_EPSILON;

    let mut guess = a.center() + offset - b.center();
    if guess.magnitude_squared() <= contact_squared {
        guess = Vec3::x();
    }
    let mut v = minkowski_support(a, b, offset, &-guess);
    let mut simplex = Simplex::single(v);

    for _ in 0..MAX_ITERATIONS {
        let distance_squared = v.magnitude_squared();
        if distance_squared <= contact_squared {
            return GjkResult { closest: v, intersecting: true };
        }

        // No support point gets closer: |v| is the distance.
        let w = minkowski_support(a, b, offset, &-v);
        let progress = distance_squared - v.dot(&w);
        let repeat_squared = (tolerance::GJK_RELATIVE_EPSILON * tolerance::GJK_RELATIVE_EPSILON * distance_squared)
            .max(contact_squared);
        if progress <= tolerance::GJK_RELATIVE_EPSILON * distance_squared
            || simplex.contains(&w, repeat_squared)
        {
            break;
        }

        simplex.push(w);
        let Some((closest, reduced)) = simplex.closest_to_origin() else {
            return GjkResult { closest: Vec3::zeros(), intersecting: true };
        };
        if closest.magnitude_squared() >= distance_squared {
            break;
        }
        v = closest;
        simplex = reduced;
    }

    let intersecting = v.magnitude_squared() <= contact_squared;
    GjkResult { closest: v, intersecting }
}

/// Whether two convex volumes touch or overlap
pub fn convex_hits<A, B>(a: &A, b: &B) -> bool
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    gjk_distance(a, b, &Vec3::zeros()).intersecting
}

/// Time of impact of `a` translating by `displacement` against a fixed `b`
///
/// Conservative advancement: each step moves `a` forward by the current
/// separation divided by the closing speed along the separating direction,
/// which can never pass the first contact.
pub fn advance_sweep<A, B>(a: &A, b: &B, displacement: &Vec3) -> Option<SweepHit>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    advance_sweep_steps(a, b, displacement, MAX_ADVANCE_STEPS)
}

/// Conservative advancement limited to `max_steps`; a sweep that has not
/// reached contact by then reports no hit
fn advance_sweep_steps<A, B>(a: &A, b: &B, displacement: &Vec3, max_steps: usize) -> Option<SweepHit>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let mut lambda = 0.0_f32;
    let mut normal: Option<Vec3> = None;

    for _ in 0..max_steps {
        let result = gjk_distance(a, b, &(displacement * lambda));
        let distance = result.distance();
        if result.intersecting || distance <= tolerance::CONTACT_EPSILON {
            let normal = normal.unwrap_or_else(|| {
                overlap_normal(&a.center(), &b.center(), displacement)
            });
            return Some(SweepHit::new(lambda, normal));
        }

        let direction = result.closest / distance;
        let closing_speed = -displacement.dot(&direction);
        if closing_speed <= tolerance::SPEED_EPSILON {
            return None;
        }
        lambda += distance / closing_speed;
        if lambda > tolerance::NO_COLLISION {
            return None;
        }
        normal = Some(direction);
    }

    log::debug!("conservative advancement stopped at its step cap, lambda {lambda}");
    let result = gjk_distance(a, b, &(displacement * lambda));
    if result.intersecting || result.distance() <= tolerance::CONTACT_EPSILON {
        normal.map(|normal| SweepHit::new(lambda, normal))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Ball {
        center: Vec3,
        radius: f32,
    }

    impl SupportMap for Ball {
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

    struct Cube {
        center: Vec3,
        half: f32,
    }

    impl SupportMap for Cube {
        fn support(&self, direction: &Vec3) -> Vec3 {
            self.center + direction.map(|d| if d >= 0.0 { self.half } else { -self.half })
        }

        fn center(&self) -> Vec3 {
            self.center
        }
    }

    #[test]
    fn test_distance_between_balls() {
        let a = Ball { center: Vec3::zeros(), radius: 1.0 };
        let b = Ball { center: Vec3::new(5.0, 0.0, 0.0), radius: 2.0 };
        let result = gjk_distance(&a, &b, &Vec3::zeros());
        assert!(!result.intersecting);
        assert_relative_eq!(result.distance(), 2.0, epsilon = 1e-3);
        assert!(result.closest.x < 0.0);
    }

    #[test]
    fn test_cubes_overlap_and_separate() {
        let a = Cube { center: Vec3::zeros(), half: 1.0 };
        let b = Cube { center: Vec3::new(1.5, 0.5, -0.5), half: 1.0 };
        assert!(convex_hits(&a, &b));

        let far = Cube { center: Vec3::new(3.0, 3.0, 0.0), half: 1.0 };
        let result = gjk_distance(&a, &far, &Vec3::zeros());
        assert!(!result.intersecting);
        assert_relative_eq!(result.distance(), 2.0_f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_advance_face_to_face() {
        let a = Cube { center: Vec3::zeros(), half: 1.0 };
        let b = Cube { center: Vec3::new(3.0, 0.0, 0.0), half: 1.0 };
        let hit = advance_sweep(&a, &b, &Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.5, epsilon = 1e-4);
        assert_relative_eq!(hit.normal, -Vec3::x(), epsilon = 1e-4);

        assert!(advance_sweep(&a, &b, &Vec3::new(0.5, 0.0, 0.0)).is_none());
        assert!(advance_sweep(&a, &b, &Vec3::new(0.0, 4.0, 0.0)).is_none());
    }

    #[test]
    fn test_advance_curved() {
        let a = Ball { center: Vec3::zeros(), radius: 1.0 };
        let b = Ball { center: Vec3::new(4.0, 1.0, 0.0), radius: 1.0 };
        let hit = advance_sweep(&a, &b, &Vec3::new(4.0, 0.0, 0.0)).unwrap();
        // |(4t - 4, -1)| = 2  =>  t = 1 - sqrt(3) / 4
        assert_relative_eq!(hit.lambda, 1.0 - 3.0_f32.sqrt() / 4.0, epsilon = 1e-3);
        assert!(hit.normal.x < 0.0 && hit.normal.y < 0.0);
    }

    #[test]
    fn test_flat_tetrahedron_does_not_enclose_origin() {
        // Three corners within a few thousandths of each other, origin 0.135 away
        let points = [
            Vec3::new(-0.409, 0.287, -0.275),
            Vec3::new(0.554, -0.522, 0.0837),
            Vec3::new(0.552, -0.524, 0.0849),
            Vec3::new(0.554, -0.524, 0.0847),
        ];
        let (closest, _) = closest_on_tetrahedron(&points).unwrap();
        assert_relative_eq!(closest.magnitude(), 0.135, epsilon = 5e-3);
    }

    #[test]
    fn test_tetrahedron_around_origin_encloses_it() {
        let points = [
            Vec3::new(1.0, 0.0, -0.5),
            Vec3::new(-1.0, 1.0, -0.5),
            Vec3::new(-1.0, -1.0, -0.5),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert!(closest_on_tetrahedron(&points).is_none());

        let shifted = points.map(|p| p + Vec3::new(0.0, 0.0, 2.0));
        let (closest, _) = closest_on_tetrahedron(&shifted).unwrap();
        assert_relative_eq!(closest, Vec3::new(0.0, 0.0, 1.5), epsilon = 1e-5);
    }

    #[test]
    fn test_advance_without_contact_at_step_cap_misses() {
        let a = Ball { center: Vec3::zeros(), radius: 1.0 };
        let b = Ball { center: Vec3::new(4.0, 1.0, 0.0), radius: 1.0 };
        let displacement = Vec3::new(4.0, 0.0, 0.0);
        assert!(advance_sweep_steps(&a, &b, &displacement, 1).is_none());
        assert!(advance_sweep_steps(&a, &b, &displacement, MAX_ADVANCE_STEPS).is_some());
    }

    #[test]
    fn test_advance_starting_overlap() {
        let a = Ball { center: Vec3::zeros(), radius: 1.0 };
        let b = Ball { center: Vec3::new(0.5, 0.0, 0.0), radius: 1.0 };
        let hit = advance_sweep(&a, &b, &Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(hit.lambda, 0.0);
        assert_relative_eq!(hit.normal, -Vec3::x());
    }
}
