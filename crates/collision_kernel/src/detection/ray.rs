//! Ray and segment roots
//!
//! A ray here is a segment: `origin + direction * t` for `t` in `[0, 1]`,
//! with the direction carrying the segment length. All results are
//! fractions of that direction.

use crate::foundation::math::{tolerance, utils, Vec3};

/// Both crossings of the ray's line with a sphere surface
pub fn sphere_roots(origin: &Vec3, direction: &Vec3, center: &Vec3, radius: f32) -> Option<(f32, f32)> {
    let a = direction.magnitude_squared();
    if a < tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON {
        return None;
    }
    let offset = origin - center;
    let b = 2.0 * offset.dot(direction);
    let c = offset.magnitude_squared() - radius * radius;
    utils::solve_quadratic(a, b, c)
}

/// Crossings of the ray's line with a cone side around the local Y axis
///
/// The side radius along the ray is `rho0 + rho1 * t`; only crossings where
/// that radius is non-negative are real. Origin and direction are in the
/// cone's local frame.
pub fn cone_side_roots(origin: &Vec3, direction: &Vec3, rho0: f32, rho1: f32) -> [Option<f32>; 2] {
    let a = direction.x * direction.x + direction.z * direction.z - rho1 * rho1;
    let b = 2.0 * (origin.x * direction.x + origin.z * direction.z - rho0 * rho1);
    let c = origin.x * origin.x + origin.z * origin.z - rho0 * rho0;
    let Some((t0, t1)) = utils::solve_quadratic(a, b, c) else {
        return [None, None];
    };
    let valid = |t: f32| (rho0 + rho1 * t >= 0.0).then_some(t);
    [valid(t0), valid(t1)]
}

/// Crossing of the ray's line with the plane `y = height` (local frame)
pub fn plane_y_root(origin: &Vec3, direction: &Vec3, height: f32) -> Option<f32> {
    if direction.y.abs() < tolerance::PARALLEL_EPSILON {
        return None;
    }
    Some((height - origin.y) / direction.y)
}

/// Entry fraction of the ray into an axis-aligned box centered at the origin
///
/// Slab test. Returns `Some(0.0)` when the origin starts inside.
pub fn slab_entry(origin: &Vec3, direction: &Vec3, half_extents: &Vec3) -> Option<f32> {
    let mut enter = 0.0_f32;
    let mut exit = 1.0_f32;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];
        if d.abs() < tolerance::SPEED_EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t0 = (-h - o) / d;
        let t1 = (h - o) / d;
        enter = enter.max(t0.min(t1));
        exit = exit.min(t0.max(t1));
        if enter > exit {
            return None;
        }
    }
    Some(enter)
}

/// Smallest candidate fraction inside `[0, 1]`
pub fn first_in_unit_range<I: IntoIterator<Item = f32>>(candidates: I) -> Option<f32> {
    candidates
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))))
}
