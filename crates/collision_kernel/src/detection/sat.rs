//! Separating axis helpers
//!
//! Static tests project both volumes on a candidate axis and look for a gap.
//! Swept tests track, per axis, the time window during which the moving
//! interval overlaps the fixed one; the pair touches at the latest entry if
//! it comes before the earliest exit.

use super::SweepHit;
use crate::foundation::math::{tolerance, Vec3};

/// Projection of a volume onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lowest projected coordinate
    pub min: f32,
    /// Highest projected coordinate
    pub max: f32,
}

impl Interval {
    /// Interval from explicit bounds
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval of a symmetric extent around a projected center
    pub fn around(center: f32, radius: f32) -> Self {
        Self { min: center - radius, max: center + radius }
    }

    /// Interval spanned by a set of points on `axis`
    pub fn of_points(axis: &Vec3, points: &[Vec3]) -> Self {
        points.iter().fold(
            Self { min: f32::INFINITY, max: f32::NEG_INFINITY },
            |interval, point| {
                let projection = axis.dot(point);
                Self { min: interval.min.min(projection), max: interval.max.max(projection) }
            },
        )
    }

    /// Half-line `[min, +inf)`, the projection of a half-space on its normal
    pub fn above(min: f32) -> Self {
        Self { min, max: f32::INFINITY }
    }

    /// Whether the intervals share at least one point
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max >= other.min && other.max >= self.min
    }

    fn depth_against(&self, other: &Self) -> f32 {
        (self.max - other.min).min(other.max - self.min)
    }

    fn lies_above(&self, other: &Self) -> bool {
        self.max - other.max >= other.min - self.min
    }
}

/// Normalized copy of a candidate axis, `None` for degenerate cross products
pub fn candidate_axis(axis: &Vec3) -> Option<Vec3> {
    crate::foundation::math::utils::try_direction(axis)
}

/// Accumulates the contact window of a moving interval over several axes
#[derive(Debug, Clone, Copy)]
pub struct IntervalSweep {
    first: f32,
    last: f32,
    entry_normal: Option<Vec3>,
    shallowest: Option<(f32, Vec3)>,
}

impl Default for IntervalSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalSweep {
    /// Empty sweep, open over the whole displacement
    pub fn new() -> Self {
        Self {
            first: 0.0,
            last: f32::INFINITY,
            entry_normal: None,
            shallowest: None,
        }
    }

    /// Add one axis; returns `false` once the pair provably misses
    ///
    /// `speed` is the displacement of the moving volume projected on `axis`.
    pub fn add_axis(&mut self, axis: &Vec3, moving: Interval, fixed: Interval, speed: f32) -> bool {
        let (enter, exit, normal) = if moving.max < fixed.min {
            if speed <= tolerance::SPEED_EPSILON {
                return false;
            }
            ((fixed.min - moving.max) / speed, (fixed.max - moving.min) / speed, -axis)
        } else if moving.min > fixed.max {
            if speed >= -tolerance::SPEED_EPSILON {
                return false;
            }
            ((fixed.max - moving.min) / speed, (fixed.min - moving.max) / speed, *axis)
        } else {
            let depth = moving.depth_against(&fixed);
            let outward = if moving.lies_above(&fixed) { *axis } else { -axis };
            if self.shallowest.map_or(true, |(best, _)| depth < best) {
                self.shallowest = Some((depth, outward));
            }
            let exit = if speed > tolerance::SPEED_EPSILON {
                (fixed.max - moving.min) / speed
            } else if speed < -tolerance::SPEED_EPSILON {
                (fixed.min - moving.max) / speed
            } else {
                f32::INFINITY
            };
            self.last = self.last.min(exit);
            return self.first <= self.last;
        };

        if self.entry_normal.is_none() || enter > self.first {
            self.first = enter;
            self.entry_normal = Some(normal);
        }
        self.last = self.last.min(exit);
        self.first <= self.last && self.first <= tolerance::NO_COLLISION
    }

    /// Resolve the accumulated window into a hit
    ///
    /// With no separated axis the volumes overlap at the start; the axis of
    /// least penetration becomes the normal.
    pub fn finish(self) -> Option<SweepHit> {
        if self.first > self.last || self.first > tolerance::NO_COLLISION {
            return None;
        }
        match (self.entry_normal, self.shallowest) {
            (Some(normal), _) => Some(SweepHit::new(self.first, normal)),
            (None, Some((_, normal))) => Some(SweepHit::touching(normal)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interval_overlap() {
        assert!(Interval::new(0.0, 1.0).overlaps(&Interval::new(1.0, 2.0)));
        assert!(!Interval::new(0.0, 1.0).overlaps(&Interval::new(1.5, 2.0)));
        assert!(Interval::around(0.0, 1.0).overlaps(&Interval::above(0.5)));
    }

    #[test]
    fn test_single_axis_entry() {
        let mut sweep = IntervalSweep::new();
        assert!(sweep.add_axis(&Vec3::x(), Interval::new(-1.0, 1.0), Interval::new(2.0, 4.0), 2.0));
        let hit = sweep.finish().unwrap();
        assert_relative_eq!(hit.lambda, 0.5);
        assert_relative_eq!(hit.normal, -Vec3::x());
    }

    #[test]
    fn test_moving_away_misses() {
        let mut sweep = IntervalSweep::new();
        assert!(!sweep.add_axis(&Vec3::x(), Interval::new(-1.0, 1.0), Interval::new(2.0, 4.0), -2.0));
    }

    #[test]
    fn test_exit_before_entry_misses() {
        let mut sweep = IntervalSweep::new();
        // Enters x at 0.5 but has already left y at 0.25.
        assert!(sweep.add_axis(&Vec3::x(), Interval::new(-1.0, 1.0), Interval::new(2.0, 4.0), 2.0));
        assert!(!sweep.add_axis(&Vec3::y(), Interval::new(-1.0, 1.0), Interval::new(0.5, 4.0), -2.0));
    }

    #[test]
    fn test_overlap_reports_shallowest_axis() {
        let mut sweep = IntervalSweep::new();
        assert!(sweep.add_axis(&Vec3::x(), Interval::new(-1.0, 1.0), Interval::new(-1.0, 1.0), 0.0));
        assert!(sweep.add_axis(&Vec3::y(), Interval::new(0.5, 2.5), Interval::new(-1.0, 1.0), 0.0));
        let hit = sweep.finish().unwrap();
        assert_relative_eq!(hit.lambda, 0.0);
        assert_relative_eq!(hit.normal, Vec3::y());
    }
}
