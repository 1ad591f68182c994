//! Collision scenarios
//!
//! A scenario is a named list of cases, each building a volume from a
//! serde description and running one query against it. Scenarios load
//! through [`Config`] from `.ron` or `.toml` files and can carry expected
//! results, which makes them usable as regression fixtures.

use crate::config::{Config, ConfigError};
use crate::foundation::math::{utils, Vec3};
use crate::volume::{
    CollisionBox, CollisionCapsule, CollisionCylinder, CollisionFrustum, CollisionSphere, CollisionTriangle,
    CollisionVolume, VolumeKind,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized description of a volume
///
/// Rotations are Euler angles (roll, pitch, yaw) in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VolumeDesc {
    /// Sphere
    Sphere {
        /// Center
        center: Vec3,
        /// Radius
        radius: f32,
    },
    /// Oriented box
    Box {
        /// Center
        center: Vec3,
        /// Half-extents along the local axes
        half_extents: Vec3,
        /// Rotation in degrees
        #[serde(default = "Vec3::zeros")]
        rotation: Vec3,
    },
    /// Possibly tapered capsule
    Capsule {
        /// Axis midpoint
        position: Vec3,
        /// Rotation in degrees
        #[serde(default = "Vec3::zeros")]
        rotation: Vec3,
        /// Half the distance between the end sphere centers
        half_height: f32,
        /// Radius of the end at `+half_height`
        top_radius: f32,
        /// Radius of the end at `-half_height`
        bottom_radius: f32,
    },
    /// Possibly tapered cylinder
    Cylinder {
        /// Axis midpoint
        position: Vec3,
        /// Rotation in degrees
        #[serde(default = "Vec3::zeros")]
        rotation: Vec3,
        /// Half the distance between the caps
        half_height: f32,
        /// Radius of the cap at `+half_height`
        top_radius: f32,
        /// Radius of the cap at `-half_height`
        bottom_radius: f32,
    },
    /// Triangle
    Triangle {
        /// Corners in winding order
        corners: [Vec3; 3],
    },
    /// Frustum from an eye point and corner rays
    Frustum {
        /// Apex of the frustum
        eye: Vec3,
        /// Bottom-left, bottom-right, top-right, top-left rays reaching the far plane
        rays: [Vec3; 4],
        /// Near plane distance
        near: f32,
    },
}

impl VolumeDesc {
    /// Builds the described volume
    pub fn build(&self) -> CollisionVolume {
        match self {
            Self::Sphere { center, radius } => CollisionSphere::new(*center, *radius).into(),
            Self::Box { center, half_extents, rotation } => {
                CollisionBox::new(*center, *half_extents, utils::orientation_from_degrees(rotation)).into()
            }
            Self::Capsule { position, rotation, half_height, top_radius, bottom_radius } => CollisionCapsule::new(
                *position,
                utils::orientation_from_degrees(rotation),
                *half_height,
                *top_radius,
                *bottom_radius,
            )
            .into(),
            Self::Cylinder { position, rotation, half_height, top_radius, bottom_radius } => CollisionCylinder::new(
                *position,
                utils::orientation_from_degrees(rotation),
                *half_height,
                *top_radius,
                *bottom_radius,
            )
            .into(),
            Self::Triangle { corners: [a, b, c] } => CollisionTriangle::new(*a, *b, *c).into(),
            Self::Frustum { eye, rays, near } => CollisionFrustum::from_corner_rays(eye, rays, *near).into(),
        }
    }

    /// Shape tag of the described volume
    pub fn kind(&self) -> VolumeKind {
        match self {
            Self::Sphere { .. } => VolumeKind::Sphere,
            Self::Box { .. } => VolumeKind::Box,
            Self::Capsule { .. } => VolumeKind::Capsule,
            Self::Cylinder { .. } => VolumeKind::Cylinder,
            Self::Triangle { .. } => VolumeKind::Triangle,
            Self::Frustum { .. } => VolumeKind::Frustum,
        }
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        match self {
            Self::Sphere { center, radius } => first_non_finite(&[("center", center)], &[("radius", *radius)]),
            Self::Box { center, half_extents, rotation } => first_non_finite(
                &[("center", center), ("half_extents", half_extents), ("rotation", rotation)],
                &[],
            ),
            Self::Capsule { position, rotation, half_height, top_radius, bottom_radius }
            | Self::Cylinder { position, rotation, half_height, top_radius, bottom_radius } => first_non_finite(
                &[("position", position), ("rotation", rotation)],
                &[("half_height", *half_height), ("top_radius", *top_radius), ("bottom_radius", *bottom_radius)],
            ),
            Self::Triangle { corners } => corners.iter().find(|c| !is_finite(c)).map(|_| "corners"),
            Self::Frustum { eye, rays, near } => first_non_finite(&[("eye", eye)], &[("near", *near)])
                .or_else(|| rays.iter().find(|ray| !is_finite(ray)).map(|_| "rays")),
        }
    }
}

fn is_finite(vector: &Vec3) -> bool {
    vector.iter().all(|value| value.is_finite())
}

fn first_non_finite(vectors: &[(&'static str, &Vec3)], scalars: &[(&'static str, f32)]) -> Option<&'static str> {
    vectors
        .iter()
        .find(|(_, vector)| !is_finite(vector))
        .map(|(field, _)| *field)
        .or_else(|| scalars.iter().find(|(_, value)| !value.is_finite()).map(|(field, _)| *field))
}

/// Query run against the case's volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryDesc {
    /// Static overlap with another volume
    Hits {
        /// The other volume
        other: VolumeDesc,
    },
    /// The case volume moving against a stationary one
    MoveHits {
        /// The stationary volume
        other: VolumeDesc,
        /// Displacement of the case volume
        displacement: Vec3,
    },
    /// A point moving against the case volume
    PointMoveHits {
        /// Start of the point
        point: Vec3,
        /// Displacement of the point
        displacement: Vec3,
    },
    /// Point containment
    PointInside {
        /// Tested point
        point: Vec3,
    },
    /// Segment cast
    Ray {
        /// Segment start
        origin: Vec3,
        /// Segment direction, its length is the segment length
        direction: Vec3,
    },
}

impl QueryDesc {
    fn non_finite_field(&self) -> Option<&'static str> {
        match self {
            Self::Hits { other } => other.non_finite_field(),
            Self::MoveHits { other, displacement } => {
                other.non_finite_field().or_else(|| first_non_finite(&[("displacement", displacement)], &[]))
            }
            Self::PointMoveHits { point, displacement } => {
                first_non_finite(&[("point", point), ("displacement", displacement)], &[])
            }
            Self::PointInside { point } => first_non_finite(&[("point", point)], &[]),
            Self::Ray { origin, direction } => first_non_finite(&[("origin", origin), ("direction", direction)], &[]),
        }
    }
}

fn default_tolerance() -> f32 {
    1e-4
}

/// Expected outcome of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Whether the query reports a hit
    pub hit: bool,
    /// Expected lambda or ray fraction, if checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<f32>,
    /// Allowed difference for `lambda`
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

impl Expectation {
    /// Whether an outcome satisfies this expectation
    pub fn accepts(&self, hit: bool, lambda: Option<f32>) -> bool {
        if hit != self.hit {
            return false;
        }
        match (self.lambda, lambda) {
            (None, _) => true,
            (Some(expected), Some(actual)) => (expected - actual).abs() <= self.tolerance,
            (Some(_), None) => false,
        }
    }
}

/// One volume and one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCase {
    /// Label used in reports
    pub name: String,
    /// The queried (or moving) volume
    pub volume: VolumeDesc,
    /// What to ask
    pub query: QueryDesc,
    /// Expected outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<Expectation>,
}

/// Result of one case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    /// Case label
    pub name: String,
    /// Whether the query reported a hit
    pub hit: bool,
    /// Sweep lambda or ray fraction
    pub lambda: Option<f32>,
    /// Sweep contact normal
    pub normal: Option<Vec3>,
    /// `Some(false)` when an expectation was given and not met
    pub matches: Option<bool>,
}

impl ScenarioCase {
    /// Runs the query
    pub fn evaluate(&self) -> CaseReport {
        let volume = self.volume.build();
        let (hit, lambda, normal) = match &self.query {
            QueryDesc::Hits { other } => (volume.hits(&other.build()), None, None),
            QueryDesc::MoveHits { other, displacement } => {
                let sweep = volume.move_hits(&other.build(), displacement);
                (sweep.is_some(), sweep.map(|hit| hit.lambda), sweep.map(|hit| hit.normal))
            }
            QueryDesc::PointMoveHits { point, displacement } => {
                let sweep = volume.point_move_hits(point, displacement);
                (sweep.is_some(), sweep.map(|hit| hit.lambda), sweep.map(|hit| hit.normal))
            }
            QueryDesc::PointInside { point } => (volume.is_point_inside(point), None, None),
            QueryDesc::Ray { origin, direction } => {
                let fraction = volume.ray_hits(origin, direction);
                (fraction.is_some(), fraction, None)
            }
        };
        let matches = self.expect.as_ref().map(|expect| expect.accepts(hit, lambda));
        CaseReport { name: self.name.clone(), hit, lambda, normal, matches }
    }
}

/// Named list of cases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario label
    pub name: String,
    /// Cases in evaluation order
    #[serde(default)]
    pub cases: Vec<ScenarioCase>,
}

impl Config for Scenario {}

/// Outcome of a whole scenario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    /// Per-case results in evaluation order
    pub cases: Vec<CaseReport>,
}

impl ScenarioReport {
    /// Number of cases whose expectation was not met
    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|case| case.matches == Some(false)).count()
    }

    /// True when no expectation failed
    pub fn all_passed(&self) -> bool {
        self.failures() == 0
    }
}

/// Scenario loading and validation errors
#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    /// Loading or parsing failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No cases to run
    #[error("Scenario has no cases")]
    Empty,

    /// A number in the case is NaN or infinite
    #[error("Case '{case}' has a non-finite {field}")]
    NonFinite {
        /// Case label
        case: String,
        /// Offending field
        field: &'static str,
    },
}

impl Scenario {
    /// Loads and validates a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let scenario = Self::load_from_file(path)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Rejects empty scenarios and non-finite numbers
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.cases.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for case in &self.cases {
            if let Some(field) = case.volume.non_finite_field().or_else(|| case.query.non_finite_field()) {
                return Err(ScenarioError::NonFinite { case: case.name.clone(), field });
            }
        }
        Ok(())
    }

    /// Validates, then evaluates every case
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        self.validate()?;
        log::info!("Running scenario '{}' ({} cases)", self.name, self.cases.len());

        let cases = self
            .cases
            .iter()
            .map(|case| {
                let report = case.evaluate();
                log::info!(
                    "{}: {} {} -> hit {} lambda {:?}",
                    report.name,
                    case.volume.kind().name(),
                    query_label(&case.query),
                    report.hit,
                    report.lambda
                );
                if report.matches == Some(false) {
                    log::warn!("{}: expected {:?}", report.name, case.expect);
                }
                report
            })
            .collect();
        Ok(ScenarioReport { cases })
    }
}

fn query_label(query: &QueryDesc) -> &'static str {
    match query {
        QueryDesc::Hits { .. } => "hits",
        QueryDesc::MoveHits { .. } => "move_hits",
        QueryDesc::PointMoveHits { .. } => "point_move_hits",
        QueryDesc::PointInside { .. } => "point_inside",
        QueryDesc::Ray { .. } => "ray",
    }
}
