//! # Collision Kernel
//!
//! Collision volume primitives and the geometry queries between them.
//!
//! ## Features
//!
//! - **Six volumes**: sphere, oriented box, tapered capsule, tapered
//!   cylinder, triangle and view frustum
//! - **Static tests**: overlap between any pair of volumes
//! - **Swept tests**: first contact fraction and contact normal for a
//!   translating volume
//! - **Auxiliary queries**: point containment, closest point, surface
//!   normal, segment casts, enclosing spheres and boxes
//! - **Scenarios**: RON/TOML described cases for regression checks
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_kernel::prelude::*;
//!
//! let mover: CollisionVolume = CollisionSphere::new(Vec3::zeros(), 1.0).into();
//! let target: CollisionVolume = CollisionSphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0).into();
//!
//! assert!(!mover.hits(&target));
//! let hit = mover.move_hits(&target, &Vec3::new(2.0, 0.0, 0.0)).unwrap();
//! assert!((hit.lambda - 0.5).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::many_single_char_names)]

pub mod foundation;
pub mod config;
pub mod detection;
pub mod volume;
pub mod scenario;

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        detection::{lambda_or_miss, SweepHit},
        foundation::math::{tolerance, Quat, Vec3},
        scenario::{Scenario, ScenarioError},
        volume::{
            CollisionBox, CollisionCapsule, CollisionCylinder, CollisionFrustum, CollisionSphere,
            CollisionTriangle, CollisionVolume, Containment, VolumeKind, VolumeVisitor,
        },
    };
}
