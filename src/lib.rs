//! Contact force resolution and reporting for rigid body simulation.
//!
//! Each timestep, the collision engine reports penetrating point pairs and
//! the simulator supplies body poses and velocities. This crate turns those
//! into one immutable [`ContactReport`] per pair: the bodies involved, the
//! force on body B, the contact point, and the separation and slip speeds.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Scalar/vector abstraction over f32 and f64 (glam)
//! 2. **model** - Bodies, geometries, and model-scoped handles
//! 3. **material** - Contact material parameters and combination rules
//! 4. **contact** - Point-pair adapter, kinematics, force law, reports
//! 5. **ecs** - hecs integration (feature = "ecs")
//!
//! # Testing
//!
//! The JSON wire-shape and hecs bridge tests sit behind their features:
//!
//! ```text
//! Default:    cargo test
//! All:        cargo test --features full
//! Serial:     cargo test --no-default-features
//! ```

pub mod contact;
pub mod error;
pub mod material;
pub mod math;
pub mod model;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use contact::{
    BodyWrench, ContactConfig, ContactForce, ContactKinematics, ContactLaw, ContactPipeline,
    ContactReport, ContactResults, HuntCrossley, PointPair, RawPointPair, SkippedPair,
};

pub use error::{ContactError, PairDefect};

pub use material::{CombinedMaterial, ContactMaterial, CoulombFriction};

pub use math::{Real, Vector3};

pub use model::{BodyIndex, BodyState, ContactModel, GeometryId, ModelId, SimulationState};

#[cfg(feature = "ecs")]
pub use ecs::{BodyMotion, ContactGeometry, EcsContactScene, ForceAccumulator};

// Re-export glam for convenience
pub use glam;
