//! Chimney smoke: a bounded particle plume pushed around by noise-driven flow.
//!
//! Per frame the host calls [`SmokeSimulation::tick`] with the frame delta and
//! the absolute time, then [`SmokeSimulation::render_feed`] to get the point
//! records for the billboard pass.

pub mod config;
pub mod emission;
pub mod error;
pub mod feed;
pub mod lifecycle;
pub mod particle;
pub mod simulation;
pub mod stepper;

pub use config::*;
pub use emission::*;
pub use error::*;
pub use feed::*;
pub use lifecycle::{retire_if_expired, spawn, Admission, ParticlePool};
pub use particle::*;
pub use simulation::*;
pub use stepper::*;
