//! Procedural generation for the scene: turbulence noise, flow sampling and
//! chimney geometry.

pub mod chimney;
pub mod flow;
pub mod noise_field;

pub use chimney::*;
pub use flow::*;
pub use noise_field::*;
