//! Core engine types and utilities for the chimney smoke scene.
//!
//! This crate provides the pieces every other crate leans on:
//! - Frame timing for the host loop
//! - Math type re-exports

pub mod time;

pub use time::*;

// Re-export commonly used types
pub use glam::{Mat4, Vec2, Vec3, Vec4};
