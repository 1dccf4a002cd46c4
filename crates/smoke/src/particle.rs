//! A single smoke puff.

use glam::Vec3;

/// A smoke particle. Plain value type; the pool owns every instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// World units per second.
    pub velocity: Vec3,
    /// Normalized lifetime: 0 at spawn, expired at 1.
    pub age: f32,
    /// Render radius.
    pub size: f32,
}

impl Particle {
    /// True once the particle has lived its full lifespan.
    pub fn is_expired(&self) -> bool {
        self.age >= 1.0
    }
}
