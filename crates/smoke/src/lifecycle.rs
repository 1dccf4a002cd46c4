//! Particle lifecycle: spawning, recycling and the fixed-capacity pool.
//!
//! Particles are never freed one by one. Birth and death are both a write to a
//! slot in a pool whose storage is allocated once, so memory use is fixed by
//! the configured capacity.

use glam::Vec3;
use rand::Rng;

use crate::config::{EmissionConfig, ParticleParams};
use crate::emission::EmissionSource;
use crate::particle::Particle;

/// A fresh particle somewhere on the source's spawn disk.
pub fn spawn<R: Rng + ?Sized>(
    source: &EmissionSource,
    params: &ParticleParams,
    rng: &mut R,
) -> Particle {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let radius = rng.gen::<f32>() * source.base_radius();
    let position = source.position() + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);

    let up = params.upward_speed_min
        + rng.gen::<f32>() * (params.upward_speed_max - params.upward_speed_min);
    let velocity = Vec3::new(
        (rng.gen::<f32>() - 0.5) * params.horizontal_jitter,
        up,
        (rng.gen::<f32>() - 0.5) * params.horizontal_jitter,
    );

    let variation = params.size_variation_min
        + rng.gen::<f32>() * (params.size_variation_max - params.size_variation_min);

    Particle {
        position,
        velocity,
        age: 0.0,
        size: params.size_base * variation,
    }
}

/// Respawn `particle` in place if its age has reached 1. Returns whether it did.
pub fn retire_if_expired<R: Rng + ?Sized>(
    particle: &mut Particle,
    source: &EmissionSource,
    params: &ParticleParams,
    rng: &mut R,
) -> bool {
    if !particle.is_expired() {
        return false;
    }
    *particle = spawn(source, params, rng);
    true
}

/// Fixed-capacity arena of particles.
///
/// Live particles occupy `slots[..active]`. Retiring a slot moves the last live
/// particle into it, so iteration order is not stable across frames.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Box<[Particle]>,
    active: usize,
}

impl ParticlePool {
    /// Allocate `capacity` slots up front. The pool never grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity].into_boxed_slice(),
            active: 0,
        }
    }

    /// Total number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.active
    }

    /// True when no particle is live.
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// True when every slot holds a live particle.
    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Live particles, in slot order.
    pub fn as_slice(&self) -> &[Particle] {
        &self.slots[..self.active]
    }

    /// Live particles, mutable. Free slots are never exposed.
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.slots[..self.active]
    }

    /// Iterate over live particles.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.as_slice().iter()
    }

    /// Write `particle` into the next free slot. Returns false when full.
    pub fn push(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots[self.active] = particle;
        self.active += 1;
        true
    }

    /// Free the slot at `index` by moving the last live particle into it.
    pub fn retire(&mut self, index: usize) {
        if index >= self.active {
            return;
        }
        self.active -= 1;
        self.slots.swap(index, self.active);
    }

    /// Retire every particle.
    pub fn clear(&mut self) {
        self.active = 0;
    }
}

/// Admission cadence for new particles.
///
/// While the source is active the timer accumulates frame time; each time it
/// reaches the interval it resets to zero and lets one burst through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admission {
    interval: f32,
    burst: usize,
    timer: f32,
}

impl Admission {
    /// Cadence from config, with the timer at zero.
    pub fn new(config: &EmissionConfig) -> Self {
        Self {
            interval: config.interval,
            burst: config.burst,
            timer: 0.0,
        }
    }

    /// Seconds accumulated towards the next burst.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Restart the wait for the next burst.
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Advance the timer and admit a burst into `pool` if one is due.
    /// Returns how many particles were admitted.
    pub fn admit<R: Rng + ?Sized>(
        &mut self,
        pool: &mut ParticlePool,
        source: &EmissionSource,
        params: &ParticleParams,
        rng: &mut R,
        dt: f32,
    ) -> usize {
        if !source.is_active() {
            return 0;
        }
        self.timer += dt;
        if self.timer < self.interval {
            return 0;
        }
        self.timer = 0.0;

        let mut admitted = 0;
        while admitted < self.burst && pool.push(spawn(source, params, rng)) {
            admitted += 1;
        }
        if pool.is_full() && admitted < self.burst {
            log::debug!("Smoke pool saturated at {} particles", pool.capacity());
        }
        admitted
    }
}
