//! Per-frame integration of the whole pool.

use glam::Vec3;
use procgen::FlowSampler;
use rand::Rng;

use crate::config::{ParticleParams, RecyclePolicy};
use crate::emission::EmissionSource;
use crate::lifecycle::{self, ParticlePool};
use crate::particle::Particle;

/// Counts of what happened to the pool during one `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Expired particles respawned in place.
    pub respawned: usize,
    /// Expired particles whose slot was freed.
    pub retired: usize,
}

/// Everything a step reads but never writes.
#[derive(Debug, Clone, Copy)]
pub struct Stepper<'a> {
    pub flow: FlowSampler<'a>,
    pub source: &'a EmissionSource,
    pub params: &'a ParticleParams,
    pub recycle: RecyclePolicy,
}

impl<'a> Stepper<'a> {
    /// Advance every live particle by `dt` seconds at absolute time `now`.
    ///
    /// A zero or negative `dt` leaves the pool untouched. Damping is applied
    /// once per call rather than scaled by `dt`, so longer frames are damped
    /// less per second than short ones.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        pool: &mut ParticlePool,
        rng: &mut R,
        dt: f32,
        now: f32,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if dt <= 0.0 {
            return outcome;
        }

        let respawn = self.recycle.respawns(self.source.is_active());
        let age_step = dt / self.params.lifespan;

        let mut i = 0;
        while i < pool.len() {
            let particle = &mut pool.as_mut_slice()[i];
            particle.age += age_step;

            if !particle.is_expired() {
                self.integrate(particle, dt, now);
            } else if respawn {
                lifecycle::retire_if_expired(particle, self.source, self.params, rng);
                outcome.respawned += 1;
            } else {
                // The last live particle moves into slot i and still needs its step.
                pool.retire(i);
                outcome.retired += 1;
                continue;
            }
            i += 1;
        }

        outcome
    }

    /// Forces and integration for one live, unexpired particle.
    fn integrate(&self, p: &mut Particle, dt: f32, now: f32) {
        let params = self.params;

        p.velocity.y += params.buoyancy * dt;

        let h = self.source.height_factor(p.position, params.height_falloff);

        let flow = self.flow.velocity_perturbation(p.position, now);
        p.velocity += flow * dt * (params.flow_intensity_base + params.flow_intensity_height * h);

        let radial = self.source.radial_direction(p.position, params.radial_epsilon);
        p.velocity += Vec3::new(radial.x, 0.0, radial.y) * params.spread * h * dt;

        p.velocity *= params.damping;
        p.position += p.velocity * dt;

        p.size = params.size_base * (1.0 + (params.size_growth - 1.0) * h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{FlowParams, NoiseField};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(active: bool) -> EmissionSource {
        EmissionSource::new(Vec3::new(0.0, 0.5, 0.0), 0.03, active)
    }

    fn filled_pool(rng: &mut StdRng, src: &EmissionSource, n: usize) -> ParticlePool {
        let params = ParticleParams::default();
        let mut pool = ParticlePool::with_capacity(n);
        for _ in 0..n {
            pool.push(lifecycle::spawn(src, &params, rng));
        }
        pool
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(10);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = filled_pool(&mut rng, &src, 50);
        stepper.advance(&mut pool, &mut rng, 0.3, 1.0);
        let before: Vec<Particle> = pool.as_slice().to_vec();

        let outcome = stepper.advance(&mut pool, &mut rng, 0.0, 2.0);
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(pool.as_slice(), before.as_slice());
    }

    #[test]
    fn live_particles_keep_age_below_one() {
        let mut rng = StdRng::seed_from_u64(11);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = filled_pool(&mut rng, &src, 100);
        let mut now = 0.0;
        for _ in 0..400 {
            now += 0.1;
            stepper.advance(&mut pool, &mut rng, 0.1, now);
            for p in pool.iter() {
                assert!(p.age >= 0.0 && p.age < 1.0);
                assert!(p.position.is_finite() && p.velocity.is_finite());
            }
        }
        assert_eq!(pool.len(), 100);
    }

    #[test]
    fn near_expiry_particle_respawns() {
        let mut rng = StdRng::seed_from_u64(12);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = ParticlePool::with_capacity(1);
        pool.push(Particle {
            position: Vec3::new(1.2, 6.0, -0.7),
            velocity: Vec3::new(0.1, 0.9, 0.0),
            age: 0.999,
            size: 0.25,
        });

        let outcome = stepper.advance(&mut pool, &mut rng, 0.1, 5.0);
        assert_eq!(outcome.respawned, 1);
        let p = pool.as_slice()[0];
        assert_eq!(p.age, 0.0);
        assert_eq!(p.position.y, 0.5);
        assert!(glam::Vec2::new(p.position.x, p.position.z).length() <= 0.03 + 1e-6);
    }

    #[test]
    fn inactive_source_retires_expired_particles() {
        let mut rng = StdRng::seed_from_u64(13);
        let noise = NoiseField::classic();
        let src = source(false);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::GateOnActive,
        };
        let mut pool = ParticlePool::with_capacity(3);
        for age in [0.2, 0.999, 0.9995] {
            pool.push(Particle {
                age,
                ..lifecycle::spawn(&src, &params, &mut rng)
            });
        }

        let outcome = stepper.advance(&mut pool, &mut rng, 0.1, 0.0);
        assert_eq!(outcome.retired, 2);
        assert_eq!(pool.len(), 1);
        assert!(pool.as_slice()[0].age < 0.3);
    }

    #[test]
    fn always_policy_respawns_while_inactive() {
        let mut rng = StdRng::seed_from_u64(14);
        let noise = NoiseField::classic();
        let src = source(false);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::Always,
        };
        let mut pool = ParticlePool::with_capacity(1);
        pool.push(Particle {
            age: 0.9999,
            ..lifecycle::spawn(&src, &params, &mut rng)
        });
        let outcome = stepper.advance(&mut pool, &mut rng, 0.1, 0.0);
        assert_eq!(outcome.respawned, 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn particle_on_axis_stays_finite() {
        let mut rng = StdRng::seed_from_u64(15);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = ParticlePool::with_capacity(1);
        pool.push(Particle {
            position: Vec3::new(0.0, 4.5, 0.0),
            velocity: Vec3::ZERO,
            age: 0.1,
            size: 0.15,
        });
        stepper.advance(&mut pool, &mut rng, 0.016, 0.0);
        let p = pool.as_slice()[0];
        assert!(p.velocity.is_finite());
        assert!(p.position.is_finite());
    }

    #[test]
    fn size_grows_with_height() {
        let mut rng = StdRng::seed_from_u64(16);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = ParticlePool::with_capacity(2);
        let low = Particle {
            position: Vec3::new(0.01, 0.5, 0.0),
            age: 0.1,
            ..Default::default()
        };
        let high = Particle {
            position: Vec3::new(0.5, 10.0, 0.5),
            ..low
        };
        pool.push(low);
        pool.push(high);
        stepper.advance(&mut pool, &mut rng, 0.01, 0.0);
        let sizes: Vec<f32> = pool.iter().map(|p| p.size).collect();
        assert!((sizes[0] - 0.15).abs() < 1e-6);
        assert!((sizes[1] - 0.15 * 1.7).abs() < 1e-6);
    }

    #[test]
    fn buoyancy_lifts_a_resting_particle() {
        let mut rng = StdRng::seed_from_u64(17);
        let noise = NoiseField::classic();
        let src = source(true);
        let params = ParticleParams::default();
        let stepper = Stepper {
            flow: FlowSampler::new(&noise, FlowParams::default()),
            source: &src,
            params: &params,
            recycle: RecyclePolicy::default(),
        };
        let mut pool = ParticlePool::with_capacity(1);
        pool.push(Particle {
            position: Vec3::new(0.0, 0.5, 0.0),
            ..Default::default()
        });
        stepper.advance(&mut pool, &mut rng, 0.1, 0.0);
        let p = pool.as_slice()[0];
        assert!((p.velocity.y - 0.05 * 0.995).abs() < 1e-6);
        assert!(p.position.y > 0.5);
    }
}
