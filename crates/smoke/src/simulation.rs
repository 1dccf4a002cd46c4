//! The simulation context: owns every piece of smoke state for one scene.
//!
//! Nothing in the smoke system is global. The noise table, the source's on/off
//! flag, the RNG and the pool all live in [`SmokeSimulation`], built once at
//! startup and ticked once per frame by the host loop.

use procgen::{FlowSampler, NoiseField};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SmokeConfig;
use crate::emission::EmissionSource;
use crate::error::ConfigError;
use crate::feed::RenderFeed;
use crate::lifecycle::{Admission, ParticlePool};
use crate::stepper::Stepper;

/// What one tick did to the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub admitted: usize,
    pub respawned: usize,
    pub retired: usize,
    /// Live particles after the tick.
    pub active: usize,
}

/// One chimney's smoke: configuration, noise, source, pool and RNG.
///
/// Build with [`SmokeSimulation::new`], then call [`tick`](Self::tick) once
/// per frame and [`render_feed`](Self::render_feed) to draw.
pub struct SmokeSimulation {
    config: SmokeConfig,
    noise: NoiseField,
    source: EmissionSource,
    pool: ParticlePool,
    admission: Admission,
    rng: StdRng,
    feed: RenderFeed,
}

impl SmokeSimulation {
    /// Validate `config` and allocate the pool. Fails before allocating if the
    /// config is rejected.
    pub fn new(config: SmokeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let noise = match config.noise_seed {
            Some(seed) => NoiseField::seeded(seed),
            None => NoiseField::classic(),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Smoke simulation ready: capacity {}, burst {} every {}s, lifespan {}s, recycle {:?}",
            config.capacity,
            config.emission.burst,
            config.emission.interval,
            config.particle.lifespan,
            config.recycle,
        );

        Ok(Self {
            source: EmissionSource::from_config(&config.source),
            pool: ParticlePool::with_capacity(config.capacity),
            admission: Admission::new(&config.emission),
            feed: RenderFeed::with_capacity(config.capacity),
            noise,
            rng,
            config,
        })
    }

    /// Run one frame: admit a burst if due, then step every particle.
    pub fn tick(&mut self, dt: f32, now: f32) -> TickStats {
        let admitted = self.admission.admit(
            &mut self.pool,
            &self.source,
            &self.config.particle,
            &mut self.rng,
            dt,
        );

        let stepper = Stepper {
            flow: FlowSampler::new(&self.noise, self.config.flow),
            source: &self.source,
            params: &self.config.particle,
            recycle: self.config.recycle,
        };
        let outcome = stepper.advance(&mut self.pool, &mut self.rng, dt, now);

        TickStats {
            admitted,
            respawned: outcome.respawned,
            retired: outcome.retired,
            active: self.pool.len(),
        }
    }

    /// Start emitting (input "activate" edge).
    pub fn activate(&mut self) {
        self.set_active(true);
    }

    /// Stop emitting (input "deactivate" edge). Live particles keep moving.
    pub fn deactivate(&mut self) {
        self.set_active(false);
    }

    /// Switch emission on or off. Logs only when the state changes.
    pub fn set_active(&mut self, active: bool) {
        if self.source.set_active(active) {
            log::info!(
                "Smoke source {} ({} particles live)",
                if active { "on" } else { "off" },
                self.pool.len()
            );
        }
    }

    /// Whether the source is currently emitting.
    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    /// Drop every particle and restart the admission timer.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.admission.reset();
        log::debug!("Smoke simulation reset");
    }

    /// Rebuild and return the render snapshot. Call after `tick`.
    pub fn render_feed(&mut self) -> &RenderFeed {
        self.feed.refresh(&self.pool);
        &self.feed
    }

    /// Live particles.
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// The emission source.
    pub fn source(&self) -> &EmissionSource {
        &self.source
    }

    /// The noise table driving the flow.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// The validated configuration this simulation was built from.
    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    /// Number of live particles.
    pub fn active_count(&self) -> usize {
        self.pool.len()
    }
}
