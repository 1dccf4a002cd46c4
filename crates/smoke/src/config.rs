//! Smoke tuning. Every constant the simulation uses lives here so a scene can
//! be re-tuned from a RON file without recompiling.

use glam::Vec3;
use procgen::FlowParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// What happens to a particle whose age reaches 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecyclePolicy {
    /// Respawn in place while the source is active, retire the slot otherwise.
    #[default]
    GateOnActive,
    /// Always respawn in place, even after the source is switched off.
    Always,
}

impl RecyclePolicy {
    /// Whether an expired particle should be respawned given the source state.
    pub fn respawns(self, source_active: bool) -> bool {
        match self {
            RecyclePolicy::GateOnActive => source_active,
            RecyclePolicy::Always => true,
        }
    }
}

/// The chimney outlet particles are born from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Center of the spawn disk in world space.
    pub position: Vec3,
    /// Radius of the horizontal spawn disk.
    pub base_radius: f32,
    /// Whether the source emits from the first frame.
    pub start_active: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 0.0),
            base_radius: 0.03,
            start_active: true,
        }
    }
}

/// Admission cadence: `burst` particles every `interval` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    pub interval: f32,
    pub burst: usize,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            interval: 0.12,
            burst: 4,
        }
    }
}

/// Per-particle spawn values and motion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Seconds from spawn to expiry.
    pub lifespan: f32,
    pub upward_speed_min: f32,
    pub upward_speed_max: f32,
    /// Full width of the uniform horizontal velocity jitter at spawn.
    pub horizontal_jitter: f32,
    /// Render radius before height growth.
    pub size_base: f32,
    /// Spawn size is `size_base` times a value drawn from this range.
    pub size_variation_min: f32,
    pub size_variation_max: f32,
    /// Size multiplier reached at full height factor.
    pub size_growth: f32,
    /// Upward acceleration, units/s².
    pub buoyancy: f32,
    /// Height above the source at which the height factor saturates.
    pub height_falloff: f32,
    /// Flow intensity at the source.
    pub flow_intensity_base: f32,
    /// Extra flow intensity added at full height factor.
    pub flow_intensity_height: f32,
    /// Outward push strength at full height factor.
    pub spread: f32,
    /// Bias keeping the radial direction defined on the source axis.
    pub radial_epsilon: f32,
    /// Velocity multiplier applied once per step (not scaled by dt).
    pub damping: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            lifespan: 22.0,
            upward_speed_min: 1.0,
            upward_speed_max: 1.8,
            horizontal_jitter: 0.02,
            size_base: 0.15,
            size_variation_min: 0.8,
            size_variation_max: 1.2,
            size_growth: 1.7,
            buoyancy: 0.5,
            height_falloff: 4.0,
            flow_intensity_base: 0.4,
            flow_intensity_height: 1.6,
            spread: 0.3,
            radial_epsilon: 1e-6,
            damping: 0.995,
        }
    }
}

/// Complete smoke configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeConfig {
    /// Hard ceiling on live particles.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// RNG seed for spawning. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Shuffle seed for the noise table. `None` keeps the classic table.
    #[serde(default)]
    pub noise_seed: Option<u64>,
    #[serde(default)]
    pub recycle: RecyclePolicy,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub emission: EmissionConfig,
    #[serde(default)]
    pub particle: ParticleParams,
    #[serde(default)]
    pub flow: FlowParams,
}

/// Largest accepted `capacity`. The pool and the render feed are allocated in
/// full up front, so this bounds startup memory.
pub const MAX_CAPACITY: usize = 1 << 20;

fn default_capacity() -> usize {
    1000
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            seed: None,
            noise_seed: None,
            recycle: RecyclePolicy::default(),
            source: SourceConfig::default(),
            emission: EmissionConfig::default(),
            particle: ParticleParams::default(),
            flow: FlowParams::default(),
        }
    }
}

impl SmokeConfig {
    /// Parse and validate a RON document. Missing fields take their defaults.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Reject values the stepper cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        if self.emission.burst == 0 {
            return Err(ConfigError::ZeroBurst);
        }

        let p = &self.particle;
        positive("emission.interval", self.emission.interval)?;
        positive("particle.lifespan", p.lifespan)?;
        positive("particle.height_falloff", p.height_falloff)?;
        positive("particle.size_base", p.size_base)?;
        positive("particle.radial_epsilon", p.radial_epsilon)?;
        positive("flow.scale", self.flow.scale)?;
        not_negative("source.base_radius", self.source.base_radius)?;
        not_negative("particle.horizontal_jitter", p.horizontal_jitter)?;

        if !(p.damping > 0.0 && p.damping <= 1.0) {
            return Err(ConfigError::Damping(p.damping));
        }
        ordered("particle.upward_speed", p.upward_speed_min, p.upward_speed_max)?;
        ordered("particle.size_variation", p.size_variation_min, p.size_variation_max)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn not_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn ordered(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { name, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SmokeConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = SmokeConfig::from_ron_str("(capacity: 64, seed: Some(7))").unwrap();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.emission, EmissionConfig::default());
        assert_eq!(config.particle, ParticleParams::default());
        assert_eq!(config.recycle, RecyclePolicy::GateOnActive);
    }

    #[test]
    fn ron_round_trip_preserves_config() {
        let mut config = SmokeConfig::default();
        config.recycle = RecyclePolicy::Always;
        config.noise_seed = Some(3);
        let text = config.to_ron_string().unwrap();
        assert_eq!(SmokeConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = SmokeConfig::from_ron_str("(capacity: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity));
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let err = SmokeConfig::from_ron_str("(capacity: 4611686018427387904)").unwrap_err();
        assert!(matches!(err, ConfigError::CapacityTooLarge { max: MAX_CAPACITY, .. }));

        let at_limit = SmokeConfig {
            capacity: MAX_CAPACITY,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn bad_damping_is_rejected() {
        let mut config = SmokeConfig::default();
        config.particle.damping = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Damping(_))));
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        let mut config = SmokeConfig::default();
        config.particle.upward_speed_min = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange { name: "particle.upward_speed", .. })
        ));
    }

    #[test]
    fn non_positive_lifespan_is_rejected() {
        let mut config = SmokeConfig::default();
        config.particle.lifespan = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "particle.lifespan", .. })
        ));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = SmokeConfig::from_ron_str("(capacity: \"lots\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SmokeConfig::load("definitely/not/here/smoke.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn recycle_policy_gates_on_source_state() {
        assert!(RecyclePolicy::GateOnActive.respawns(true));
        assert!(!RecyclePolicy::GateOnActive.respawns(false));
        assert!(RecyclePolicy::Always.respawns(false));
    }
}
