//! Turbulent flow sampled from gradient noise.
//!
//! The flow is a pure function of position and time: nothing is cached, every
//! query reads the noise field again. Only horizontal components are produced;
//! vertical motion is left to buoyancy.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseField;

/// Tuning for [`FlowSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    /// World-to-noise coordinate scale (lower = broader swirls).
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// How fast the X sample scrolls through noise space, per second.
    #[serde(default = "default_x_phase_rate")]
    pub x_phase_rate: f32,
    /// How fast the Z sample scrolls through noise space, per second.
    #[serde(default = "default_z_phase_rate")]
    pub z_phase_rate: f32,
    /// Output multiplier applied after centering.
    #[serde(default = "default_gain")]
    pub gain: f32,
}

fn default_scale() -> f32 {
    0.8
}
fn default_x_phase_rate() -> f32 {
    0.2
}
fn default_z_phase_rate() -> f32 {
    0.3
}
fn default_gain() -> f32 {
    1.2
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            x_phase_rate: default_x_phase_rate(),
            z_phase_rate: default_z_phase_rate(),
            gain: default_gain(),
        }
    }
}

/// Maps `(position, time)` to a horizontal velocity perturbation.
#[derive(Debug, Clone, Copy)]
pub struct FlowSampler<'a> {
    noise: &'a NoiseField,
    params: FlowParams,
}

impl<'a> FlowSampler<'a> {
    pub fn new(noise: &'a NoiseField, params: FlowParams) -> Self {
        Self { noise, params }
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    /// Velocity perturbation at `position` and absolute time `time` (seconds).
    ///
    /// The two samples read the noise along different axes with different
    /// scroll rates so the X and Z components stay uncorrelated.
    pub fn velocity_perturbation(&self, position: Vec3, time: f32) -> Vec3 {
        let FlowParams { scale, x_phase_rate, z_phase_rate, gain } = self.params;
        let p = position * scale;

        let nx = self.noise.sample(p.x + time * x_phase_rate, p.y, p.z) - 0.5;
        let nz = self.noise.sample(p.z, p.x + time * z_phase_rate, p.y) - 0.5;

        Vec3::new(nx, 0.0, nz) * gain
    }
}
