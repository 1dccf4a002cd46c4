//! Frame clock for the host loop.
//!
//! The simulation only needs two numbers per tick: the delta since the previous
//! tick and an absolute "now" that drives the noise phase. Both come from here.

use std::time::{Duration, Instant};

/// Measures frame deltas and total elapsed time.
///
/// Windowed hosts call [`Time::update`] once per redraw to sample the wall
/// clock. Headless hosts call [`Time::advance`] with a fixed step instead, so
/// the same simulation can be replayed without a real clock.
#[derive(Debug)]
pub struct Time {
    /// Wall clock reading at the previous `update`.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for headless stepping (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock starting at zero elapsed time.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Sample the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(delta);
    }

    /// Step the clock by an explicit amount without touching the wall clock.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        self.accumulator += delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Time banked for fixed updates but not yet consumed, in seconds.
    pub fn accumulated_seconds(&self) -> f32 {
        self.accumulator.as_secs_f32()
    }

    /// Cap the banked time at `max_steps` fixed steps. Returns how many
    /// whole steps were dropped.
    pub fn limit_backlog(&mut self, max_steps: u32) -> u32 {
        let max = self.fixed_timestep * max_steps;
        if self.accumulator <= max {
            return 0;
        }
        let excess = self.accumulator - max;
        self.accumulator = max;
        (excess.as_nanos() / self.fixed_timestep.as_nanos().max(1)) as u32
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed timestep rate in Hz. Non-positive rates are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        if hz <= 0.0 || !hz.is_finite() {
            log::warn!("Ignoring invalid fixed rate {} Hz", hz);
            return;
        }
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed_and_frames() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(120));
        time.advance(Duration::from_millis(80));
        assert_eq!(time.frame_count(), 2);
        assert!((time.delta_seconds() - 0.08).abs() < 1e-6);
        assert!((time.elapsed_seconds() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn fixed_update_consumes_accumulator() {
        let mut time = Time::new();
        time.set_fixed_rate(10.0);
        time.advance(Duration::from_millis(250));
        assert!(time.should_fixed_update());
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
    }

    #[test]
    fn backlog_is_capped_after_a_hitch() {
        let mut time = Time::new();
        time.set_fixed_rate(10.0);
        time.advance(Duration::from_secs(10));
        assert_eq!(time.limit_backlog(8), 92);
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 8);
        assert_eq!(time.accumulated_seconds(), 0.0);
    }

    #[test]
    fn small_backlog_is_untouched() {
        let mut time = Time::new();
        time.set_fixed_rate(10.0);
        time.advance(Duration::from_millis(250));
        assert_eq!(time.limit_backlog(8), 0);
        assert!((time.accumulated_seconds() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn invalid_fixed_rate_is_ignored() {
        let mut time = Time::new();
        time.set_fixed_rate(0.0);
        assert!((time.fixed_timestep_seconds() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn fps_is_zero_before_first_frame() {
        let time = Time::new();
        assert_eq!(time.fps(), 0.0);
    }
}
