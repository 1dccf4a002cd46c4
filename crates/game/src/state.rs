//! Scene state shared by the windowed and headless hosts.

use anyhow::Result;
use engine_core::Time;
use input::{InputState, SceneCommand};
use smoke::{CameraRig, FrameUniforms, RenderSink, SmokeSimulation, TickStats, SMOKE_TINT};

use crate::config::AppConfig;

/// Most fixed sub-steps one frame may run; older backlog is dropped.
pub const MAX_SUBSTEPS: u32 = 8;

/// Everything one running scene owns: the smoke, the clock, the keyboard and
/// whatever consumes the rendered frames.
pub struct SceneState<S: RenderSink> {
    pub sim: SmokeSimulation,
    pub time: Time,
    pub input: InputState,
    pub camera: CameraRig,
    pub sink: S,
    pub running: bool,
    fixed_step: bool,
    log_every: u32,
}

impl<S: RenderSink> SceneState<S> {
    pub fn new(config: &AppConfig, mut sink: S) -> Result<Self> {
        let sim = SmokeSimulation::new(config.smoke.clone())?;

        let mut camera = CameraRig::default();
        camera.set_aspect(config.window_width, config.window_height);

        let mut time = Time::new();
        if let Some(hz) = config.fixed_step_hz {
            time.set_fixed_rate(hz);
            log::info!("Fixed smoke step: {:.4}s", time.fixed_timestep_seconds());
        }

        sink.upload_chimney(&procgen::chimney_mesh());

        Ok(Self {
            sim,
            time,
            input: InputState::new(),
            camera,
            sink,
            running: true,
            fixed_step: config.fixed_step_hz.is_some(),
            log_every: config.log_every,
        })
    }

    /// Apply this frame's key edges, then clear them.
    pub fn apply_commands(&mut self) {
        for command in self.input.commands() {
            match command {
                SceneCommand::SmokeOn => self.sim.activate(),
                SceneCommand::SmokeOff => self.sim.deactivate(),
                SceneCommand::ResetSmoke => self.sim.reset(),
                SceneCommand::Quit => {
                    log::info!("Quit requested");
                    self.running = false;
                }
            }
        }
        self.input.begin_frame();
    }

    /// Tick the smoke for the time the clock last advanced and hand the
    /// snapshot to the sink. The clock must already be advanced.
    pub fn step(&mut self) -> TickStats {
        let stats = if self.fixed_step {
            let dropped = self.time.limit_backlog(MAX_SUBSTEPS);
            if dropped > 0 {
                log::debug!("Dropped {} smoke steps after a slow frame", dropped);
            }
            let dt = self.time.fixed_timestep_seconds();
            let mut total = TickStats::default();
            while self.time.should_fixed_update() {
                // Each sub-step ends where the unconsumed backlog begins.
                let now = self.time.elapsed_seconds() - self.time.accumulated_seconds();
                let s = self.sim.tick(dt, now);
                total.admitted += s.admitted;
                total.respawned += s.respawned;
                total.retired += s.retired;
            }
            total.active = self.sim.active_count();
            total
        } else {
            self.sim.tick(self.time.delta_seconds(), self.time.elapsed_seconds())
        };

        let uniforms = FrameUniforms::new(&self.camera, SMOKE_TINT);
        self.sink.submit(self.sim.render_feed(), &uniforms);
        stats
    }

    /// One windowed frame: sample the wall clock, react to input, tick, draw.
    pub fn frame(&mut self) -> TickStats {
        self.time.update();
        self.apply_commands();
        let stats = self.step();
        if self.log_every > 0 && self.time.frame_count() % u64::from(self.log_every) == 0 {
            log::info!("{:.0} fps, {} particles", self.time.fps(), stats.active);
        }
        stats
    }
}
