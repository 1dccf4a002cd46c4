//! Windowless host: fixed frame time, stats to the log.

use std::time::Duration;

use anyhow::Result;

use crate::config::AppConfig;
use crate::sinks::StatsSink;
use crate::state::SceneState;

/// Run `config.headless_frames` ticks and return what the sink saw.
pub fn run(config: &AppConfig) -> Result<StatsSink> {
    let mut scene = SceneState::new(config, StatsSink::default())?;
    let dt = Duration::from_secs_f32(config.headless_dt);

    log::info!(
        "Headless run: {} frames at {:.4}s",
        config.headless_frames,
        config.headless_dt
    );

    for frame in 0..config.headless_frames {
        if config.headless_smoke_off_at == Some(frame) {
            scene.sim.deactivate();
        }
        scene.time.advance(dt);
        scene.apply_commands();
        let stats = scene.step();

        if config.log_every > 0 && frame % config.log_every == 0 {
            log::info!(
                "t={:.2}s active={} admitted={} respawned={} retired={}",
                scene.time.elapsed_seconds(),
                stats.active,
                stats.admitted,
                stats.respawned,
                stats.retired
            );
        }
    }

    log::info!(
        "Headless run done: {} frames, peak {} particles, {} left",
        scene.sink.frames,
        scene.sink.peak_active,
        scene.sink.last_active
    );
    Ok(scene.sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run() -> AppConfig {
        let mut config = AppConfig {
            headless: true,
            headless_frames: 240,
            headless_dt: 0.125,
            log_every: 0,
            ..Default::default()
        };
        config.smoke.seed = Some(11);
        config
    }

    #[test]
    fn headless_run_fills_by_bursts() {
        let sink = run(&short_run()).unwrap();
        assert_eq!(sink.frames, 240);
        assert_eq!(sink.last_active, 960);
        assert_eq!(sink.peak_active, 960);
    }

    #[test]
    fn smoke_off_stops_growth() {
        let config = AppConfig {
            headless_smoke_off_at: Some(10),
            ..short_run()
        };
        let sink = run(&config).unwrap();
        assert_eq!(sink.peak_active, 40);
        // 230 frames of 0.125s outlast every particle.
        assert_eq!(sink.last_active, 0);
    }

    #[test]
    fn invalid_smoke_config_fails() {
        let mut config = short_run();
        config.smoke.emission.burst = 0;
        assert!(run(&config).is_err());
    }
}
