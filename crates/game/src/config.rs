//! Scene configuration (window, headless run, smoke tuning). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use smoke::SmokeConfig;
use std::path::{Path, PathBuf};

/// Settings for one run. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    /// Run without a window: fixed-step ticks, stats to the log.
    #[serde(default)]
    pub headless: bool,
    /// Number of ticks in a headless run.
    #[serde(default = "default_headless_frames")]
    pub headless_frames: u32,
    /// Fixed frame time for headless runs, in seconds.
    #[serde(default = "default_headless_dt")]
    pub headless_dt: f32,
    /// Headless frame at which the smoke is switched off, if any.
    #[serde(default)]
    pub headless_smoke_off_at: Option<u32>,
    /// Tick the windowed scene at a fixed rate (Hz) instead of once per redraw.
    #[serde(default)]
    pub fixed_step_hz: Option<f64>,
    /// Log population stats every N frames (0 = never).
    #[serde(default = "default_log_every")]
    pub log_every: u32,
    #[serde(default)]
    pub smoke: SmokeConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_title() -> String {
    "Chimney Smoke".to_string()
}
fn default_headless_frames() -> u32 {
    3600
}
fn default_headless_dt() -> f32 {
    1.0 / 60.0
}
fn default_log_every() -> u32 {
    600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            title: default_title(),
            headless: false,
            headless_frames: default_headless_frames(),
            headless_dt: default_headless_dt(),
            headless_smoke_off_at: None,
            fixed_step_hz: None,
            log_every: default_log_every(),
            smoke: SmokeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        };
        match Self::parse(&data) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Parse a RON document and validate the smoke section.
    pub fn parse(data: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(data)?;
        config.smoke.validate()?;
        if !(config.headless_dt > 0.0 && config.headless_dt.is_finite()) {
            anyhow::bail!("headless_dt must be positive, got {}", config.headless_dt);
        }
        if let Some(hz) = config.fixed_step_hz {
            if !(hz > 0.0 && hz.is_finite()) {
                anyhow::bail!("fixed_step_hz must be positive, got {}", hz);
            }
        }
        Ok(config)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
