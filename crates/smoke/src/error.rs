//! Errors raised while building a smoke simulation from configuration.
//!
//! Stepping itself never fails; everything here is caught up front.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("particle capacity must be at least 1")]
    ZeroCapacity,

    #[error("particle capacity {capacity} exceeds the limit of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("burst size must be at least 1")]
    ZeroBurst,

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("damping must be in (0, 1], got {0}")]
    Damping(f32),

    #[error("{name} range is empty: min {min} > max {max}")]
    EmptyRange { name: &'static str, min: f32, max: f32 },

    #[error("failed to parse smoke config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize smoke config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
