//! Error types for the celestial core.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("zoom range [{min}, {max}] is empty or not positive")]
    InvalidZoomRange { min: f32, max: f32 },

    #[error("default zoom {zoom} lies outside [{min}, {max}]")]
    ZoomOutOfRange { zoom: f32, min: f32, max: f32 },

    #[error("timestep {0} must be finite and non-negative")]
    InvalidTimestep(f64),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
