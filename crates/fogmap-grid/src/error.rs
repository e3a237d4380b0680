use thiserror::Error;

/// Invalid grid configuration. Raised once, when a [`crate::GridLayout`] is built.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("{axis} step must be a finite value greater than zero, got {value}")]
    InvalidStep { axis: &'static str, value: f64 },

    #[error("invalid {axis} bounds: min {min} must be finite and below max {max}")]
    InvalidRegion {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}

/// Failure while recording a visit.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("coordinate ({lat}, {lon}) is outside the exploration region")]
    OutOfBounds { lat: f64, lon: f64 },

    #[error("visit store failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
