//! Error types for the mapfit_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mapfit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A workout input failed validation (non-finite or non-positive)
    #[error("invalid workout metric: {0}")]
    InvalidMetric(String),

    /// A record with this id is already in the store (programming error)
    #[error("duplicate workout id: {0}")]
    DuplicateId(Uuid),

    /// Persisted workout data could not be decoded
    #[error("corrupt workout data: {0}")]
    CorruptData(String),

    /// No workout with the requested id exists
    #[error("no workout with id {0}")]
    NotFound(Uuid),

    /// The workout form was submitted while hidden
    #[error("workout form is not open")]
    FormHidden,

    /// The geolocation query failed or was denied
    #[error("current position unavailable: {0}")]
    PositionUnavailable(String),

    /// A map operation was attempted before the view finished initializing
    #[error("map view is not ready")]
    MapNotReady,
}
