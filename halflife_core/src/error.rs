//! Error types for the halflife_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for halflife_core operations
///
/// The simulation engine itself never fails; these cover the boundary
/// around it (input coercion, contract checks, config and export).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A raw input field could not be coerced to its numeric type
    #[error("Invalid value for {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    /// Regimen parameters violate the simulation contract
    #[error("Invalid regimen: {0}")]
    InvalidRegimen(String),
}
