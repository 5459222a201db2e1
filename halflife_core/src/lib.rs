#![forbid(unsafe_code)]

//! Core domain model and simulation engine for the half-life calculator.
//!
//! This crate provides:
//! - Domain types (regimen parameters, samples, series)
//! - Decay, dose and recurrence functions
//! - Series generation with a checked boundary
//! - Raw text input coercion
//! - Summaries, CSV/JSON export and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod decay;
pub mod dose;
pub mod engine;
pub mod input;
pub mod summary;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use decay::decay_factor;
pub use dose::{dose_at, schedule};
pub use engine::{
    checked_schedule, generate_series, generate_series_with, simulate, SimulationOptions,
};
pub use input::RegimenForm;
pub use summary::summarize;
pub use export::{OutputFormat, SimulationReport};
