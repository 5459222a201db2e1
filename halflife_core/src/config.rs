//! Configuration file support for the half-life simulator.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/halflife/config.toml`.

use crate::engine::{SimulationOptions, DEFAULT_MAX_TIME_SPAN};
use crate::export::OutputFormat;
use crate::{ClampPolicy, Error, RegimenParameters, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub regimen: RegimenConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Regimen used for any parameter not given on the command line
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegimenConfig {
    #[serde(default = "default_half_life")]
    pub half_life: f64,

    #[serde(default = "default_initial_dose")]
    pub initial_dose: f64,

    #[serde(default = "default_dose_interval")]
    pub dose_interval: u32,

    #[serde(default = "default_dose_increase")]
    pub dose_increase: f64,

    #[serde(default = "default_dose_increase_intervals")]
    pub dose_increase_intervals: u32,

    #[serde(default = "default_max_dose")]
    pub max_dose: f64,

    #[serde(default = "default_time_span")]
    pub time_span: u32,
}

impl Default for RegimenConfig {
    fn default() -> Self {
        Self {
            half_life: default_half_life(),
            initial_dose: default_initial_dose(),
            dose_interval: default_dose_interval(),
            dose_increase: default_dose_increase(),
            dose_increase_intervals: default_dose_increase_intervals(),
            max_dose: default_max_dose(),
            time_span: default_time_span(),
        }
    }
}

impl From<&RegimenConfig> for RegimenParameters {
    fn from(config: &RegimenConfig) -> Self {
        Self {
            half_life: config.half_life,
            initial_dose: config.initial_dose,
            dose_interval: config.dose_interval,
            dose_increase: config.dose_increase,
            dose_increase_intervals: config.dose_increase_intervals,
            max_dose: config.max_dose,
            time_span: config.time_span,
        }
    }
}

/// Simulation boundary configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_max_time_span")]
    pub max_time_span: u32,

    /// Also clamp the time-0 dose to `max_dose`
    #[serde(default)]
    pub clamp_initial_dose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_time_span: default_max_time_span(),
            clamp_initial_dose: false,
        }
    }
}

impl SimulationConfig {
    pub fn clamp_policy(&self) -> ClampPolicy {
        if self.clamp_initial_dose {
            ClampPolicy::AllDoses
        } else {
            ClampPolicy::EscalatedOnly
        }
    }

    pub fn options(&self) -> SimulationOptions {
        SimulationOptions {
            max_time_span: self.max_time_span,
            clamp_policy: self.clamp_policy(),
        }
    }
}

/// Output rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places for table output
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            precision: default_precision(),
        }
    }
}

// Default value functions
fn default_half_life() -> f64 {
    RegimenParameters::default().half_life
}

fn default_initial_dose() -> f64 {
    RegimenParameters::default().initial_dose
}

fn default_dose_interval() -> u32 {
    RegimenParameters::default().dose_interval
}

fn default_dose_increase() -> f64 {
    RegimenParameters::default().dose_increase
}

fn default_dose_increase_intervals() -> u32 {
    RegimenParameters::default().dose_increase_intervals
}

fn default_max_dose() -> f64 {
    RegimenParameters::default().max_dose
}

fn default_time_span() -> u32 {
    RegimenParameters::default().time_span
}

fn default_max_time_span() -> u32 {
    DEFAULT_MAX_TIME_SPAN
}

fn default_precision() -> usize {
    4
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME")
                    .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("halflife").join("config.toml"))
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;
        crate::export::write_atomic(path, contents.as_bytes())?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Default regimen as engine parameters
    pub fn regimen(&self) -> RegimenParameters {
        RegimenParameters::from(&self.regimen)
    }
}
