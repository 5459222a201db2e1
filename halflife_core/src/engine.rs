//! Simulation engine turning a regimen into a quantity series.
//!
//! The pipeline runs in a fixed order:
//! - Derive the decay factor once from the half-life
//! - For each time step, derive the dose due at that step
//! - Fold the previous quantity, decay factor and dose into the next quantity
//!
//! `generate_series` is total: any numeric input yields a same-shaped series,
//! with NaN and infinities propagating. `simulate` is the checked entry point
//! that rejects contract violations before running the engine.

use crate::decay::decay_factor;
use crate::dose::{dose_at_with, schedule};
use crate::{ClampPolicy, DoseEvent, Error, RegimenParameters, Result, Sample, Series};

/// Default cap on `time_span` accepted by [`simulate`]
pub const DEFAULT_MAX_TIME_SPAN: u32 = 100_000;

/// Quantity after one step: the previous quantity decays, then the dose lands
pub fn next_quantity(previous: f64, dose: f64, factor: f64) -> f64 {
    previous * factor + dose
}

/// Generate the series under the default clamp policy
pub fn generate_series(params: &RegimenParameters) -> Series {
    generate_series_with(params, ClampPolicy::default())
}

/// Generate one sample per time step from 0 to `time_span` inclusive
pub fn generate_series_with(params: &RegimenParameters, policy: ClampPolicy) -> Series {
    let factor = decay_factor(params.half_life);
    let mut series = Series::with_capacity(params.time_span as usize + 1);

    let mut quantity = 0.0;
    for time in 0..=params.time_span {
        let dose = dose_at_with(params, time, policy);
        quantity = next_quantity(quantity, dose, factor);
        series.push(Sample { time, quantity });
    }

    series
}

/// Knobs for the checked simulation boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationOptions {
    pub max_time_span: u32,
    pub clamp_policy: ClampPolicy,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            max_time_span: DEFAULT_MAX_TIME_SPAN,
            clamp_policy: ClampPolicy::default(),
        }
    }
}

/// Check the regimen against the simulation contract
///
/// Rejects a half-life at or below zero and a time span above the
/// configured cap. A NaN half-life is let through and produces a series of
/// NaN quantities, matching how other malformed numeric input behaves.
pub fn check_regimen(params: &RegimenParameters, options: &SimulationOptions) -> Result<()> {
    if params.half_life <= 0.0 {
        tracing::warn!("Rejecting regimen with half-life {}", params.half_life);
        return Err(Error::InvalidRegimen(format!(
            "half-life must be positive, got {}",
            params.half_life
        )));
    }

    if params.time_span > options.max_time_span {
        tracing::warn!(
            "Rejecting time span {} (cap {})",
            params.time_span,
            options.max_time_span
        );
        return Err(Error::InvalidRegimen(format!(
            "time span {} exceeds the maximum of {}",
            params.time_span, options.max_time_span
        )));
    }

    Ok(())
}

/// Check the regimen, then generate the series
pub fn simulate(params: &RegimenParameters, options: &SimulationOptions) -> Result<Series> {
    check_regimen(params, options)?;

    let series = generate_series_with(params, options.clamp_policy);
    tracing::debug!(
        "Simulated {} samples (half-life {}, policy {:?})",
        series.len(),
        params.half_life,
        options.clamp_policy
    );
    Ok(series)
}

/// Check the regimen, then list every dose it administers
pub fn checked_schedule(
    params: &RegimenParameters,
    options: &SimulationOptions,
) -> Result<Vec<DoseEvent>> {
    check_regimen(params, options)?;
    Ok(schedule(params, options.clamp_policy))
}

impl RegimenParameters {
    /// Report every questionable parameter without rejecting anything
    ///
    /// The engine accepts all of these; callers wanting clean output can
    /// refuse to continue when the list is non-empty.
    pub fn validate(&self, max_time_span: u32) -> Vec<String> {
        let mut problems = Vec::new();

        let reals = [
            ("half-life", self.half_life),
            ("initial dose", self.initial_dose),
            ("dose increase", self.dose_increase),
            ("max dose", self.max_dose),
        ];
        for (name, value) in reals {
            if value.is_nan() {
                problems.push(format!("{} is not a number", name));
            }
        }

        if self.half_life <= 0.0 {
            problems.push(format!("half-life must be positive, got {}", self.half_life));
        }
        if self.initial_dose < 0.0 {
            problems.push(format!("initial dose is negative ({})", self.initial_dose));
        }
        if self.dose_increase < 0.0 {
            problems.push(format!("dose increase is negative ({})", self.dose_increase));
        }
        if self.max_dose < 0.0 {
            problems.push(format!("max dose is negative ({})", self.max_dose));
        }
        if self.dose_interval == 0 {
            problems.push("dose interval is 0, only the initial dose is given".into());
        }
        if self.dose_increase_intervals == 0 {
            problems.push("dose increase interval is 0, escalation is disabled".into());
        }
        if self.time_span > max_time_span {
            problems.push(format!(
                "time span {} exceeds the maximum of {}",
                self.time_span, max_time_span
            ));
        }

        problems
    }
}
