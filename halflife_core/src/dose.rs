//! Dose derivation for the recurring, escalating schedule.
//!
//! Dosing rules:
//! - Time 0 always receives the initial dose
//! - Every multiple of `dose_interval` after that receives an escalated dose
//! - Escalation adds `dose_increase` per whole `dose_increase_intervals` elapsed
//! - Escalated doses are capped at `max_dose`
//! - All other steps receive nothing

use crate::{ClampPolicy, DoseEvent, RegimenParameters};

/// Dose administered at `time` under the default clamp policy
pub fn dose_at(params: &RegimenParameters, time: u32) -> f64 {
    dose_at_with(params, time, ClampPolicy::default())
}

/// Dose administered at `time` under an explicit clamp policy
pub fn dose_at_with(params: &RegimenParameters, time: u32, policy: ClampPolicy) -> f64 {
    if time == 0 {
        return match policy {
            ClampPolicy::EscalatedOnly => params.initial_dose,
            ClampPolicy::AllDoses => cap(params.initial_dose, params.max_dose),
        };
    }

    if !is_dose_step(params, time) {
        return 0.0;
    }

    cap(escalated_dose(params, time), params.max_dose)
}

/// `min` that propagates NaN from either side
fn cap(dose: f64, max_dose: f64) -> f64 {
    if dose.is_nan() || max_dose.is_nan() {
        f64::NAN
    } else {
        dose.min(max_dose)
    }
}

/// Whether a dose is due at `time`. A zero interval never doses after time 0.
pub fn is_dose_step(params: &RegimenParameters, time: u32) -> bool {
    if time == 0 {
        return true;
    }
    params.dose_interval != 0 && time % params.dose_interval == 0
}

/// Number of completed escalation intervals at `time`.
///
/// A zero escalation interval disables escalation (count 0). Plain float
/// arithmetic would instead give `floor(time / 0) = inf`, turning every
/// interval dose into `max_dose` for a positive increase and NaN for a zero
/// increase; the guard replaces that with an escalation-free schedule.
pub fn escalation_count(params: &RegimenParameters, time: u32) -> u32 {
    match params.dose_increase_intervals {
        0 => 0,
        interval => time / interval,
    }
}

/// Unclamped dose at an interval step
fn escalated_dose(params: &RegimenParameters, time: u32) -> f64 {
    params.initial_dose + params.dose_increase * f64::from(escalation_count(params, time))
}

/// Every dose given over `0..=time_span`, in time order
pub fn schedule(params: &RegimenParameters, policy: ClampPolicy) -> Vec<DoseEvent> {
    let mut events = vec![DoseEvent {
        time: 0,
        amount: dose_at_with(params, 0, policy),
        clamped: policy == ClampPolicy::AllDoses && params.initial_dose > params.max_dose,
    }];

    if params.dose_interval == 0 {
        return events;
    }

    let interval = params.dose_interval as usize;
    for time in (interval..=params.time_span as usize).step_by(interval) {
        let time = time as u32;
        let raw = escalated_dose(params, time);
        events.push(DoseEvent {
            time,
            amount: cap(raw, params.max_dose),
            clamped: raw > params.max_dose,
        });
    }

    tracing::debug!("Derived {} dose events", events.len());
    events
}
