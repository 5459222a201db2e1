//! Core domain types for the half-life simulator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Regimen parameters (half-life and dosing schedule)
//! - Samples and the series they form
//! - Dose schedule entries and series summaries

use serde::{Deserialize, Serialize};

// ============================================================================
// Regimen Types
// ============================================================================

/// Full description of a dosing regimen.
///
/// Constructed fresh for every computation and never mutated; changing any
/// field means recomputing the whole series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegimenParameters {
    /// Time units for the quantity to decay by half
    pub half_life: f64,
    /// Dose administered at time 0
    pub initial_dose: f64,
    /// Time units between doses (doses at 0 and every multiple)
    pub dose_interval: u32,
    /// Amount added to the dose per elapsed escalation interval
    pub dose_increase: f64,
    /// Time units per escalation step
    pub dose_increase_intervals: u32,
    /// Upper bound on any escalated dose
    pub max_dose: f64,
    /// Final time index to simulate (inclusive)
    pub time_span: u32,
}

impl Default for RegimenParameters {
    fn default() -> Self {
        Self {
            half_life: 5.0,
            initial_dose: 2.5,
            dose_interval: 7,
            dose_increase: 2.5,
            dose_increase_intervals: 28,
            max_dose: 15.0,
            time_span: 168,
        }
    }
}

/// Whether the time-0 dose is subject to the `max_dose` clamp.
///
/// Only escalated doses are clamped by default, which means an
/// `initial_dose` above `max_dose` is administered as-is at time 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Clamp only doses given at interval steps after time 0
    #[default]
    EscalatedOnly,
    /// Clamp every dose, including the initial one
    AllDoses,
}

// ============================================================================
// Series Types
// ============================================================================

/// Quantity present at a single whole time step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: u32,
    pub quantity: f64,
}

/// Ordered samples for times `0..=time_span`, one per step, no gaps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Sample>);

impl Series {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Samples are only ever appended in increasing time order
    pub(crate) fn push(&mut self, sample: Sample) {
        debug_assert_eq!(sample.time as usize, self.0.len());
        self.0.push(sample);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    /// Sample at a given time index (index and time coincide)
    pub fn get(&self, time: u32) -> Option<&Sample> {
        self.0.get(time as usize)
    }

    pub fn last(&self) -> Option<&Sample> {
        self.0.last()
    }

    pub fn quantities(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|s| s.quantity)
    }

    pub fn into_inner(self) -> Vec<Sample> {
        self.0
    }
}

impl IntoIterator for Series {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Schedule and Summary Types
// ============================================================================

/// A single administered dose
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub time: u32,
    pub amount: f64,
    /// The raw escalated dose exceeded `max_dose` and was cut down
    pub clamped: bool,
}

/// Headline figures for a simulated series
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub samples: usize,
    pub doses: usize,
    pub total_administered: f64,
    pub peak: Sample,
    /// Lowest quantity after time 0 (time 0 only for a single-sample series)
    pub trough: Sample,
    pub final_quantity: f64,
}
