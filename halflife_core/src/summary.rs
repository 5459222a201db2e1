//! Headline figures for a simulated series.

use crate::dose::schedule;
use crate::{ClampPolicy, RegimenParameters, Sample, Series, SeriesSummary};

/// Summarize a series produced from `params` under `policy`
///
/// Peak and trough skip NaN quantities. The trough only looks after time 0,
/// where the first dose has already landed; for a single-sample series, or
/// one with no usable quantities, both fall back to the first sample.
pub fn summarize(
    series: &Series,
    params: &RegimenParameters,
    policy: ClampPolicy,
) -> SeriesSummary {
    let first = series.get(0).copied().unwrap_or(Sample {
        time: 0,
        quantity: f64::NAN,
    });

    let usable = || series.iter().filter(|s| !s.quantity.is_nan());

    let peak = usable()
        .copied()
        .reduce(|best, s| if s.quantity > best.quantity { s } else { best })
        .unwrap_or(first);

    let trough = usable()
        .filter(|s| s.time > 0)
        .copied()
        .reduce(|best, s| if s.quantity < best.quantity { s } else { best })
        .unwrap_or(first);

    let events = schedule(params, policy);
    let total_administered = events.iter().map(|e| e.amount).sum();

    SeriesSummary {
        samples: series.len(),
        doses: events.len(),
        total_administered,
        peak,
        trough,
        final_quantity: series.last().map_or(f64::NAN, |s| s.quantity),
    }
}
