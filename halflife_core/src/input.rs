//! Raw text input for a regimen.
//!
//! Real-valued fields follow loose numeric coercion: surrounding whitespace
//! is ignored, a blank field reads as 0 and anything unparseable becomes NaN,
//! which then flows through the whole series. Step counts cannot carry NaN,
//! so a malformed count is reported as an error instead.
//!
//! Accepted forms are decimal and exponent notation, `Infinity` with an
//! optional sign, and unsigned `0x`/`0o`/`0b` integer literals. Spellings
//! such as `inf`, `infinity` or `nan` are not numbers and read as NaN.

use crate::{Error, RegimenParameters, Result};
use serde::{Deserialize, Serialize};

/// The seven regimen fields as entered by a user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimenForm {
    pub half_life: String,
    pub initial_dose: String,
    pub dose_interval: String,
    pub dose_increase: String,
    pub dose_increase_intervals: String,
    pub max_dose: String,
    pub time_span: String,
}

impl Default for RegimenForm {
    fn default() -> Self {
        Self::from(&RegimenParameters::default())
    }
}

impl From<&RegimenParameters> for RegimenForm {
    fn from(params: &RegimenParameters) -> Self {
        Self {
            half_life: params.half_life.to_string(),
            initial_dose: params.initial_dose.to_string(),
            dose_interval: params.dose_interval.to_string(),
            dose_increase: params.dose_increase.to_string(),
            dose_increase_intervals: params.dose_increase_intervals.to_string(),
            max_dose: params.max_dose.to_string(),
            time_span: params.time_span.to_string(),
        }
    }
}

impl RegimenForm {
    /// Coerce every field into a fresh set of regimen parameters
    pub fn to_parameters(&self) -> Result<RegimenParameters> {
        let params = RegimenParameters {
            half_life: coerce_real(&self.half_life),
            initial_dose: coerce_real(&self.initial_dose),
            dose_interval: coerce_count("dose interval", &self.dose_interval)?,
            dose_increase: coerce_real(&self.dose_increase),
            dose_increase_intervals: coerce_count(
                "dose increase interval",
                &self.dose_increase_intervals,
            )?,
            max_dose: coerce_real(&self.max_dose),
            time_span: coerce_count("time span", &self.time_span)?,
        };
        tracing::debug!("Coerced regimen form into {:?}", params);
        Ok(params)
    }
}

/// Blank reads as 0, unparseable text as NaN
pub fn coerce_real(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // `f64::from_str` also takes inf/infinity/nan in any case
    if unsigned
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x1F`, `0o17`, `0b101`; `None` when there is no radix prefix
fn parse_radix_literal(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(f64::NAN);
    }

    Some(
        u128::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
    )
}

/// Blank reads as 0; the value must otherwise be a non-negative whole number
pub fn coerce_count(field: &'static str, raw: &str) -> Result<u32> {
    let value = coerce_real(raw);
    let whole = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
    if !whole || value > f64::from(u32::MAX) {
        return Err(Error::InvalidInput {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value as u32)
}
