//! Agronomic plausibility checks for soil samples.
//!
//! Every rule is evaluated independently and every triggered warning is returned,
//! in rule order. The validator never fails: an empty report means "no concerns".

use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::sample::{SoilParameter, SoilSample};

/// N, P or K strictly between zero and this value is implausibly low.
pub const LOW_NUTRIENT_THRESHOLD: f64 = 10.0;

/// Plausible average temperature for farming, °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 10.0..=45.0;

/// Plausible relative humidity, %.
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 20.0..=100.0;

/// Plausible soil pH.
pub const PH_RANGE: RangeInclusive<f64> = 3.5..=9.0;

/// Ordered list of human-readable warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn iter(&self) -> core::slice::Iter<'_, String> {
        self.warnings.iter()
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn push(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a String;
    type IntoIter = core::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.warnings.join("; "))
    }
}

/// Check six raw readings against the plausibility rules.
///
/// Zero N/P/K is exempt from the low-value rule: zero means the field was not
/// filled in, which the prediction gate reports separately.
pub fn validate(
    n: f64,
    p: f64,
    k: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (param, value) in [
        (SoilParameter::Nitrogen, n),
        (SoilParameter::Phosphorus, p),
        (SoilParameter::Potassium, k),
    ] {
        if value > 0.0 && value < LOW_NUTRIENT_THRESHOLD {
            report.push(format!("{param} value implausibly low"));
        }
    }

    for (param, value, range) in [
        (SoilParameter::Temperature, temperature, TEMPERATURE_RANGE),
        (SoilParameter::Humidity, humidity, HUMIDITY_RANGE),
        (SoilParameter::Ph, ph, PH_RANGE),
    ] {
        if let Some(warning) = out_of_range(param, value, &range) {
            report.push(warning);
        }
    }

    report
}

impl SoilSample {
    pub fn validate(&self) -> ValidationReport {
        validate(
            self.nitrogen(),
            self.phosphorus(),
            self.potassium(),
            self.temperature(),
            self.humidity(),
            self.ph(),
        )
    }
}

fn out_of_range(param: SoilParameter, value: f64, range: &RangeInclusive<f64>) -> Option<String> {
    // NaN is never contained, so it always warns.
    if range.contains(&value) {
        return None;
    }

    let (lo, hi) = (range.start(), range.end());
    let unit = param.unit();
    let warning = match param {
        SoilParameter::Temperature => format!(
            "temperature ({value}{unit}) is outside the plausible range for farming ({lo}-{hi}{unit})"
        ),
        SoilParameter::Ph => {
            format!("soil pH ({value}) is outside the plausible range ({lo}-{hi})")
        }
        _ => format!("{param} ({value}{unit}) is outside the plausible range ({lo}-{hi}{unit})"),
    };
    Some(warning)
}
