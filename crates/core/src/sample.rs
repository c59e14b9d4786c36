//! Soil sample value object and per-parameter form metadata.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of model input features carried by a [`SoilSample`].
pub const FEATURE_COUNT: usize = 6;

/// One of the six soil/climate inputs, in canonical feature order.
///
/// The order of [`SoilParameter::ALL`] is the column order the classifier was
/// trained on; [`SoilSample::features`] follows it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilParameter {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
}

impl SoilParameter {
    pub const ALL: [SoilParameter; FEATURE_COUNT] = [
        SoilParameter::Nitrogen,
        SoilParameter::Phosphorus,
        SoilParameter::Potassium,
        SoilParameter::Temperature,
        SoilParameter::Humidity,
        SoilParameter::Ph,
    ];

    /// Column index in the feature vector.
    pub fn index(self) -> usize {
        match self {
            SoilParameter::Nitrogen => 0,
            SoilParameter::Phosphorus => 1,
            SoilParameter::Potassium => 2,
            SoilParameter::Temperature => 3,
            SoilParameter::Humidity => 4,
            SoilParameter::Ph => 5,
        }
    }

    /// Lowercase key used in warnings and serialized samples.
    pub fn key(self) -> &'static str {
        match self {
            SoilParameter::Nitrogen => "nitrogen",
            SoilParameter::Phosphorus => "phosphorus",
            SoilParameter::Potassium => "potassium",
            SoilParameter::Temperature => "temperature",
            SoilParameter::Humidity => "humidity",
            SoilParameter::Ph => "ph",
        }
    }

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            SoilParameter::Nitrogen => "Nitrogen (N)",
            SoilParameter::Phosphorus => "Phosphorus (P)",
            SoilParameter::Potassium => "Potassium (K)",
            SoilParameter::Temperature => "Temperature",
            SoilParameter::Humidity => "Humidity",
            SoilParameter::Ph => "Soil pH",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SoilParameter::Nitrogen | SoilParameter::Phosphorus | SoilParameter::Potassium => {
                "kg/ha"
            }
            SoilParameter::Temperature => "°C",
            SoilParameter::Humidity => "%",
            SoilParameter::Ph => "",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            SoilParameter::Nitrogen => "Nitrogen content of the soil (kg/ha)",
            SoilParameter::Phosphorus => "Phosphorus content of the soil (kg/ha)",
            SoilParameter::Potassium => "Potassium content of the soil (kg/ha)",
            SoilParameter::Temperature => "Average ambient temperature in Celsius",
            SoilParameter::Humidity => "Relative air humidity in percent",
            SoilParameter::Ph => "Soil acidity",
        }
    }

    /// Bounds the input form accepts (inclusive).
    ///
    /// These are data-entry limits, much wider than the plausibility ranges
    /// applied by [`crate::validate`].
    pub fn input_bounds(self) -> (f64, f64) {
        match self {
            SoilParameter::Nitrogen => (0.0, 500.0),
            SoilParameter::Phosphorus => (0.0, 200.0),
            SoilParameter::Potassium => (0.0, 400.0),
            SoilParameter::Temperature => (0.0, 50.0),
            SoilParameter::Humidity => (0.0, 100.0),
            SoilParameter::Ph => (0.0, 14.0),
        }
    }

    /// N, P and K: the quantities where zero means "not filled in".
    pub fn is_macronutrient(self) -> bool {
        matches!(
            self,
            SoilParameter::Nitrogen | SoilParameter::Phosphorus | SoilParameter::Potassium
        )
    }
}

impl core::fmt::Display for SoilParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Six soil/climate readings submitted for one prediction.
///
/// Immutable once built. [`SoilSample::new`] accepts any values so the validator can
/// judge them; [`SoilSample::from_form`] enforces the form's declared bounds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
}

impl ValueObject for SoilSample {}

impl SoilSample {
    pub fn new(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        temperature: f64,
        humidity: f64,
        ph: f64,
    ) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
        }
    }

    /// Build a sample from raw form values in canonical order.
    ///
    /// Rejects non-finite values and values outside [`SoilParameter::input_bounds`].
    pub fn from_form(values: [f64; FEATURE_COUNT]) -> DomainResult<Self> {
        for param in SoilParameter::ALL {
            let value = values[param.index()];
            if !value.is_finite() {
                return Err(DomainError::validation(format!(
                    "{} must be a finite number",
                    param.key()
                )));
            }
            let (min, max) = param.input_bounds();
            if value < min || value > max {
                return Err(DomainError::OutOfBounds {
                    parameter: param.key(),
                    value,
                    min,
                    max,
                });
            }
        }

        let [n, p, k, temperature, humidity, ph] = values;
        Ok(Self::new(n, p, k, temperature, humidity, ph))
    }

    pub fn nitrogen(&self) -> f64 {
        self.nitrogen
    }

    pub fn phosphorus(&self) -> f64 {
        self.phosphorus
    }

    pub fn potassium(&self) -> f64 {
        self.potassium
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn get(&self, param: SoilParameter) -> f64 {
        self.features()[param.index()]
    }

    /// Feature vector in the order the classifier expects.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
        ]
    }

    /// Macronutrients left at exactly zero, in canonical order.
    pub fn missing_macronutrients(&self) -> Vec<SoilParameter> {
        SoilParameter::ALL
            .into_iter()
            .filter(|p| p.is_macronutrient() && self.get(*p) == 0.0)
            .collect()
    }

    pub fn is_incomplete(&self) -> bool {
        !self.missing_macronutrients().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_follow_canonical_parameter_order() {
        let sample = SoilSample::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5);
        let features = sample.features();

        for param in SoilParameter::ALL {
            assert_eq!(features[param.index()], sample.get(param));
        }
        assert_eq!(features, [90.0, 42.0, 43.0, 20.8, 82.0, 6.5]);
    }

    #[test]
    fn from_form_accepts_values_on_declared_bounds() {
        let sample = SoilSample::from_form([500.0, 200.0, 400.0, 50.0, 100.0, 14.0]).unwrap();
        assert_eq!(sample.potassium(), 400.0);

        let zeros = SoilSample::from_form([0.0; FEATURE_COUNT]).unwrap();
        assert!(zeros.is_incomplete());
    }

    #[test]
    fn from_form_rejects_values_outside_declared_bounds() {
        let err = SoilSample::from_form([90.0, 201.0, 43.0, 25.0, 80.0, 6.5]).unwrap_err();
        match err {
            DomainError::OutOfBounds {
                parameter, max, ..
            } => {
                assert_eq!(parameter, "phosphorus");
                assert_eq!(max, 200.0);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }

        assert!(SoilSample::from_form([90.0, 42.0, 43.0, -0.5, 80.0, 6.5]).is_err());
    }

    #[test]
    fn from_form_rejects_non_finite_values() {
        let err = SoilSample::from_form([90.0, 42.0, 43.0, 25.0, f64::NAN, 6.5]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("humidity")));
    }

    #[test]
    fn missing_macronutrients_lists_only_zero_npk() {
        let sample = SoilSample::new(0.0, 42.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            sample.missing_macronutrients(),
            vec![SoilParameter::Nitrogen, SoilParameter::Potassium]
        );

        let complete = SoilSample::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0);
        assert!(!complete.is_incomplete());
    }

    #[test]
    fn sample_serializes_with_named_fields() {
        let sample = SoilSample::new(90.0, 42.0, 43.0, 25.0, 80.0, 6.5);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["nitrogen"], 90.0);
        assert_eq!(json["ph"], 6.5);

        let back: SoilSample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }
}
