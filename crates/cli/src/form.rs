//! Prompting for and parsing the six form fields.

use std::io::{BufRead, Write};

use anyhow::Context;
use thiserror::Error;

use cropwise_core::{FEATURE_COUNT, SoilParameter};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{label}: '{raw}' is not a number")]
    NotANumber { label: &'static str, raw: String },
}

/// Prompt text showing the field's name, unit and accepted bounds.
pub fn prompt(param: SoilParameter) -> String {
    let (min, max) = param.input_bounds();
    match param.unit() {
        "" => format!("{} [{min}-{max}]: ", param.label()),
        unit => format!("{} [{unit}, {min}-{max}]: ", param.label()),
    }
}

/// Parse one field. A blank entry is the form's default of zero.
pub fn parse_field(param: SoilParameter, raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| FieldError::NotANumber {
        label: param.label(),
        raw: raw.to_string(),
    })
}

/// Ask for every field in canonical order, re-prompting on unparsable entries.
///
/// Returns `None` at end of input or when the first field is left empty.
pub fn read_values<R, W>(input: &mut R, output: &mut W) -> anyhow::Result<Option<[f64; FEATURE_COUNT]>>
where
    R: BufRead,
    W: Write,
{
    let mut values = [0.0; FEATURE_COUNT];
    for param in SoilParameter::ALL {
        loop {
            write!(output, "{}", prompt(param))?;
            output.flush()?;

            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .with_context(|| format!("reading {}", param.key()))?;
            if read == 0 {
                return Ok(None);
            }
            if param.index() == 0 && line.trim().is_empty() {
                return Ok(None);
            }

            match parse_field(param, &line) {
                Ok(value) => {
                    values[param.index()] = value;
                    break;
                }
                Err(e) => writeln!(output, "{e}")?,
            }
        }
    }
    Ok(Some(values))
}
