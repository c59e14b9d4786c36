//! The interactive prompt loop.

use std::io::{BufRead, Write};

use cropwise_ai::CropPredictor;
use cropwise_core::SoilSample;

use crate::{form, render};

pub const GREETING: &str =
    "Crop recommendation from soil conditions. Leave the first field empty to quit.";

/// Prompt, predict and render until end of input or an empty first field.
pub fn run<R, W>(predictor: &CropPredictor, mut input: R, mut output: W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{GREETING}")?;

    while let Some(values) = form::read_values(&mut input, &mut output)? {
        let view = match SoilSample::from_form(values) {
            Ok(sample) => render::render(&predictor.predict(&sample)),
            Err(e) => render::render_form_error(&e),
        };
        writeln!(output, "\n{view}")?;
    }

    output.flush()?;
    Ok(())
}
