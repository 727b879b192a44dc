//! Reads the CV from the terminal.

use std::io::{BufRead, Write};

use crate::console::{prompt, read_until_blank_line};
use crate::errors::AppError;

/// Prompts for the CV and reads it up to the first blank line or EOF.
///
/// An empty CV is a validation error.
pub fn read_cv<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String, AppError> {
    prompt(
        output,
        "Please paste your CV text below. Press Enter on an empty line when you are done.\n\n",
    )?;
    let cv = read_until_blank_line(input)?;
    if cv.trim().is_empty() {
        return Err(AppError::Validation("CV text cannot be empty".to_string()));
    }
    Ok(cv)
}
