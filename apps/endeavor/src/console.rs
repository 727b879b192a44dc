//! Plain stdin/stdout prompt helpers.
//!
//! Everything is generic over `BufRead`/`Write` so the interactive stages can be
//! driven from byte slices in tests.

use std::io::{self, BufRead, Write};

/// Reads one line, without the trailing newline. `Ok(None)` on EOF.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Prints `message` without a newline and flushes so the cursor waits after it.
pub fn prompt<W: Write>(output: &mut W, message: &str) -> io::Result<()> {
    write!(output, "{message}")?;
    output.flush()
}

/// Reads lines until the first blank (whitespace-only) line or EOF.
/// Lines are kept verbatim and joined with `\n`.
pub fn read_until_blank_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
