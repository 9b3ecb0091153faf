use std::io::{self, BufRead, Write};

use crate::error::{NoteError, Result};

/// Read all input from stdin (for piped input)
pub fn read_stdin() -> io::Result<String> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    Ok(lines.join("\n").trim().to_string())
}

/// Check if stdin is a TTY (interactive)
pub fn is_stdin_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask for a single line on stderr and read the answer from stdin.
pub fn prompt(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

/// Use the given value, or prompt for it when stdin is interactive.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if is_stdin_tty() => prompt(label),
        None => Err(NoteError::Validation(format!(
            "{} is required",
            label.to_lowercase()
        ))),
    }
}

/// Reject empty or whitespace-only credentials before any request is made.
pub fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NoteError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
