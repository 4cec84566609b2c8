//! Input validation, sanitisation and small formatting helpers.

use crate::error::{Result, SentiscopeError};

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Reject empty, whitespace-only and oversized input.
///
/// # Errors
///
/// Returns [`SentiscopeError::InvalidInput`] describing the first problem.
pub fn validate(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(SentiscopeError::InvalidInput(
            "text cannot be empty".to_owned(),
        ));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(SentiscopeError::InvalidInput(format!(
            "text exceeds maximum length of {MAX_MESSAGE_CHARS} characters"
        )));
    }
    if text.trim().is_empty() {
        return Err(SentiscopeError::InvalidInput(
            "text cannot be only whitespace".to_owned(),
        ));
    }
    Ok(())
}

/// Collapse runs of whitespace to single spaces and drop control characters.
pub fn sanitize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate then sanitise; the usual entry point for chat input.
///
/// # Errors
///
/// Same as [`validate`], plus an error when nothing is left after
/// sanitising.
pub fn clean_input(text: &str) -> Result<String> {
    validate(text)?;
    let cleaned = sanitize(text);
    if cleaned.is_empty() {
        return Err(SentiscopeError::InvalidInput(
            "text contains no printable characters".to_owned(),
        ));
    }
    Ok(cleaned)
}

/// Human-readable duration: seconds below a minute, minutes below an hour,
/// hours beyond.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1} seconds")
    } else if seconds < 3600.0 {
        format!("{:.1} minutes", seconds / 60.0)
    } else {
        format!("{:.1} hours", seconds / 3600.0)
    }
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}
