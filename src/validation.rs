// Task text validation

use thiserror::Error;

/// Maximum task text length, in characters, after trimming
pub const MAX_TEXT_LEN: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Todo text cannot be empty")]
    Empty,

    #[error("Todo text must be {max} characters or less")]
    TooLong { len: usize, max: usize },
}

/// Validate task text, returning the trimmed text on success
///
/// Trimming happens first; both the emptiness and the length rule apply to
/// the trimmed text. Length counts Unicode scalar values, not bytes.
pub fn validate_text(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = trimmed.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }

    Ok(trimmed)
}
