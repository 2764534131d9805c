use thiserror::Error;
use url::Url;

/// Why a URL was refused before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid URL")]
    Empty,

    #[error("Please enter a valid URL (e.g., https://example.com)")]
    Malformed,
}

/// Trim `raw` and check that it parses as an absolute URL.
///
/// Returns the trimmed input unchanged; the backend receives what the user typed.
pub fn validate_url(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    Url::parse(trimmed).map_err(|_| ValidationError::Malformed)?;
    Ok(trimmed)
}
