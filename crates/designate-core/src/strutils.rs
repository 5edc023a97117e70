//! String helpers.

use crate::error::ApiError;
use thiserror::Error;

const TRUE_STRINGS: &[&str] = &["1", "t", "true", "on", "y", "yes"];
const FALSE_STRINGS: &[&str] = &["0", "f", "false", "off", "n", "no"];

/// A string did not name a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized value '{value}', acceptable values are: '0', '1', 'f', 'false', 'n', 'no', 'off', 'on', 't', 'true', 'y', 'yes'")]
pub struct ParseBoolError {
    /// The rejected input.
    pub value: String,
}

impl From<ParseBoolError> for ApiError {
    fn from(err: ParseBoolError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

/// Parses a boolean strictly.
///
/// Accepts `true/false`, `1/0`, `yes/no`, `t/f`, `y/n` and `on/off`,
/// case-insensitively and ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`ParseBoolError`] for any other input, including the empty
/// string.
///
/// # Example
///
/// ```
/// use designate_core::bool_from_string;
///
/// assert_eq!(bool_from_string(" Yes "), Ok(true));
/// assert_eq!(bool_from_string("off"), Ok(false));
/// assert!(bool_from_string("maybe").is_err());
/// ```
pub fn bool_from_string(value: &str) -> Result<bool, ParseBoolError> {
    let normalized = value.trim().to_lowercase();
    if TRUE_STRINGS.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSE_STRINGS.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(ParseBoolError {
            value: value.to_string(),
        })
    }
}
