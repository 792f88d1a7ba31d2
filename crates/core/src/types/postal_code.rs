//! Spanish postal code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input string is empty.
    #[error("postal code cannot be empty")]
    Empty,
    /// The input is not exactly 5 ASCII digits.
    #[error("postal code must be exactly 5 digits")]
    InvalidFormat,
}

/// A Spanish postal code: exactly 5 ASCII digits.
///
/// Parsing only checks the shape; whether the code exists is decided by the
/// asynchronous postal lookup service.
///
/// ## Examples
///
/// ```
/// use pasarela_core::PostalCode;
///
/// assert!(PostalCode::parse("28001").is_ok());
/// assert!(PostalCode::parse("2800").is_err());
/// assert!(PostalCode::parse("28O01").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not exactly 5 digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if s.is_empty() {
            return Err(PostalCodeError::Empty);
        }
        if s.len() != 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PostalCode::parse("28001").is_ok());
        assert!(PostalCode::parse("08001").is_ok());
        assert!(PostalCode::parse("99999").is_ok()); // shape only, existence is async
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PostalCode::parse(""), Err(PostalCodeError::Empty));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(PostalCode::parse("2800"), Err(PostalCodeError::InvalidFormat));
        assert_eq!(PostalCode::parse("280011"), Err(PostalCodeError::InvalidFormat));
        assert_eq!(PostalCode::parse("28O01"), Err(PostalCodeError::InvalidFormat));
        assert_eq!(PostalCode::parse("28 01"), Err(PostalCodeError::InvalidFormat));
    }

    #[test]
    fn test_display() {
        let code = PostalCode::parse("08001").unwrap();
        assert_eq!(format!("{code}"), "08001");
    }
}
