//! Spanish phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not exactly 9 digits.
    #[error("phone number must be exactly 9 digits")]
    WrongLength,
    /// The input contains a non-digit character.
    #[error("phone number must contain only digits")]
    NonDigit,
    /// The leading digit is not 6, 7 or 9.
    #[error("phone number must start with 6, 7 or 9")]
    InvalidPrefix,
}

/// A Spanish phone number: exactly 9 digits starting with 6, 7 or 9.
///
/// ## Examples
///
/// ```
/// use pasarela_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("612345678").is_ok());
/// assert!(PhoneNumber::parse("912345678").is_ok());
///
/// assert!(PhoneNumber::parse("512345678").is_err()); // bad prefix
/// assert!(PhoneNumber::parse("61234567").is_err());  // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, has the wrong length,
    /// contains non-digits, or starts with anything but 6, 7 or 9.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneNumberError::NonDigit);
        }
        if s.len() != 9 {
            return Err(PhoneNumberError::WrongLength);
        }
        if !matches!(s.bytes().next(), Some(b'6' | b'7' | b'9')) {
            return Err(PhoneNumberError::InvalidPrefix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
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
        assert!(PhoneNumber::parse("612345678").is_ok());
        assert!(PhoneNumber::parse("712345678").is_ok());
        assert!(PhoneNumber::parse("912345678").is_ok());
    }

    #[test]
    fn test_parse_rejects_landline_prefix_8() {
        assert_eq!(
            PhoneNumber::parse("812345678"),
            Err(PhoneNumberError::InvalidPrefix)
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneNumberError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(PhoneNumber::parse("61234567"), Err(PhoneNumberError::WrongLength));
        assert_eq!(PhoneNumber::parse("6123456789"), Err(PhoneNumberError::WrongLength));
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(PhoneNumber::parse("6123a5678"), Err(PhoneNumberError::NonDigit));
        assert_eq!(PhoneNumber::parse("612 345 678"), Err(PhoneNumberError::NonDigit));
    }

    #[test]
    fn test_display() {
        let phone = PhoneNumber::parse("612345678").unwrap();
        assert_eq!(format!("{phone}"), "612345678");
    }
}
