//! Spanish tax identifier (NIF/NIE) with control-letter validation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Official control letter table. The letter for a number is
/// `CONTROL_LETTERS[number % 23]`.
const CONTROL_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    /// The input string is empty.
    #[error("tax identifier cannot be empty")]
    Empty,
    /// The input matches neither the NIF nor the NIE shape.
    #[error("tax identifier must be 8 digits + letter, or X/Y/Z + 7 digits + letter")]
    InvalidFormat,
    /// The control letter does not match the checksum of the numeric body.
    #[error("control letter mismatch (expected {expected})")]
    ControlLetterMismatch {
        /// The letter the checksum requires.
        expected: char,
    },
}

/// A Spanish tax identifier.
///
/// Two shapes are accepted:
///
/// - **NIF**: 8 digits followed by a control letter
///   (`letter == CONTROL_LETTERS[number % 23]`)
/// - **NIE**: a leading `X`, `Y` or `Z` remapped to the digit `0`, `1` or `2`,
///   followed by 7 digits and a control letter validated with the same table
///
/// Input is upper-cased before validation, so `12345678z` and `12345678Z`
/// parse to the same identifier.
///
/// ## Examples
///
/// ```
/// use pasarela_core::TaxId;
///
/// assert!(TaxId::parse("12345678Z").is_ok());
/// assert!(TaxId::parse("X1234567L").is_ok());
///
/// assert!(TaxId::parse("12345678A").is_err()); // wrong control letter
/// assert!(TaxId::parse("1234567Z").is_err());  // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a `TaxId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, matches neither accepted
    /// shape, or carries the wrong control letter.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        if s.is_empty() {
            return Err(TaxIdError::Empty);
        }

        let normalized = s.trim().to_uppercase();
        let bytes = normalized.as_bytes();

        if bytes.len() != 9 {
            return Err(TaxIdError::InvalidFormat);
        }

        let (digits, letter) = match bytes {
            [first @ (b'X' | b'Y' | b'Z'), rest @ .., letter] => {
                // NIE: the leading letter stands in for a digit 0/1/2.
                let mut digits = Vec::with_capacity(8);
                digits.push(first - b'X' + b'0');
                digits.extend_from_slice(rest);
                (digits, *letter)
            }
            [rest @ .., letter] => (rest.to_vec(), *letter),
            [] => return Err(TaxIdError::InvalidFormat),
        };

        if digits.len() != 8 || !digits.iter().all(u8::is_ascii_digit) {
            return Err(TaxIdError::InvalidFormat);
        }
        if !letter.is_ascii_uppercase() {
            return Err(TaxIdError::InvalidFormat);
        }

        let number: u32 = digits
            .iter()
            .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'));
        let expected = control_letter(number);

        if char::from(letter) != expected {
            return Err(TaxIdError::ControlLetterMismatch { expected });
        }

        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice (upper-cased).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TaxId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Control letter for an 8-digit identifier number.
fn control_letter(number: u32) -> char {
    #[allow(clippy::indexing_slicing)] // index is number % 23, always < 23
    char::from(CONTROL_LETTERS[(number % 23) as usize])
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
