//! Payment card functions: Luhn checksum, brand detection, display
//! formatting and CVV rules.
//!
//! All functions operate on raw user input and tolerate the display
//! separators inserted by [`format_card_number`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Card brand detected from the number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CardBrand {
    /// Numbers starting with 4.
    Visa,
    /// Numbers starting with 51-55.
    Mastercard,
    /// Numbers starting with 34 or 37.
    Amex,
    /// Any other prefix.
    #[default]
    Unknown,
}

impl CardBrand {
    /// Detect the brand from the number prefix.
    ///
    /// Separators are stripped first, so formatted input detects the same
    /// brand as raw digits.
    #[must_use]
    pub fn detect(card_number: &str) -> Self {
        let digits = clean(card_number);

        match digits.as_bytes() {
            [b'4', ..] => Self::Visa,
            [b'5', b'1'..=b'5', ..] => Self::Mastercard,
            [b'3', b'4' | b'7', ..] => Self::Amex,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "Amex",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Strip display separators (spaces and hyphens).
fn clean(card_number: &str) -> String {
    card_number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

/// Validate a card number with the Luhn checksum.
///
/// Spaces and hyphens are stripped first; any other non-digit character makes
/// the number invalid, as does an empty input. Digits are walked right to
/// left, every second digit doubled (minus 9 when the doubling exceeds 9),
/// and the number is valid iff the sum is a multiple of 10.
///
/// ## Examples
///
/// ```
/// use pasarela_core::luhn_check;
///
/// assert!(luhn_check("4111 1111 1111 1111"));
/// assert!(!luhn_check("4111111111111112"));
/// ```
#[must_use]
pub fn luhn_check(card_number: &str) -> bool {
    let digits = clean(card_number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut sum = 0u32;
    for (i, b) in digits.bytes().rev().enumerate() {
        let mut digit = u32::from(b - b'0');
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}

/// Format a card number for display: groups of 4 digits separated by spaces.
///
/// Non-digits are stripped first, which makes the function idempotent:
/// formatting already-formatted input returns the same string.
///
/// ## Examples
///
/// ```
/// use pasarela_core::format_card_number;
///
/// assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("4111 1111 1111 1111"), "4111 1111 1111 1111");
/// ```
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

/// Required CVV length for a brand: 4 for Amex, 3 for everything else.
#[must_use]
pub const fn required_cvv_len(brand: CardBrand) -> usize {
    match brand {
        CardBrand::Amex => 4,
        _ => 3,
    }
}

/// Validate a CVV against the brand's required length.
///
/// Non-digit content is always invalid, regardless of length.
#[must_use]
pub fn validate_cvv(cvv: &str, brand: CardBrand) -> bool {
    cvv.len() == required_cvv_len(brand) && cvv.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_luhn_accepts_known_numbers() {
        assert!(luhn_check("4111111111111111"));
        assert!(luhn_check("5555555555554444"));
        assert!(luhn_check("378282246310005"));
    }

    #[test]
    fn test_luhn_rejects_off_by_one() {
        assert!(!luhn_check("4111111111111112"));
    }

    #[test]
    fn test_luhn_ignores_separators() {
        assert!(luhn_check("4111 1111 1111 1111"));
        assert!(luhn_check("4111-1111-1111-1111"));
    }

    #[test]
    fn test_luhn_rejects_garbage() {
        assert!(!luhn_check(""));
        assert!(!luhn_check("   "));
        assert!(!luhn_check("4111x1111111111"));
    }

    #[test]
    fn test_detect_brands() {
        assert_eq!(CardBrand::detect("4111111111111111"), CardBrand::Visa);
        assert_eq!(CardBrand::detect("5111111111111111"), CardBrand::Mastercard);
        assert_eq!(CardBrand::detect("5555555555554444"), CardBrand::Mastercard);
        assert_eq!(CardBrand::detect("341111111111111"), CardBrand::Amex);
        assert_eq!(CardBrand::detect("371111111111111"), CardBrand::Amex);
        assert_eq!(CardBrand::detect("6011000990139424"), CardBrand::Unknown);
        assert_eq!(CardBrand::detect("5611111111111111"), CardBrand::Unknown);
        assert_eq!(CardBrand::detect(""), CardBrand::Unknown);
    }

    #[test]
    fn test_detect_with_separators() {
        assert_eq!(CardBrand::detect("3782 822463 10005"), CardBrand::Amex);
    }

    #[test]
    fn test_format_groups_of_four() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("378282246310005"), "3782 8224 6310 005");
        assert_eq!(format_card_number("41"), "41");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_is_idempotent() {
        let once = format_card_number("4111111111111111");
        assert_eq!(format_card_number(&once), once);
    }

    #[test]
    fn test_cvv_length_by_brand() {
        assert!(validate_cvv("123", CardBrand::Visa));
        assert!(!validate_cvv("1234", CardBrand::Visa));
        assert!(validate_cvv("1234", CardBrand::Amex));
        assert!(!validate_cvv("123", CardBrand::Amex));
        assert!(validate_cvv("123", CardBrand::Unknown));
    }

    #[test]
    fn test_cvv_rejects_non_digits() {
        assert!(!validate_cvv("12a", CardBrand::Visa));
        assert!(!validate_cvv("", CardBrand::Visa));
        assert!(!validate_cvv("12 3", CardBrand::Amex));
    }
}
