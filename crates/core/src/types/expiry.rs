//! Card expiry date in `MM/YY` format.

use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Errors that can occur when parsing an [`ExpiryDate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryDateError {
    /// The input string is empty.
    #[error("expiry date cannot be empty")]
    Empty,
    /// The input does not have the `MM/YY` shape.
    #[error("expiry date must have the shape MM/YY")]
    InvalidFormat,
    /// The month is outside 1-12.
    #[error("expiry month must be between 01 and 12")]
    MonthOutOfRange,
}

/// A card expiry date parsed from `MM/YY`.
///
/// The two-digit year is interpreted as `20YY`. Whether the card is expired
/// is a property of an instant, not of the parse: [`ExpiryDate::is_valid_at`]
/// requires the first-of-month moment of the encoded year/month to be
/// strictly after the given instant, so a card is already invalid during its
/// printed expiry month.
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pasarela_core::ExpiryDate;
///
/// let expiry = ExpiryDate::parse("12/30").unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
/// assert!(expiry.is_valid_at(now));
///
/// // A card in its expiry month is no longer valid.
/// let expiring = ExpiryDate::parse("06/26").unwrap();
/// assert!(!expiring.is_valid_at(now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryDate {
    month: u32,
    year: i32,
}

impl ExpiryDate {
    /// Parse an `ExpiryDate` from an `MM/YY` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not `MM/YY`-shaped, or has a
    /// month outside 1-12.
    pub fn parse(s: &str) -> Result<Self, ExpiryDateError> {
        if s.is_empty() {
            return Err(ExpiryDateError::Empty);
        }

        let Some((month_part, year_part)) = s.split_once('/') else {
            return Err(ExpiryDateError::InvalidFormat);
        };
        if month_part.len() != 2
            || year_part.len() != 2
            || !month_part.bytes().all(|b| b.is_ascii_digit())
            || !year_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ExpiryDateError::InvalidFormat);
        }

        let month: u32 = month_part
            .parse()
            .map_err(|_| ExpiryDateError::InvalidFormat)?;
        let yy: i32 = year_part
            .parse()
            .map_err(|_| ExpiryDateError::InvalidFormat)?;

        if !(1..=12).contains(&month) {
            return Err(ExpiryDateError::MonthOutOfRange);
        }

        Ok(Self {
            month,
            year: 2000 + yy,
        })
    }

    /// The expiry month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The full expiry year (`20YY`).
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Whether the card is still valid at the given instant.
    ///
    /// True iff the first-of-month moment of the encoded year/month is
    /// strictly after `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .is_some_and(|first_of_month| first_of_month > now)
    }

    /// Whether the card is still valid right now.
    #[must_use]
    pub fn is_valid_now(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

impl std::str::FromStr for ExpiryDate {
    type Err = ExpiryDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
