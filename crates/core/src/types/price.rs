//! Type-safe EUR amount using decimal arithmetic.

use core::fmt;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in euros.
///
/// Backed by [`Decimal`], so arithmetic is exact - no floating point
/// rounding. Displayed the Spanish way: `"49,90 €"`.
///
/// ## Examples
///
/// ```
/// use pasarela_core::Price;
///
/// let subtotal = Price::from_cents(11_900);
/// let shipping = Price::from_cents(495);
/// assert_eq!(format!("{}", subtotal + shipping), "123,95 €");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero euros.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal euro amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The euro amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The given percentage of this price, rounded to cents.
    #[must_use]
    pub fn percentage(&self, percent: u8) -> Self {
        Self((self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED).round_dp(2))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0.round_dp(2).to_string();
        write!(f, "{} €", amount.replace('.', ","))
    }
}
