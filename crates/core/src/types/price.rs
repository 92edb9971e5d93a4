//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative amounts in the store currency (USD). They are
//! serialized as plain JSON numbers so persisted carts stay readable by the
//! browser build of the storefront, which stores `price` as a number.
//!
//! Amounts are limited to [`Price::MAX_SCALE`] decimal places. Together with
//! [`Price::MAX_AMOUNT`] that keeps every price within 15 significant digits,
//! which an `f64` carries exactly, so a saved cart loads back unchanged.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a number: {0}")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount exceeds the supported maximum.
    #[error("price must be at most {max}")]
    TooLarge {
        /// Maximum allowed amount.
        max: Decimal,
    },
    /// The amount has more decimal places than can be stored.
    #[error("price must have at most {max_scale} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max_scale: u32,
    },
}

/// A non-negative price in the store currency.
///
/// ## Examples
///
/// ```
/// use urban_vibe_core::Price;
///
/// let price = Price::parse("49.99").unwrap();
/// assert_eq!(price.times(2).to_string(), "$99.98");
///
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted amount. Keeps line totals far away from `Decimal` overflow.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    /// Largest accepted number of decimal places.
    pub const MAX_SCALE: u32 = 6;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, above [`Self::MAX_AMOUNT`],
    /// or has more than [`Self::MAX_SCALE`] decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge {
                max: Self::MAX_AMOUNT,
            });
        }
        let amount = amount.normalize();
        if amount.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max_scale: Self::MAX_SCALE,
            });
        }
        Ok(Self(amount))
    }

    /// Parse a price from user input such as `"49.99"` or `" 20 "`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, negative, too large,
    /// or too precise.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        // Digit separators are not part of a JavaScript number literal
        if trimmed.contains('_') {
            return Err(PriceError::NotANumber(trimmed.to_owned()));
        }
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// Returns the exact decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// The amount rounded to cents, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        cents.rescale(2);
        cents
    }

    /// This price rounded to cents.
    #[must_use]
    pub fn to_cents(self) -> Self {
        Self(self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.rounded())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

/// Stored floats may carry binary artefacts such as `0.30000000000000004`;
/// they are rounded to [`Price::MAX_SCALE`] places before validation.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount: Decimal = rust_decimal::serde::float::deserialize(deserializer)?;
        let amount = amount
            .round_dp_with_strategy(Self::MAX_SCALE, RoundingStrategy::MidpointAwayFromZero);
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
