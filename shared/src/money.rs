//! Money primitives
//!
//! Monetary amounts are stored as integer minor units (pesewas, cents)
//! tagged with a currency. All arithmetic that needs fractions goes through
//! `rust_decimal` and is rounded half-up to 2 decimal places exactly once,
//! at the boundary back into `Money`. Binary floats never participate in
//! arithmetic; external float inputs are converted through `Decimal` first.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Minor units per major unit (all supported currencies are 2-decimal)
const MINOR_PER_MAJOR: i64 = 100;

/// Supported settlement currencies
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    /// Ghanaian cedi (minor unit: pesewa)
    #[default]
    Ghs,
    /// Nigerian naira (minor unit: kobo)
    Ngn,
    /// US dollar (minor unit: cent)
    Usd,
}

impl Currency {
    /// ISO 4217 code
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Ghs => "GHS",
            Currency::Ngn => "NGN",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Money errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Arithmetic across currencies is a programming error
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },
}

/// A monetary amount in integer minor units plus its currency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Create from minor units (pesewas/cents)
    #[inline]
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Create from whole major units
    #[inline]
    pub const fn from_major(major: i64, currency: Currency) -> Self {
        Self {
            minor: major * MINOR_PER_MAJOR,
            currency,
        }
    }

    /// Zero in the given currency
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Create from a decimal amount in major units, rounding half-up to
    /// 2 decimal places
    pub fn from_decimal(value: Decimal, currency: Currency) -> Self {
        let rounded =
            value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        let minor = (rounded * Decimal::ONE_HUNDRED).to_i64().unwrap_or_default();
        Self { minor, currency }
    }

    /// Create from an external float input (client JSON, CMS fields)
    ///
    /// The value is lifted into `Decimal` and rounded half-up to 2 decimal
    /// places before conversion; no float arithmetic happens afterwards.
    pub fn from_f64(value: f64, currency: Currency) -> Self {
        Self::from_decimal(Decimal::from_f64(value).unwrap_or_default(), currency)
    }

    /// Amount in minor units
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.minor
    }

    /// Currency of this amount
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Amount as a `Decimal` in major units, for intermediate calculation
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor, DECIMAL_PLACES)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.minor > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Smaller of two same-currency amounts
    pub fn min(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        if self.minor <= other.minor { self } else { other }
    }

    /// Larger of two same-currency amounts
    pub fn max(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        if self.minor >= other.minor { self } else { other }
    }

    /// Clamp a would-be-negative amount up to zero
    pub fn clamp_non_negative(self) -> Self {
        if self.minor < 0 {
            Self::zero(self.currency)
        } else {
            self
        }
    }

    fn assert_same_currency(&self, other: &Self) {
        assert_eq!(
            self.currency, other.currency,
            "currency mismatch: {} vs {}",
            self.currency, other.currency
        );
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        write!(
            f,
            "{} {}{}.{:02}",
            self.currency,
            sign,
            (self.minor / MINOR_PER_MAJOR).abs(),
            (self.minor % MINOR_PER_MAJOR).abs()
        )
    }
}

/// Addition of two same-currency amounts; mismatched currency panics
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        Self {
            minor: self.minor + other.minor,
            currency: self.currency,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Subtraction of two same-currency amounts; mismatched currency panics
impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        Self {
            minor: self.minor - other.minor,
            currency: self.currency,
        }
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Ordering is only defined within a currency
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.currency == other.currency {
            Some(self.minor.cmp(&other.minor))
        } else {
            None
        }
    }
}
