//! Exact monetary amounts.
//!
//! Balances, prices and deposits are decimal amounts with at most two
//! fractional digits. Arithmetic is checked; there is no floating point.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of fractional digits an amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a balance or price column holds (`NUMERIC(12, 2)`).
pub const MAX_STORED_AMOUNT: Decimal =
    Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// Validation errors raised when constructing [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyValidationError {
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount must have at most {MONEY_SCALE} fractional digits")]
    TooPrecise,
}

/// A non-negative monetary amount.
///
/// # Examples
/// ```
/// use marketplace::domain::Money;
/// use rust_decimal::Decimal;
///
/// let balance = Money::new(Decimal::new(10_000, 2)).expect("valid amount");
/// let price = Money::new(Decimal::new(8_000, 2)).expect("valid amount");
/// let left = balance.checked_sub(price).expect("enough balance");
/// assert_eq!(left.amount(), Decimal::new(2_000, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate a non-negative amount.
    pub fn new(amount: Decimal) -> Result<Self, MoneyValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyValidationError::Negative);
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(MoneyValidationError::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// Validate a strictly positive amount, as required for prices and
    /// deposits.
    pub fn positive(amount: Decimal) -> Result<Self, MoneyValidationError> {
        let money = Self::new(amount)?;
        if money.is_zero() {
            return Err(MoneyValidationError::NotPositive);
        }
        Ok(money)
    }

    /// Build an amount from whole minor units (cents).
    pub fn from_minor_units(cents: i64) -> Result<Self, MoneyValidationError> {
        Self::new(Decimal::new(cents, MONEY_SCALE))
    }

    /// The underlying decimal value.
    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract `other`, returning `None` when the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other.0 > self.0 {
            return None;
        }
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply by a whole factor, returning `None` on overflow.
    pub fn checked_scale(self, factor: u32) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(factor))
    }

    /// The given percentage of this amount, rounded to cents.
    ///
    /// Saturates at the largest representable amount.
    pub fn percentage(self, percent: u32) -> Self {
        let ratio = Decimal::new(i64::from(percent), 2);
        let scaled = self.0.checked_mul(ratio).unwrap_or(Decimal::MAX);
        Self(scaled.round_dp(MONEY_SCALE))
    }

    /// Whether the amount fits the storage columns.
    pub fn fits_storage(self) -> bool {
        self.0 <= MAX_STORED_AMOUNT
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
