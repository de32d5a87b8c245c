//! Non-negative monetary amounts and their display formatting.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits shown for every displayed amount.
pub const DISPLAY_SCALE: u32 = 2;

/// Currency symbol prefixed to displayed amounts.
pub const CURRENCY_SYMBOL: &str = "$";

/// Validation errors returned by [`Money::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyValidationError {
    /// The amount is below zero.
    Negative {
        /// Rejected amount.
        value: Decimal,
    },
}

impl fmt::Display for MoneyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { value } => {
                write!(f, "monetary amount must be non-negative (got {value})")
            }
        }
    }
}

impl std::error::Error for MoneyValidationError {}

/// A non-negative amount held at full decimal precision.
///
/// Rounding only happens when the amount is displayed: [`Money::rounded`]
/// applies round-half-away-from-zero at [`DISPLAY_SCALE`] digits, so `0.125`
/// displays as `$0.13`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use storefront::domain::Money;
///
/// let price = Money::new(Decimal::new(8500, 2)).expect("non-negative");
/// assert_eq!(price.to_string(), "$85.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate and wrap a decimal amount.
    pub fn new(value: Decimal) -> Result<Self, MoneyValidationError> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(MoneyValidationError::Negative { value });
        }
        Ok(Self(value))
    }

    /// Wrap a decimal amount, flooring negative values at zero.
    #[must_use]
    pub fn floored(value: Decimal) -> Self {
        Self(value.max(Decimal::ZERO))
    }

    /// Full-precision amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Amount rounded to the display scale.
    #[must_use]
    pub fn rounded(self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.rounded())
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
