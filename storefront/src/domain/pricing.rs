//! Discount arithmetic and the price presentation rule.
//!
//! A product carries a percentage discount and a flat discount that combine:
//!
//! ```text
//! discounted = price - price * percent / 100 - amount
//! ```
//!
//! The result floors at zero when the flat amount exceeds what is left after
//! the percentage discount. Presentation shows the discounted price with the
//! original struck through whenever either discount is non-zero.

use std::fmt;

use rust_decimal::Decimal;

use super::Money;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Validation errors returned by [`Discount::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountValidationError {
    /// Percentage lies outside `[0, 100]`.
    PercentOutOfRange {
        /// Rejected percentage.
        percent: Decimal,
    },
    /// Flat discount is negative.
    NegativeAmount {
        /// Rejected amount.
        amount: Decimal,
    },
}

impl fmt::Display for DiscountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentOutOfRange { percent } => {
                write!(f, "discount percent must be within [0, 100] (got {percent})")
            }
            Self::NegativeAmount { amount } => {
                write!(f, "discount amount must be non-negative (got {amount})")
            }
        }
    }
}

impl std::error::Error for DiscountValidationError {}

/// Percentage and flat discount applied to a base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    percent: Decimal,
    amount: Money,
}

impl Discount {
    /// No discount at all.
    pub const NONE: Self = Self {
        percent: Decimal::ZERO,
        amount: Money::ZERO,
    };

    /// Validate a percentage in `[0, 100]` and a non-negative flat amount.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use storefront::domain::Discount;
    ///
    /// let discount = Discount::new(Decimal::new(10, 0), Decimal::new(5, 0)).expect("valid");
    /// assert!(discount.is_active());
    /// assert!(Discount::new(Decimal::new(150, 0), Decimal::ZERO).is_err());
    /// ```
    pub fn new(percent: Decimal, amount: Decimal) -> Result<Self, DiscountValidationError> {
        if percent < Decimal::ZERO || percent > ONE_HUNDRED {
            return Err(DiscountValidationError::PercentOutOfRange { percent });
        }
        let flat = Money::new(amount)
            .map_err(|_| DiscountValidationError::NegativeAmount { amount })?;
        Ok(Self {
            percent,
            amount: flat,
        })
    }

    /// Percentage discount in `[0, 100]`.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.percent
    }

    /// Flat discount subtracted after the percentage.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Whether either discount component is non-zero.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.percent > Decimal::ZERO || self.amount.is_positive()
    }

    /// Apply the discount to `price`.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use storefront::domain::{Discount, Money};
    ///
    /// let price = Money::new(Decimal::new(100, 0)).expect("valid price");
    /// let discount = Discount::new(Decimal::new(10, 0), Decimal::new(5, 0)).expect("valid");
    /// assert_eq!(discount.apply(price).to_string(), "$85.00");
    /// ```
    #[must_use]
    pub fn apply(&self, price: Money) -> Money {
        let base = price.amount();
        // percent / 100 <= 1, so the product never exceeds the base price.
        let percent_off = base * (self.percent / ONE_HUNDRED);
        Money::floored(base - percent_off - self.amount.amount())
    }
}

/// Price as the presentation shell should show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDisplay {
    /// No discount applies; the base price is the current price.
    Regular {
        /// Current price.
        price: Money,
    },
    /// A discount applies; the original is shown struck through.
    Discounted {
        /// Price after discounts.
        price: Money,
        /// Base price before discounts.
        original: Money,
    },
}

impl PriceDisplay {
    /// Build the display for `price` under `discount`.
    #[must_use]
    pub fn for_price(price: Money, discount: &Discount) -> Self {
        if discount.is_active() {
            Self::Discounted {
                price: discount.apply(price),
                original: price,
            }
        } else {
            Self::Regular { price }
        }
    }

    /// Price the customer pays.
    #[must_use]
    pub const fn current(&self) -> Money {
        match self {
            Self::Regular { price } | Self::Discounted { price, .. } => *price,
        }
    }

    /// Original price to strike through, when discounted.
    #[must_use]
    pub const fn struck_through(&self) -> Option<Money> {
        match self {
            Self::Regular { .. } => None,
            Self::Discounted { original, .. } => Some(*original),
        }
    }
}
