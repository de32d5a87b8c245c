//! Stock availability and its presentation labels.

use std::fmt;

/// Label shown on cards when units are available.
pub const IN_STOCK_LABEL: &str = "In Stock";
/// Label shown anywhere a product has no available units.
pub const OUT_OF_STOCK_LABEL: &str = "Out of Stock";
/// Label of the enabled purchase action.
pub const ADD_TO_CART_LABEL: &str = "Add to Cart";

/// Availability derived from a product's available count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    /// At least one unit can be purchased.
    InStock {
        /// Units currently purchasable.
        count: u32,
    },
    /// Nothing can be purchased.
    OutOfStock,
}

impl StockStatus {
    /// Classify an available count.
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        if count == 0 {
            Self::OutOfStock
        } else {
            Self::InStock { count }
        }
    }

    /// Whether actions that need stock (adding to cart) are enabled.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::InStock { .. })
    }

    /// Short badge used on product cards.
    #[must_use]
    pub const fn card_label(&self) -> &'static str {
        match self {
            Self::InStock { .. } => IN_STOCK_LABEL,
            Self::OutOfStock => OUT_OF_STOCK_LABEL,
        }
    }

    /// Badge used on the detail page, carrying the count when available.
    #[must_use]
    pub fn detail_label(&self) -> String {
        match self {
            Self::InStock { count } => format!("{count} in stock"),
            Self::OutOfStock => OUT_OF_STOCK_LABEL.to_owned(),
        }
    }

    /// Label of the purchase button.
    #[must_use]
    pub const fn cart_action_label(&self) -> &'static str {
        match self {
            Self::InStock { .. } => ADD_TO_CART_LABEL,
            Self::OutOfStock => OUT_OF_STOCK_LABEL,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.card_label())
    }
}
