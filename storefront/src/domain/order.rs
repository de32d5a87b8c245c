//! Order read models.
//!
//! Orders are placed and mutated elsewhere; the storefront only decodes
//! their shape for display and audit purposes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Money, ProductId};

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting processing.
    Pending,
    /// Being prepared.
    Processing,
    /// Handed to a carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Withdrawn before delivery.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can no longer change status.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Error returned when parsing an order status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOrderStatusError;

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        })
    }
}

impl fmt::Display for ParseOrderStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid order status")
    }
}

impl std::error::Error for ParseOrderStatusError {}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError),
        }
    }
}

/// Validation errors raised while decoding orders and order items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// A monetary field is negative.
    NegativeAmount {
        /// Field holding the amount.
        field: &'static str,
        /// Rejected amount.
        value: Decimal,
    },
    /// Item quantity is below one.
    InvalidQuantity {
        /// Rejected quantity.
        quantity: i64,
    },
}

impl fmt::Display for OrderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount { field, value } => {
                write!(f, "order {field} must be non-negative (got {value})")
            }
            Self::InvalidQuantity { quantity } => {
                write!(f, "order item quantity must be at least 1 (got {quantity})")
            }
        }
    }
}

impl std::error::Error for OrderValidationError {}

fn amount(field: &'static str, value: Decimal) -> Result<Money, OrderValidationError> {
    Money::new(value).map_err(|_| OrderValidationError::NegativeAmount { field, value })
}

/// Customer order header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "OrderDraft")]
pub struct Order {
    /// Row identifier.
    id: Uuid,
    /// Ordering customer.
    user_id: Uuid,
    /// Shipping address.
    address_id: Uuid,
    /// Fulfilment status.
    status: OrderStatus,
    /// Amount charged.
    total_amount: Money,
    /// Applied coupon, if any.
    coupon_id: Option<Uuid>,
    /// Carrier service name.
    shipping_method: Option<String>,
    /// Carrier tracking reference.
    tracking_number: Option<String>,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
    /// Last update timestamp.
    updated_at: DateTime<Utc>,
}

/// Unvalidated order row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Row identifier.
    pub id: Uuid,
    /// Ordering customer.
    pub user_id: Uuid,
    /// Shipping address.
    pub address_id: Uuid,
    /// Fulfilment status.
    pub status: OrderStatus,
    /// Amount charged.
    pub total_amount: Decimal,
    /// Applied coupon, if any.
    #[serde(default)]
    pub coupon_id: Option<Uuid>,
    /// Carrier service name.
    #[serde(default)]
    pub shipping_method: Option<String>,
    /// Carrier tracking reference.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderDraft> for Order {
    type Error = OrderValidationError;

    fn try_from(value: OrderDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            address_id: value.address_id,
            status: value.status,
            total_amount: amount("total_amount", value.total_amount)?,
            coupon_id: value.coupon_id,
            shipping_method: value.shipping_method,
            tracking_number: value.tracking_number,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl Order {
    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Ordering customer.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Shipping address.
    #[must_use]
    pub const fn address_id(&self) -> Uuid {
        self.address_id
    }

    /// Fulfilment status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Amount charged.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Applied coupon, if any.
    #[must_use]
    pub const fn coupon_id(&self) -> Option<Uuid> {
        self.coupon_id
    }

    /// Carrier service name, if any.
    #[must_use]
    pub fn shipping_method(&self) -> Option<&str> {
        self.shipping_method.as_deref()
    }

    /// Carrier tracking reference, if any.
    #[must_use]
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "OrderItemDraft")]
pub struct OrderItem {
    /// Row identifier.
    id: Uuid,
    /// Owning order.
    order_id: Uuid,
    /// Ordered product.
    product_id: ProductId,
    /// Units ordered.
    quantity: u32,
    /// Price per unit at order time.
    unit_price: Money,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
}

/// Unvalidated order item row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    /// Row identifier.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i64,
    /// Price per unit at order time.
    pub unit_price: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderItemDraft> for OrderItem {
    type Error = OrderValidationError;

    fn try_from(value: OrderItemDraft) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(value.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(OrderValidationError::InvalidQuantity {
                quantity: value.quantity,
            })?;
        Ok(Self {
            id: value.id,
            order_id: value.order_id,
            product_id: value.product_id,
            quantity,
            unit_price: amount("unit_price", value.unit_price)?,
            created_at: value.created_at,
        })
    }
}

impl OrderItem {
    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Owning order.
    #[must_use]
    pub const fn order_id(&self) -> Uuid {
        self.order_id
    }

    /// Ordered product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Units ordered, at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price per unit at order time.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        Money::floored(self.unit_price.amount() * Decimal::from(self.quantity))
    }
}
