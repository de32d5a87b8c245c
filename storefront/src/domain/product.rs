//! Product data model.
//!
//! Products are owned by the remote table service and are read-only here.
//! Rows decode through [`ProductDraft`], which validates every invariant
//! before a [`Product`] exists, so a malformed record (for example a discount
//! percentage above 100) is rejected instead of producing a negative price.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Discount, DiscountValidationError, Money, PriceDisplay, StockStatus};

/// Validation errors raised while building a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Identifier is empty.
    EmptyId,
    /// Identifier carries leading or trailing whitespace.
    PaddedId,
    /// Name is blank.
    EmptyName,
    /// Base price is negative.
    NegativePrice {
        /// Rejected price.
        price: Decimal,
    },
    /// Discount fields are out of range.
    InvalidDiscount(DiscountValidationError),
    /// A count is negative or too large.
    CountOutOfRange {
        /// Field holding the count.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "product id must not be empty"),
            Self::PaddedId => {
                write!(f, "product id must not contain surrounding whitespace")
            }
            Self::EmptyName => write!(f, "product name must not be blank"),
            Self::NegativePrice { price } => {
                write!(f, "product price must be non-negative (got {price})")
            }
            Self::InvalidDiscount(err) => write!(f, "invalid product discount: {err}"),
            Self::CountOutOfRange { field, value } => {
                write!(f, "product {field} must be a non-negative count (got {value})")
            }
        }
    }
}

impl std::error::Error for ProductValidationError {}

impl From<DiscountValidationError> for ProductValidationError {
    fn from(value: DiscountValidationError) -> Self {
        Self::InvalidDiscount(value)
    }
}

/// Identifier of a product row.
///
/// The remote service issues opaque string identifiers; only emptiness and
/// surrounding whitespace are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Validate and construct a [`ProductId`].
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::ProductId;
    ///
    /// let id = ProductId::new("abc").expect("valid id");
    /// assert_eq!(id.as_ref(), "abc");
    /// assert!(ProductId::new(" abc").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, ProductValidationError> {
        let raw = id.into();
        if raw.is_empty() {
            return Err(ProductValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(ProductValidationError::PaddedId);
        }
        Ok(Self(raw))
    }

    /// Route of the detail page for this product.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/products/{}", self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalogue product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProductDraft")]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    category: Option<String>,
    price: Money,
    discount: Discount,
    available_count: u32,
    pending_order_count: u32,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Unvalidated product row as stored by the remote table service.
///
/// # Examples
/// ```
/// use storefront::domain::{Product, ProductDraft};
///
/// let draft: ProductDraft = serde_json::from_value(serde_json::json!({
///     "id": "abc",
///     "name": "Desk lamp",
///     "price": 100,
///     "discount_percent": 10,
///     "discount_amount": 5,
///     "available_count": 3,
///     "created_at": "2024-05-01T10:00:00Z",
///     "updated_at": "2024-05-01T10:00:00Z"
/// }))?;
/// let product = Product::try_from(draft)?;
/// assert_eq!(product.discounted_price().to_string(), "$85.00");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Row identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form category.
    #[serde(default)]
    pub category: Option<String>,
    /// Base price.
    pub price: Decimal,
    /// Percentage discount.
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Flat discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Units currently purchasable.
    #[serde(default)]
    pub available_count: i64,
    /// Units reserved by orders not yet fulfilled.
    #[serde(default)]
    pub pending_order_count: i64,
    /// Product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn count(field: &'static str, value: i64) -> Result<u32, ProductValidationError> {
    u32::try_from(value).map_err(|_| ProductValidationError::CountOutOfRange { field, value })
}

impl TryFrom<ProductDraft> for Product {
    type Error = ProductValidationError;

    fn try_from(value: ProductDraft) -> Result<Self, Self::Error> {
        let id = ProductId::new(value.id)?;
        if value.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        let price = Money::new(value.price)
            .map_err(|_| ProductValidationError::NegativePrice { price: value.price })?;
        let discount = Discount::new(value.discount_percent, value.discount_amount)?;

        Ok(Self {
            id,
            name: value.name,
            description: value.description,
            category: value.category,
            price,
            discount,
            available_count: count("available_count", value.available_count)?,
            pending_order_count: count("pending_order_count", value.pending_order_count)?,
            image_url: value.image_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl Product {
    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Long description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Free-form category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Base price before discounts.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Discount applied to the base price.
    #[must_use]
    pub const fn discount(&self) -> &Discount {
        &self.discount
    }

    /// Price after both discounts.
    #[must_use]
    pub fn discounted_price(&self) -> Money {
        self.discount.apply(self.price)
    }

    /// Price as it should be presented.
    #[must_use]
    pub fn price_display(&self) -> PriceDisplay {
        PriceDisplay::for_price(self.price, &self.discount)
    }

    /// Units currently purchasable.
    #[must_use]
    pub const fn available_count(&self) -> u32 {
        self.available_count
    }

    /// Units reserved by open orders.
    #[must_use]
    pub const fn pending_order_count(&self) -> u32 {
        self.pending_order_count
    }

    /// Availability derived from the available count.
    #[must_use]
    pub const fn stock(&self) -> StockStatus {
        StockStatus::from_count(self.available_count)
    }

    /// Product image, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
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
