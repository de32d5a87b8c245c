//! Presentation-ready product view model.
//!
//! The presentation shell receives strings and flags only; every price and
//! label is computed here from a validated [`Product`].

use super::{PriceDisplay, Product, StockStatus};

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://images.pexels.com/photos/4464821/pexels-photo-4464821.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2";

/// Fully computed product card and detail data.
///
/// # Examples
/// ```
/// use storefront::domain::{Product, ProductView};
///
/// let product: Product = serde_json::from_value(serde_json::json!({
///     "id": "abc",
///     "name": "Desk lamp",
///     "price": 50,
///     "available_count": 0,
///     "created_at": "2024-05-01T10:00:00Z",
///     "updated_at": "2024-05-01T10:00:00Z"
/// }))?;
/// let view = ProductView::from(&product);
/// assert_eq!(view.current_price, "$50.00");
/// assert_eq!(view.original_price, None);
/// assert!(!view.add_to_cart_enabled);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    /// Product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description, empty when the product has none.
    pub description: String,
    /// Image URL, falling back to [`PLACEHOLDER_IMAGE_URL`].
    pub image_url: String,
    /// Formatted price the customer pays.
    pub current_price: String,
    /// Formatted original price to strike through, when discounted.
    pub original_price: Option<String>,
    /// Badge shown on listing cards.
    pub card_stock_label: String,
    /// Badge shown on the detail page.
    pub detail_stock_label: String,
    /// Whether the stock badge uses the available styling.
    pub in_stock: bool,
    /// Label of the purchase button.
    pub cart_action_label: String,
    /// Whether the purchase button is enabled.
    pub add_to_cart_enabled: bool,
    /// Route of the product's detail page.
    pub detail_path: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let price: PriceDisplay = product.price_display();
        let stock: StockStatus = product.stock();
        Self {
            id: product.id().to_string(),
            name: product.name().to_owned(),
            description: product.description().unwrap_or_default().to_owned(),
            image_url: product
                .image_url()
                .filter(|url| !url.is_empty())
                .unwrap_or(PLACEHOLDER_IMAGE_URL)
                .to_owned(),
            current_price: price.current().to_string(),
            original_price: price.struck_through().map(|original| original.to_string()),
            card_stock_label: stock.card_label().to_owned(),
            detail_stock_label: stock.detail_label(),
            in_stock: stock.is_available(),
            cart_action_label: stock.cart_action_label().to_owned(),
            add_to_cart_enabled: stock.is_available(),
            detail_path: product.id().detail_path(),
        }
    }
}
