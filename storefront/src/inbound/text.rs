//! Plain-text rendering of product pages for terminals.

use crate::domain::{PageView, ProductView};

/// Text drawn while a read is in flight.
pub const LOADING_TEXT: &str = "Loading...";
/// Text drawn for an empty listing.
pub const EMPTY_LISTING_TEXT: &str = "No products available.";
/// Label of the link from a card to its detail page.
pub const VIEW_DETAILS_LABEL: &str = "View Details";

fn price_line(view: &ProductView) -> String {
    view.original_price.as_ref().map_or_else(
        || view.current_price.clone(),
        |original| format!("{} (was {original})", view.current_price),
    )
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("[{label}] (disabled)")
    }
}

fn render_state<T>(view: &PageView<T>, loaded: impl FnOnce(&T) -> String) -> String {
    match view {
        PageView::Idle => String::new(),
        PageView::Loading => LOADING_TEXT.to_owned(),
        PageView::Failed {
            message,
            retry_label,
        } => format!("{message}\n{}", button(retry_label, true)),
        PageView::Loaded(content) => loaded(content),
    }
}

/// Render the product details page.
#[must_use]
pub fn render_details(view: &PageView<ProductView>) -> String {
    render_state(view, |product| {
        let mut lines = vec![product.name.clone()];
        if !product.description.is_empty() {
            lines.push(product.description.clone());
        }
        lines.extend([
            format!("Image: {}", product.image_url),
            format!("Price: {}", price_line(product)),
            format!("Stock: {}", product.detail_stock_label),
            button(&product.cart_action_label, product.add_to_cart_enabled),
        ]);
        lines.join("\n")
    })
}

/// Render the product listing as one card per product.
#[must_use]
pub fn render_listing(view: &PageView<Vec<ProductView>>) -> String {
    render_state(view, |cards| {
        if cards.is_empty() {
            return EMPTY_LISTING_TEXT.to_owned();
        }
        cards
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn render_card(card: &ProductView) -> String {
    let mut lines = vec![format!(
        "{}  {}  [{}]",
        card.name,
        price_line(card),
        card.card_stock_label
    )];
    if !card.description.is_empty() {
        lines.push(format!("  {}", card.description));
    }
    lines.push(format!("  {VIEW_DETAILS_LABEL}: {}", card.detail_path));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for text rendering.

    use super::*;
    use crate::domain::{DETAILS_FAILURE_MESSAGE, RETRY_LABEL};
    use rstest::{fixture, rstest};

    #[fixture]
    fn desk() -> ProductView {
        ProductView {
            id: "abc".to_owned(),
            name: "Walnut desk".to_owned(),
            description: "Solid walnut.".to_owned(),
            image_url: "https://cdn.example.com/desk.jpg".to_owned(),
            current_price: "$85.00".to_owned(),
            original_price: Some("$100.00".to_owned()),
            card_stock_label: "In Stock".to_owned(),
            detail_stock_label: "2 in stock".to_owned(),
            in_stock: true,
            cart_action_label: "Add to Cart".to_owned(),
            add_to_cart_enabled: true,
            detail_path: "/products/abc".to_owned(),
        }
    }

    #[rstest]
    fn renders_discounted_details(desk: ProductView) {
        let text = render_details(&PageView::Loaded(desk));
        assert_eq!(
            text,
            "Walnut desk\nSolid walnut.\nImage: https://cdn.example.com/desk.jpg\n\
             Price: $85.00 (was $100.00)\nStock: 2 in stock\n[Add to Cart]"
        );
    }

    #[rstest]
    fn out_of_stock_details_disable_the_button(mut desk: ProductView) {
        desk.original_price = None;
        desk.current_price = "$50.00".to_owned();
        desk.detail_stock_label = "Out of Stock".to_owned();
        desk.cart_action_label = "Out of Stock".to_owned();
        desk.add_to_cart_enabled = false;

        let text = render_details(&PageView::Loaded(desk));
        assert!(text.contains("Price: $50.00\n"));
        assert!(text.ends_with("[Out of Stock] (disabled)"));
    }

    #[rstest]
    fn renders_error_panel_with_retry() {
        let view: PageView<ProductView> = PageView::Failed {
            message: DETAILS_FAILURE_MESSAGE,
            retry_label: RETRY_LABEL,
        };
        assert_eq!(
            render_details(&view),
            "Failed to load product details. Please try again later.\n[Try Again]"
        );
    }

    #[rstest]
    fn renders_spinner_and_idle() {
        assert_eq!(render_details(&PageView::Loading), LOADING_TEXT);
        assert_eq!(render_listing(&PageView::Idle), "");
    }

    #[rstest]
    fn renders_one_card_per_product(desk: ProductView) {
        let mut lamp = desk.clone();
        lamp.name = "Desk lamp".to_owned();
        lamp.description = String::new();
        lamp.original_price = None;
        lamp.current_price = "$20.00".to_owned();
        lamp.card_stock_label = "Out of Stock".to_owned();
        lamp.detail_path = "/products/lamp".to_owned();

        let text = render_listing(&PageView::Loaded(vec![desk, lamp]));
        assert_eq!(
            text,
            "Walnut desk  $85.00 (was $100.00)  [In Stock]\n  Solid walnut.\n  \
             View Details: /products/abc\n\n\
             Desk lamp  $20.00  [Out of Stock]\n  View Details: /products/lamp"
        );
    }

    #[rstest]
    fn renders_empty_listing() {
        assert_eq!(render_listing(&PageView::Loaded(Vec::new())), EMPTY_LISTING_TEXT);
    }
}
