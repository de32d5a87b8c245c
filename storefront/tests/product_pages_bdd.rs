//! Behaviour tests for the product listing and product details pages.
//!
//! Pages run against a scripted record source so each scenario controls row
//! contents, outages and the order in which reads finish.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use storefront::domain::ports::{RecordSource, RecordSourceError, TableName};
use storefront::domain::{
    ApplyOutcome, PageView, PendingFetch, Product, ProductCatalogue, ProductDetailsPage,
    ProductId, ProductListPage, ProductView,
};
use tokio::runtime::{Builder, Runtime};

#[derive(Default)]
struct ScriptedSource {
    rows: Mutex<BTreeMap<String, Value>>,
    offline: AtomicBool,
    reads: AtomicUsize,
}

impl ScriptedSource {
    fn insert(&self, row: Value) {
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .expect("row id")
            .to_owned();
        self.rows.lock().expect("rows lock").insert(id, row);
    }

    fn begin_read(&self) -> Result<(), RecordSourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RecordSourceError::transport("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch_by_id(
        &self,
        _table: &TableName,
        id: &str,
    ) -> Result<Option<Value>, RecordSourceError> {
        self.begin_read()?;
        Ok(self.rows.lock().expect("rows lock").get(id).cloned())
    }

    async fn fetch_all(&self, _table: &TableName) -> Result<Vec<Value>, RecordSourceError> {
        self.begin_read()?;
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .values()
            .cloned()
            .collect())
    }
}

type DetailsRead = PendingFetch<ProductId, Product>;

struct ProductPagesWorld {
    runtime: Runtime,
    source: Arc<ScriptedSource>,
    details: RefCell<ProductDetailsPage<ScriptedSource>>,
    listing: RefCell<ProductListPage<ScriptedSource>>,
    pending: RefCell<Option<(DetailsRead, DetailsRead)>>,
    late_outcome: RefCell<Option<ApplyOutcome>>,
}

impl ProductPagesWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let source = Arc::new(ScriptedSource::default());
        let table = TableName::parse("ecommerce.products").expect("valid table");
        let catalogue = ProductCatalogue::new(Arc::clone(&source), table);
        Self {
            runtime,
            source,
            details: RefCell::new(ProductDetailsPage::new(catalogue.clone())),
            listing: RefCell::new(ProductListPage::new(catalogue)),
            pending: RefCell::new(None),
            late_outcome: RefCell::new(None),
        }
    }

    fn details_view(&self) -> PageView<ProductView> {
        self.details.borrow().view()
    }

    fn loaded_details(&self) -> ProductView {
        match self.details_view() {
            PageView::Loaded(view) => view,
            other => panic!("expected loaded details, got {other:?}"),
        }
    }

    fn current_failure(&self) -> Option<(&'static str, &'static str)> {
        failure_of(&self.details_view()).or_else(|| failure_of(&self.listing.borrow().view()))
    }
}

fn failure_of<T>(view: &PageView<T>) -> Option<(&'static str, &'static str)> {
    match view {
        PageView::Failed {
            message,
            retry_label,
        } => Some((*message, *retry_label)),
        _ => None,
    }
}

fn product_id(raw: &str) -> ProductId {
    ProductId::new(raw).expect("valid id")
}

#[fixture]
fn world() -> ProductPagesWorld {
    ProductPagesWorld::new()
}

#[given("a product \"{id}\" priced {price} with {percent} percent and {amount} off and {count} in stock")]
fn a_product_priced(
    world: &ProductPagesWorld,
    id: String,
    price: i64,
    percent: i64,
    amount: i64,
    count: i64,
) {
    world.source.insert(json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "discount_percent": percent,
        "discount_amount": amount,
        "available_count": count,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    }));
}

#[given("the products table is offline")]
fn the_products_table_is_offline(world: &ProductPagesWorld) {
    world.source.offline.store(true, Ordering::SeqCst);
}

#[when("the details page for \"{id}\" is loaded")]
fn the_details_page_is_loaded(world: &ProductPagesWorld, id: String) {
    let mut page = world.details.borrow_mut();
    world.runtime.block_on(page.load(product_id(&id)));
}

#[when("the shopper opens \"{first}\" and then \"{second}\" before either read finishes")]
fn the_shopper_opens_two_products(world: &ProductPagesWorld, first: String, second: String) {
    let mut page = world.details.borrow_mut();
    let earlier = page.navigate(product_id(&first)).expect("read for first product");
    let later = page.navigate(product_id(&second)).expect("read for second product");
    drop(page);
    world.pending.replace(Some((earlier, later)));
}

#[when("the read for \"{later}\" finishes before the read for \"{earlier}\"")]
fn the_later_read_finishes_first(world: &ProductPagesWorld, later: String, earlier: String) {
    let (earlier_read, later_read) = world.pending.take().expect("two reads in flight");
    assert_eq!(earlier_read.ticket().key(), &product_id(&earlier));
    assert_eq!(later_read.ticket().key(), &product_id(&later));

    let later_done = world.runtime.block_on(later_read.resolve());
    let earlier_done = world.runtime.block_on(earlier_read.resolve());
    let mut page = world.details.borrow_mut();
    assert_eq!(page.apply(later_done), ApplyOutcome::Applied);
    world.late_outcome.replace(Some(page.apply(earlier_done)));
}

#[when("the product listing is loaded")]
fn the_product_listing_is_loaded(world: &ProductPagesWorld) {
    let mut page = world.listing.borrow_mut();
    world.runtime.block_on(page.load());
}

#[when("the products table comes back online")]
fn the_products_table_comes_back_online(world: &ProductPagesWorld) {
    world.source.offline.store(false, Ordering::SeqCst);
}

#[when("the shopper retries the listing")]
fn the_shopper_retries_the_listing(world: &ProductPagesWorld) {
    let mut page = world.listing.borrow_mut();
    let pending = page.retry().expect("retry issues a read");
    let completion = world.runtime.block_on(pending.resolve());
    page.apply(completion);
}

#[then("the current price is \"{price}\"")]
fn the_current_price_is(world: &ProductPagesWorld, price: String) {
    assert_eq!(world.loaded_details().current_price, price);
}

#[then("the struck-through price is \"{price}\"")]
fn the_struck_through_price_is(world: &ProductPagesWorld, price: String) {
    assert_eq!(world.loaded_details().original_price, Some(price));
}

#[then("no price is struck through")]
fn no_price_is_struck_through(world: &ProductPagesWorld) {
    assert!(world.loaded_details().original_price.is_none());
}

#[then("the stock label is \"{label}\"")]
fn the_stock_label_is(world: &ProductPagesWorld, label: String) {
    assert_eq!(world.loaded_details().detail_stock_label, label);
}

#[then("adding to cart is enabled")]
fn adding_to_cart_is_enabled(world: &ProductPagesWorld) {
    let view = world.loaded_details();
    assert!(view.add_to_cart_enabled);
    assert_eq!(view.cart_action_label, "Add to Cart");
}

#[then("adding to cart is disabled")]
fn adding_to_cart_is_disabled(world: &ProductPagesWorld) {
    let view = world.loaded_details();
    assert!(!view.add_to_cart_enabled);
    assert_eq!(view.cart_action_label, "Out of Stock");
}

#[then("the read count is {count}")]
fn the_read_count_is(world: &ProductPagesWorld, count: usize) {
    assert_eq!(world.source.reads.load(Ordering::SeqCst), count);
}

#[then("the page shows the error \"{message}\"")]
fn the_page_shows_the_error(world: &ProductPagesWorld, message: String) {
    let (shown, _) = world.current_failure().expect("error panel shown");
    assert_eq!(shown, message);
}

#[then("the error panel offers \"{label}\"")]
fn the_error_panel_offers(world: &ProductPagesWorld, label: String) {
    let (_, retry_label) = world.current_failure().expect("error panel shown");
    assert_eq!(retry_label, label);
}

#[then("the details page shows product \"{id}\"")]
fn the_details_page_shows_product(world: &ProductPagesWorld, id: String) {
    assert_eq!(world.loaded_details().id, id);
}

#[then("the late result for \"{id}\" was discarded")]
fn the_late_result_was_discarded(world: &ProductPagesWorld, id: String) {
    assert_ne!(world.loaded_details().id, id);
    assert_eq!(*world.late_outcome.borrow(), Some(ApplyOutcome::Stale));
}

#[then("the listing shows {count} card")]
fn the_listing_shows_cards(world: &ProductPagesWorld, count: usize) {
    match world.listing.borrow().view() {
        PageView::Loaded(cards) => assert_eq!(cards.len(), count),
        other => panic!("expected loaded listing, got {other:?}"),
    }
}

#[scenario(
    path = "tests/features/product_pages.feature",
    name = "Discounted product shows both prices"
)]
fn discounted_product_shows_both_prices(world: ProductPagesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/product_pages.feature",
    name = "Undiscounted product out of stock"
)]
fn undiscounted_product_out_of_stock(world: ProductPagesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/product_pages.feature",
    name = "Missing product shows the generic error panel"
)]
fn missing_product_shows_the_generic_error_panel(world: ProductPagesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/product_pages.feature",
    name = "Earlier navigation resolving last is discarded"
)]
fn earlier_navigation_resolving_last_is_discarded(world: ProductPagesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/product_pages.feature",
    name = "Listing recovers after a retry"
)]
fn listing_recovers_after_a_retry(world: ProductPagesWorld) {
    drop(world);
}
