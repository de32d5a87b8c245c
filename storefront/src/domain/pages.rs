//! Page controllers for the product listing and product details views.
//!
//! Each page owns one [`FetchLifecycle`] and a handle to the shared
//! [`ProductCatalogue`]. Requests are issued as [`PendingFetch`] futures the
//! caller drives; completions come back through `apply`, where stale results
//! are dropped.

use super::ports::{RecordSource, TableName};
use super::{
    ApplyOutcome, FetchCompletion, FetchLifecycle, FetchState, FetchTicket, PendingFetch,
    Product, ProductCatalogue, ProductId, ProductView,
};

/// Error message shown when the detail page cannot load its product.
pub const DETAILS_FAILURE_MESSAGE: &str = "Failed to load product details. Please try again later.";
/// Error message shown when the listing cannot load.
pub const LIST_FAILURE_MESSAGE: &str = "Failed to load products. Please try again later.";
/// Label of the retry action on the error panel.
pub const RETRY_LABEL: &str = "Try Again";

/// What the presentation shell should draw for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView<T> {
    /// Nothing requested yet.
    Idle,
    /// Spinner.
    Loading,
    /// Error panel with a retry action.
    Failed {
        /// Generic failure message.
        message: &'static str,
        /// Label of the retry action.
        retry_label: &'static str,
    },
    /// Loaded content.
    Loaded(T),
}

fn page_view<T, U>(state: &FetchState<T>, render: impl FnOnce(&T) -> U) -> PageView<U> {
    match state {
        FetchState::Idle => PageView::Idle,
        FetchState::Loading => PageView::Loading,
        FetchState::Failed(failure) => PageView::Failed {
            message: failure.message(),
            retry_label: RETRY_LABEL,
        },
        FetchState::Loaded(value) => PageView::Loaded(render(value)),
    }
}

/// Controller for `/products/{id}`.
pub struct ProductDetailsPage<S> {
    catalogue: ProductCatalogue<S>,
    lifecycle: FetchLifecycle<ProductId, Product>,
}

impl<S> ProductDetailsPage<S>
where
    S: RecordSource + 'static,
{
    /// Create an idle page.
    #[must_use]
    pub const fn new(catalogue: ProductCatalogue<S>) -> Self {
        Self {
            catalogue,
            lifecycle: FetchLifecycle::new(DETAILS_FAILURE_MESSAGE),
        }
    }

    /// Point the page at `id`.
    ///
    /// Returns the read to drive, or `None` when `id` is already the page's
    /// current product.
    pub fn navigate(&mut self, id: ProductId) -> Option<PendingFetch<ProductId, Product>> {
        let ticket = self.lifecycle.begin_if_changed(id)?;
        let catalogue = self.catalogue.clone();
        let key = ticket.key().clone();
        Some(PendingFetch::new(ticket, async move {
            catalogue.product(&key).await
        }))
    }

    /// Restart the cycle for the current product.
    pub fn retry(&mut self) -> Option<PendingFetch<ProductId, Product>> {
        let ticket = self.lifecycle.retry()?;
        let catalogue = self.catalogue.clone();
        let key = ticket.key().clone();
        Some(PendingFetch::new(ticket, async move {
            catalogue.product(&key).await
        }))
    }

    /// Apply a finished read.
    pub fn apply(&mut self, completion: FetchCompletion<ProductId, Product>) -> ApplyOutcome {
        self.lifecycle.apply(completion)
    }

    /// Navigate to `id` and wait for the read to finish.
    pub async fn load(&mut self, id: ProductId) -> PageView<ProductView> {
        if let Some(pending) = self.navigate(id) {
            let completion = pending.resolve().await;
            self.apply(completion);
        }
        self.view()
    }

    /// Drop page state, invalidating any read still in flight.
    pub fn leave(&mut self) {
        self.lifecycle.reset();
    }

    /// Raw lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<Product> {
        self.lifecycle.state()
    }

    /// Current product identifier, if any.
    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        self.lifecycle.key()
    }

    /// Presentation view of the current state.
    #[must_use]
    pub fn view(&self) -> PageView<ProductView> {
        page_view(self.lifecycle.state(), |product: &Product| {
            ProductView::from(product)
        })
    }
}

/// Controller for the product listing.
pub struct ProductListPage<S> {
    catalogue: ProductCatalogue<S>,
    lifecycle: FetchLifecycle<TableName, Vec<Product>>,
}

impl<S> ProductListPage<S>
where
    S: RecordSource + 'static,
{
    /// Create an idle listing.
    #[must_use]
    pub const fn new(catalogue: ProductCatalogue<S>) -> Self {
        Self {
            catalogue,
            lifecycle: FetchLifecycle::new(LIST_FAILURE_MESSAGE),
        }
    }

    fn request(&self, ticket: FetchTicket<TableName>) -> PendingFetch<TableName, Vec<Product>> {
        let catalogue = self.catalogue.clone();
        PendingFetch::new(ticket, async move { catalogue.products().await })
    }

    /// Open the listing.
    ///
    /// Returns `None` when the listing is already loading or loaded.
    pub fn open(&mut self) -> Option<PendingFetch<TableName, Vec<Product>>> {
        let table = self.catalogue.table().clone();
        let ticket = self.lifecycle.begin_if_changed(table)?;
        Some(self.request(ticket))
    }

    /// Restart the cycle.
    pub fn retry(&mut self) -> Option<PendingFetch<TableName, Vec<Product>>> {
        let ticket = self.lifecycle.retry()?;
        Some(self.request(ticket))
    }

    /// Apply a finished read.
    pub fn apply(&mut self, completion: FetchCompletion<TableName, Vec<Product>>) -> ApplyOutcome {
        self.lifecycle.apply(completion)
    }

    /// Open the listing and wait for the read to finish.
    pub async fn load(&mut self) -> PageView<Vec<ProductView>> {
        if let Some(pending) = self.open() {
            let completion = pending.resolve().await;
            self.apply(completion);
        }
        self.view()
    }

    /// Drop page state, invalidating any read still in flight.
    pub fn leave(&mut self) {
        self.lifecycle.reset();
    }

    /// Raw lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<Vec<Product>> {
        self.lifecycle.state()
    }

    /// Presentation view of the current state, one card per product.
    #[must_use]
    pub fn view(&self) -> PageView<Vec<ProductView>> {
        page_view(self.lifecycle.state(), |products| {
            products.iter().map(ProductView::from).collect()
        })
    }
}
