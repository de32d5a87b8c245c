//! Domain primitives, rules and page state.
//!
//! Purpose: keep pricing and stock presentation rules and the remote fetch
//! lifecycle free of transport concerns. Rows arrive through the
//! [`ports::RecordSource`] port and are validated into strongly typed
//! aggregates before any rule runs.
//!
//! Public surface:
//! - Money, Discount, PriceDisplay: price arithmetic and display selection.
//! - StockStatus: availability labels and add-to-cart enablement.
//! - Product, Order, OrderItem, AuditLog: validated read models.
//! - FetchLifecycle and friends: ordered Idle/Loading/Loaded/Failed state.
//! - ProductCatalogue: timed reads through the record source port.
//! - ProductView, ProductDetailsPage, ProductListPage: page state for the
//!   presentation shell.

pub mod audit;
pub mod catalogue;
pub mod fetch;
pub mod money;
pub mod order;
pub mod pages;
pub mod ports;
pub mod pricing;
pub mod product;
pub mod product_view;
pub mod stock;

pub use self::audit::{AuditChanges, AuditDecodeError, AuditLog, ChangeSet};
pub use self::catalogue::{DEFAULT_FETCH_TIMEOUT, ProductCatalogue};
pub use self::fetch::{
    ApplyOutcome, FetchCompletion, FetchError, FetchFailure, FetchLifecycle, FetchState,
    FetchTicket, PendingFetch,
};
pub use self::money::{Money, MoneyValidationError};
pub use self::order::{
    Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus, OrderValidationError,
    ParseOrderStatusError,
};
pub use self::pages::{
    DETAILS_FAILURE_MESSAGE, LIST_FAILURE_MESSAGE, PageView, ProductDetailsPage, ProductListPage,
    RETRY_LABEL,
};
pub use self::pricing::{Discount, DiscountValidationError, PriceDisplay};
pub use self::product::{Product, ProductDraft, ProductId, ProductValidationError};
pub use self::product_view::{PLACEHOLDER_IMAGE_URL, ProductView};
pub use self::stock::StockStatus;
