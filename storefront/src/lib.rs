//! Storefront core library.
//!
//! Pricing and stock presentation rules, the remote record fetch lifecycle
//! that drives the product pages, and the adapters that connect them to a
//! hosted REST table service and a text presentation shell.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::StorefrontSettings;
