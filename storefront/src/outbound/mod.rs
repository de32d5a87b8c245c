//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **rest**: reqwest-backed client for the hosted REST table service.
//!
//! Adapters translate between wire representations and port types. They
//! contain no pricing or lifecycle logic.

pub mod rest;
