//! Inbound adapters that present page state to a user while keeping
//! presentation details at the edge.
//!
//! The text shell lives under [`text`]; it receives fully computed
//! [`crate::domain::PageView`] values and performs no arithmetic.

pub mod text;
