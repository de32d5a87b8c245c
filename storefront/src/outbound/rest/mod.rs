//! REST table service adapters.
//!
//! This module provides a thin HTTP implementation of the `RecordSource`
//! port against a PostgREST-style endpoint.

mod http_source;

pub use http_source::RestRecordSource;
