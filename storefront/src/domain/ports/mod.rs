//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod record_source;

#[cfg(test)]
pub use record_source::MockRecordSource;
pub use record_source::{
    FixtureRecordSource, RecordSource, RecordSourceError, TableName, TableNameValidationError,
};
