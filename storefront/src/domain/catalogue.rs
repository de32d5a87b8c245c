//! Product catalogue service.
//!
//! Reads product rows through the [`RecordSource`] port, bounds every read
//! with a timeout and maps adapter failures, missing rows and undecodable
//! records into [`FetchError`]. Underlying errors are logged here, at the
//! fetch boundary, because the lifecycle only shows a generic message.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{RecordSource, RecordSourceError, TableName};
use crate::domain::{FetchError, Product, ProductId};

/// Default upper bound for one remote read.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-side service for catalogue products.
pub struct ProductCatalogue<S> {
    source: Arc<S>,
    table: TableName,
    timeout: Duration,
}

impl<S> Clone for ProductCatalogue<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            table: self.table.clone(),
            timeout: self.timeout,
        }
    }
}

impl<S> ProductCatalogue<S> {
    /// Create a catalogue reading `table` with the default timeout.
    pub const fn new(source: Arc<S>, table: TableName) -> Self {
        Self {
            source,
            table,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the per-read timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Table the catalogue reads from.
    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }
}

impl<S> ProductCatalogue<S>
where
    S: RecordSource,
{
    /// Load one product by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when no row matches and
    /// [`FetchError::RemoteFailure`] for adapter errors, timeouts and rows
    /// that fail validation.
    pub async fn product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let read = self.source.fetch_by_id(&self.table, id.as_ref());
        let row = match tokio::time::timeout(self.timeout, read).await {
            Ok(Ok(Some(row))) => row,
            Ok(Ok(None)) => {
                debug!(table = %self.table, id = %id, "product not found");
                return Err(FetchError::NotFound);
            }
            Ok(Err(error)) => return Err(self.source_failure(&error)),
            Err(_) => return Err(self.timed_out()),
        };
        self.decode(row)
    }

    /// Load every product in the table.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RemoteFailure`] for adapter errors, timeouts and
    /// any row that fails validation.
    pub async fn products(&self) -> Result<Vec<Product>, FetchError> {
        let read = self.source.fetch_all(&self.table);
        let rows = match tokio::time::timeout(self.timeout, read).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(error)) => return Err(self.source_failure(&error)),
            Err(_) => return Err(self.timed_out()),
        };
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    fn decode(&self, row: Value) -> Result<Product, FetchError> {
        serde_json::from_value(row).map_err(|error| {
            debug!(table = %self.table, error = %error, "product row failed validation");
            FetchError::remote(format!("invalid product row: {error}"))
        })
    }

    fn source_failure(&self, error: &RecordSourceError) -> FetchError {
        debug!(table = %self.table, error = %error, "product read failed");
        FetchError::remote(error.to_string())
    }

    fn timed_out(&self) -> FetchError {
        let timeout_ms = self.timeout.as_millis();
        debug!(table = %self.table, timeout_ms, "product read timed out");
        FetchError::remote(format!("read timed out after {timeout_ms} ms"))
    }
}
