//! Driven port for reading rows from the hosted table service.
//!
//! The storefront never talks to the table service directly: pages and
//! services receive a [`RecordSource`] so the concrete REST client can be
//! swapped for fixtures or mocks in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by record source adapters.
    pub enum RecordSourceError {
        /// The service could not be reached or returned a server error.
        Transport {
            /// Adapter failure description.
            message: String,
        } => "record source transport failed: {message}",
        /// The request did not complete in time.
        Timeout {
            /// Adapter failure description.
            message: String,
        } => "record source request timed out: {message}",
        /// The service refused the request (bad filter, missing table, auth).
        Rejected {
            /// Adapter failure description.
            message: String,
        } => "record source rejected the request: {message}",
        /// The response body could not be decoded into rows.
        Decode {
            /// Decoder failure description.
            message: String,
        } => "record source returned an undecodable payload: {message}",
        /// More than one row matched a single-row lookup.
        Ambiguous {
            /// Queried table.
            table: String,
            /// Requested identifier.
            id: String,
            /// Number of rows returned.
            rows: usize,
        } => "expected at most one {table} row for id {id}, found {rows}",
    }
}

/// Qualified table name such as `ecommerce.products`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    schema: Option<String>,
    name: String,
}

/// Validation errors returned when constructing [`TableName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableNameValidationError {
    /// Table or schema segment is empty.
    #[error("table name segments must not be empty")]
    EmptySegment,
    /// Segment contains whitespace or more than one schema separator.
    #[error("table name must be `table` or `schema.table` without whitespace")]
    Malformed,
}

fn segment(raw: &str) -> Result<String, TableNameValidationError> {
    if raw.is_empty() {
        return Err(TableNameValidationError::EmptySegment);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(TableNameValidationError::Malformed);
    }
    Ok(raw.to_owned())
}

impl TableName {
    /// Parse `table` or `schema.table`.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::ports::TableName;
    ///
    /// let table = TableName::parse("ecommerce.products").expect("valid table");
    /// assert_eq!(table.schema(), Some("ecommerce"));
    /// assert_eq!(table.name(), "products");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TableNameValidationError> {
        match raw.split_once('.') {
            Some((schema, name)) => {
                if name.contains('.') {
                    return Err(TableNameValidationError::Malformed);
                }
                Ok(Self {
                    schema: Some(segment(schema)?),
                    name: segment(name)?,
                })
            }
            None => Ok(Self {
                schema: None,
                name: segment(raw)?,
            }),
        }
    }

    /// Build a table name from an optional schema and a table.
    pub fn new(schema: Option<&str>, name: &str) -> Result<Self, TableNameValidationError> {
        Ok(Self {
            schema: schema.map(segment).transpose()?,
            name: segment(name)?,
        })
    }

    /// Schema qualifier, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unqualified table name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Port for reading JSON rows by table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the row whose `id` equals `id`.
    ///
    /// Returns `Ok(None)` when no row matches and
    /// [`RecordSourceError::Ambiguous`] when more than one does.
    async fn fetch_by_id(
        &self,
        table: &TableName,
        id: &str,
    ) -> Result<Option<Value>, RecordSourceError>;

    /// Fetch every row of `table`.
    async fn fetch_all(&self, table: &TableName) -> Result<Vec<Value>, RecordSourceError>;
}

/// In-memory record source keyed by table and row `id`.
///
/// Rows are returned in identifier order. Tables can be marked as failing to
/// exercise error paths without a network.
#[derive(Debug, Default)]
pub struct FixtureRecordSource {
    tables: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    failures: Mutex<BTreeMap<String, RecordSourceError>>,
}

impl FixtureRecordSource {
    /// Create an empty fixture source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `row` under `table`, keyed by its string `id` field.
    ///
    /// Rows without a string `id` are stored under an empty key and are only
    /// visible through [`RecordSource::fetch_all`].
    #[must_use]
    pub fn with_row(self, table: &TableName, row: Value) -> Self {
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().insert(id, row);
        }
        self
    }

    /// Make every read of `table` fail with `error`.
    #[must_use]
    pub fn with_failure(self, table: &TableName, error: RecordSourceError) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(table.to_string(), error);
        }
        self
    }

    fn check_failure(&self, table: &TableName) -> Result<(), RecordSourceError> {
        let failures = self
            .failures
            .lock()
            .map_err(|_| RecordSourceError::transport("fixture failures poisoned"))?;
        match failures.get(&table.to_string()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordSource for FixtureRecordSource {
    async fn fetch_by_id(
        &self,
        table: &TableName,
        id: &str,
    ) -> Result<Option<Value>, RecordSourceError> {
        self.check_failure(table)?;
        let tables = self
            .tables
            .lock()
            .map_err(|_| RecordSourceError::transport("fixture tables poisoned"))?;
        Ok(tables
            .get(&table.to_string())
            .and_then(|rows| rows.get(id))
            .cloned())
    }

    async fn fetch_all(&self, table: &TableName) -> Result<Vec<Value>, RecordSourceError> {
        self.check_failure(table)?;
        let tables = self
            .tables
            .lock()
            .map_err(|_| RecordSourceError::transport("fixture tables poisoned"))?;
        Ok(tables
            .get(&table.to_string())
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for table names and the fixture source.

    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn products() -> TableName {
        TableName::parse("ecommerce.products").expect("valid table")
    }

    #[rstest]
    #[case("products", None, "products")]
    #[case("ecommerce.products", Some("ecommerce"), "products")]
    fn parses_table_names(
        #[case] raw: &str,
        #[case] schema: Option<&str>,
        #[case] name: &str,
    ) {
        let table = TableName::parse(raw).expect("valid table");
        assert_eq!(table.schema(), schema);
        assert_eq!(table.name(), name);
        assert_eq!(table.to_string(), raw);
    }

    #[rstest]
    #[case("", TableNameValidationError::EmptySegment)]
    #[case(".products", TableNameValidationError::EmptySegment)]
    #[case("ecommerce.", TableNameValidationError::EmptySegment)]
    #[case("a.b.c", TableNameValidationError::Malformed)]
    #[case("my products", TableNameValidationError::Malformed)]
    fn rejects_malformed_table_names(
        #[case] raw: &str,
        #[case] expected: TableNameValidationError,
    ) {
        assert_eq!(TableName::parse(raw), Err(expected));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_matching_row(products: TableName) {
        let source = FixtureRecordSource::new()
            .with_row(&products, json!({ "id": "abc", "name": "Lamp" }))
            .with_row(&products, json!({ "id": "def", "name": "Desk" }));

        let row = source
            .fetch_by_id(&products, "abc")
            .await
            .expect("fetch succeeds");
        assert_eq!(row, Some(json!({ "id": "abc", "name": "Lamp" })));

        let missing = source
            .fetch_by_id(&products, "zzz")
            .await
            .expect("fetch succeeds");
        assert!(missing.is_none());

        let all = source.fetch_all(&products).await.expect("fetch succeeds");
        assert_eq!(all.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_failures_apply_to_every_read(products: TableName) {
        let source = FixtureRecordSource::new()
            .with_failure(&products, RecordSourceError::transport("offline"));

        let err = source
            .fetch_by_id(&products, "abc")
            .await
            .expect_err("configured failure");
        assert_eq!(err, RecordSourceError::transport("offline"));
        assert!(source.fetch_all(&products).await.is_err());
    }

    #[rstest]
    fn ambiguous_error_reports_row_count() {
        let err = RecordSourceError::ambiguous("products", "abc", 2_usize);
        assert_eq!(
            err.to_string(),
            "expected at most one products row for id abc, found 2"
        );
    }
}
