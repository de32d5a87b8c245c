//! Reqwest-backed record source adapter.
//!
//! This adapter owns transport details only: URL and header construction,
//! timeout and HTTP error mapping, and decoding of the JSON row array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{RecordSource, RecordSourceError, TableName};

const REST_PATH: [&str; 2] = ["rest", "v1"];
const API_KEY_HEADER: &str = "apikey";
const PROFILE_HEADER: &str = "Accept-Profile";

/// Record source that reads rows over the table service's REST interface.
pub struct RestRecordSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestRecordSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, url: Url, table: &TableName) -> RequestBuilder {
        let mut builder = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json");
        if let Some(schema) = table.schema() {
            builder = builder.header(PROFILE_HEADER, schema);
        }
        builder
    }

    async fn fetch_rows(
        &self,
        table: &TableName,
        id: Option<&str>,
    ) -> Result<Vec<Value>, RecordSourceError> {
        let url = table_url(&self.base_url, table, id)?;
        let response = self
            .request(url, table)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let rows = parse_rows(body.as_ref())?;
        debug!(table = %table, rows = rows.len(), "record source responded");
        Ok(rows)
    }
}

#[async_trait]
impl RecordSource for RestRecordSource {
    async fn fetch_by_id(
        &self,
        table: &TableName,
        id: &str,
    ) -> Result<Option<Value>, RecordSourceError> {
        let rows = self.fetch_rows(table, Some(id)).await?;
        single_row(rows, table, id)
    }

    async fn fetch_all(&self, table: &TableName) -> Result<Vec<Value>, RecordSourceError> {
        self.fetch_rows(table, None).await
    }
}

fn table_url(
    base_url: &Url,
    table: &TableName,
    id: Option<&str>,
) -> Result<Url, RecordSourceError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| RecordSourceError::rejected(format!("invalid service URL {base_url}")))?
        .pop_if_empty()
        .extend(REST_PATH)
        .push(table.name());
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("select", "*");
        if let Some(row_id) = id {
            query.append_pair("id", &format!("eq.{row_id}"));
        }
    }
    Ok(url)
}

fn single_row(
    rows: Vec<Value>,
    table: &TableName,
    id: &str,
) -> Result<Option<Value>, RecordSourceError> {
    let count = rows.len();
    let mut matches = rows.into_iter();
    match (matches.next(), count) {
        (None, _) => Ok(None),
        (Some(row), 1) => Ok(Some(row)),
        (Some(_), _) => Err(RecordSourceError::ambiguous(table.to_string(), id, count)),
    }
}

fn parse_rows(body: &[u8]) -> Result<Vec<Value>, RecordSourceError> {
    serde_json::from_slice(body).map_err(|error| {
        RecordSourceError::decode(format!("invalid row array payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> RecordSourceError {
    if error.is_timeout() {
        RecordSourceError::timeout(error.to_string())
    } else {
        RecordSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RecordSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RecordSourceError::timeout(message)
        }
        _ if status.is_client_error() => RecordSourceError::rejected(message),
        _ => RecordSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
