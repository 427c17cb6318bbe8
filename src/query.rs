//! Query execution with pagination and bulk fallback.

use std::sync::LazyLock;
use std::time::Duration;

use regex_lite::Regex;
use serde_json::Value;

use crate::connection::OrgConnection;
use crate::error::{Error, ErrorKind, Result};
use crate::retry::{with_retry, RetryConfig};

const QUERY_RETRY: RetryConfig = RetryConfig::new(5, Duration::from_secs(2));

/// First `FROM <identifier>` in the query text. Subqueries, quoted
/// strings, and multiple FROM-like tokens can fool this; callers are
/// expected to pass simple top-level queries to the bulk path.
static FROM_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FROM\s+([a-zA-Z0-9_]+)").expect("valid regex"));

/// Connection-scoped SOQL executor.
pub struct QueryExecutor<'a, C> {
    conn: &'a C,
}

impl<'a, C: OrgConnection> QueryExecutor<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Execute `query` and return every record, paginating through all
    /// continuation pages. When the synchronous endpoint rejects the
    /// query for exceeding its request header size limit (HTTP 431),
    /// falls back to the bulk endpoint and stamps each row with the
    /// `attributes` envelope the synchronous endpoint would have
    /// produced. `tooling` routes the query to the tooling endpoint.
    pub async fn execute_query(&self, query: &str, tooling: bool) -> Result<Vec<Value>> {
        with_retry(QUERY_RETRY, || self.execute_with_fallback(query, tooling)).await
    }

    async fn execute_with_fallback(&self, query: &str, tooling: bool) -> Result<Vec<Value>> {
        match self.execute_normal_query(query, tooling).await {
            Err(err) if err.is_request_too_large() => self.execute_bulk_query(query).await,
            other => other,
        }
    }

    async fn execute_normal_query(&self, query: &str, tooling: bool) -> Result<Vec<Value>> {
        let mut page = self.conn.query(query, tooling).await?;
        let mut records = std::mem::take(&mut page.records);

        while !page.done {
            let cursor = page.next_records_url.ok_or_else(|| {
                Error::new(ErrorKind::InvalidResponse(
                    "query page not done but no continuation cursor".to_string(),
                ))
            })?;
            page = self.conn.query_more(&cursor, tooling).await?;
            records.append(&mut page.records);
        }

        Ok(records)
    }

    async fn execute_bulk_query(&self, query: &str) -> Result<Vec<Value>> {
        let object_type = object_type_from_query(query)?;

        let rows = self
            .conn
            .bulk_query(query)
            .await
            .map_err(|err| Error::with_source(ErrorKind::BulkQuery(err.to_string()), err))?;

        let api_version = self.conn.api_version().to_string();
        Ok(rows
            .into_iter()
            .map(|row| attach_attributes(row, &object_type, &api_version))
            .collect())
    }
}

/// Extract the queried object's type name from the query text.
fn object_type_from_query(query: &str) -> Result<String> {
    FROM_OBJECT
        .captures(query)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::new(ErrorKind::UnknownObjectType))
}

/// Prefix a bulk row with the synthetic `attributes` envelope so it
/// matches the shape of rows from the synchronous endpoint.
fn attach_attributes(mut row: Value, object_type: &str, api_version: &str) -> Value {
    let id = row.get("Id").and_then(Value::as_str).unwrap_or_default();
    let url = format!("/services/data/v{api_version}/sobjects/{object_type}/{id}");
    if let Value::Object(fields) = &mut row {
        fields.insert(
            "attributes".to_string(),
            serde_json::json!({ "type": object_type, "url": url }),
        );
    }
    row
}
