//! Single-type metadata reads.

use std::time::Duration;

use serde_json::Value;

use crate::connection::OrgConnection;
use crate::error::{Error, ErrorKind, Result};
use crate::retry::{with_retry, RetryConfig};

const OPERATION_RETRY: RetryConfig = RetryConfig::new(5, Duration::from_secs(2));

/// Connection-scoped helper for reading metadata of a single type.
pub struct MetadataOperation<'a, C> {
    conn: &'a C,
}

impl<'a, C: OrgConnection> MetadataOperation<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// List the components of a single metadata type.
    ///
    /// The platform answers with `null` when the type has no components
    /// and with a bare object when there is exactly one; both are
    /// normalized to a plain vector here.
    pub async fn list_components(&self, component_type: &str) -> Result<Vec<Value>> {
        let types = [component_type.to_string()];
        let listed = with_retry(OPERATION_RETRY, || self.conn.list_metadata(&types))
            .await
            .map_err(|err| {
                Error::with_source(ErrorKind::ListComponents(component_type.to_string()), err)
            })?;

        let items = match listed {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(items)
    }

    /// Fetch the field-level schema description of an object type.
    pub async fn describe_object(&self, object_type: &str) -> Result<Value> {
        with_retry(OPERATION_RETRY, || self.conn.describe_sobject(object_type))
            .await
            .map_err(|err| {
                Error::with_source(ErrorKind::DescribeObject(object_type.to_string()), err)
            })
    }
}
