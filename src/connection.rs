//! The upstream connection surface consumed by the helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// API version assumed when the connection does not report one.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// One entry in the org's metadata type catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataTypeDescriptor {
    pub xml_name: String,
    #[serde(default)]
    pub child_xml_names: Vec<String>,
}

/// Result of the type-catalog describe call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataCatalog {
    pub metadata_objects: Vec<MetadataTypeDescriptor>,
}

/// One page of query results, as returned by the synchronous query
/// endpoints. `next_records_url` is the opaque continuation cursor for
/// the following page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    pub done: bool,
    #[serde(default)]
    pub records: Vec<Value>,
    pub next_records_url: Option<String>,
}

/// Deployment status payload. Only `done` is inspected in this crate;
/// everything else passes through to the caller untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub done: bool,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

/// Authenticated handle to a Salesforce org, as exposed by the upstream
/// API client. The wire protocol, authentication, and cursor semantics
/// belong to the implementor; the helpers in this crate only sequence
/// the calls.
#[allow(async_fn_in_trait)]
pub trait OrgConnection {
    /// API version string used when building record URLs (e.g. "62.0").
    fn api_version(&self) -> &str {
        DEFAULT_API_VERSION
    }

    /// Describe the org's metadata type catalog.
    async fn describe_metadata(&self) -> Result<MetadataCatalog>;

    /// List metadata components for up to three types at once.
    ///
    /// The payload is returned as-is: the platform answers with a
    /// sequence normally, but with `null` or a bare object for some
    /// type/org combinations, and the callers absorb that variance.
    async fn list_metadata(&self, types: &[String]) -> Result<Value>;

    /// Check the status of a deployment. `include_details` requests the
    /// verbose payload.
    async fn check_deploy_status(
        &self,
        deployment_id: &str,
        include_details: bool,
    ) -> Result<DeploymentStatus>;

    /// Execute a query against the standard endpoint, or the tooling
    /// endpoint when `tooling` is set.
    async fn query(&self, soql: &str, tooling: bool) -> Result<QueryPage>;

    /// Fetch the next page of an earlier query via its continuation
    /// cursor.
    async fn query_more(&self, next_records_url: &str, tooling: bool) -> Result<QueryPage>;

    /// Execute a query through the asynchronous bulk endpoint and drain
    /// all rows.
    async fn bulk_query(&self, soql: &str) -> Result<Vec<Value>>;

    /// Fetch the field-level schema description of a single object type.
    async fn describe_sobject(&self, object_type: &str) -> Result<Value>;
}
