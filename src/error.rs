//! Error types shared by all helpers.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for failures worth another attempt: transient
    /// connection errors and bulk-query failures, which are usually
    /// network hiccups on the long-running bulk path.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Connection(_) | ErrorKind::BulkQuery(_)
        )
    }

    /// Returns true when the synchronous query endpoint rejected the
    /// request because the query text blew its header size limit
    /// (HTTP 431).
    pub fn is_request_too_large(&self) -> bool {
        match &self.kind {
            ErrorKind::Connection(message) => {
                message.contains("431") || message.contains("Request Header Fields Too Large")
            }
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Transient failure raised by the underlying connection.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The list endpoint answered with something other than a sequence,
    /// meaning the batch contained a type the org does not recognize.
    #[error("Unknown metadata type in batch")]
    UnknownMetadataType,
    #[error("Unable to fetch list for {0}")]
    ListComponents(String),
    #[error("Unable to describe {0}")]
    DescribeObject(String),
    #[error("Deployment status check failed: {0}")]
    DeploymentCheck(String),
    #[error("Deployment did not complete within {0:?}")]
    DeploymentTimeout(std::time::Duration),
    #[error("Unable to determine object type from query")]
    UnknownObjectType,
    #[error("Bulk query failed: {0}")]
    BulkQuery(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
