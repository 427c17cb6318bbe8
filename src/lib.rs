//! # sf-org-utils
//!
//! Helper routines over an authenticated Salesforce org connection:
//!
//! - **Metadata inventory** - enumerate every supported metadata
//!   component in an org, batched and keyed by id
//! - **Deployment polling** - wait for an async deployment to finish,
//!   with an explicit timeout
//! - **Single-type reads** - list components of one metadata type or
//!   describe an object's schema, with retry
//! - **Query execution** - paginated SOQL (standard or tooling), with
//!   automatic bulk-query fallback for oversized queries
//!
//! The crate owns no wire protocol. Callers supply an [`OrgConnection`]
//! implementation backed by their API client; the helpers only sequence
//! the calls, retry transient failures, and normalize response shapes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_org_utils::{fetch_metadata_summary_from_org, QueryExecutor};
//!
//! # async fn run(conn: impl sf_org_utils::OrgConnection) -> sf_org_utils::Result<()> {
//! let inventory = fetch_metadata_summary_from_org(&conn).await?;
//! println!("{} components in the org", inventory.len());
//!
//! let accounts = QueryExecutor::new(&conn)
//!     .execute_query("SELECT Id, Name FROM Account", false)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod deploy;
mod error;
mod operations;
mod query;
mod retry;
mod summary;

#[cfg(test)]
mod test_support;

pub use connection::{
    DeploymentStatus, MetadataCatalog, MetadataTypeDescriptor, OrgConnection, QueryPage,
    DEFAULT_API_VERSION,
};
pub use deploy::check_deployment_status;
pub use error::{Error, ErrorKind, Result};
pub use operations::MetadataOperation;
pub use query::QueryExecutor;
pub use summary::{
    fetch_metadata_summary_by_types, fetch_metadata_summary_from_org,
    fetch_metadata_summary_with_denylist, MetadataSummary, UNSUPPORTED_TYPES,
};
