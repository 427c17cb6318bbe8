//! Deployment status polling.

use std::time::Duration;

use tokio::time::sleep;

use crate::connection::{DeploymentStatus, OrgConnection};
use crate::error::{Error, ErrorKind, Result};

/// Interval between status checks.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll the deploy-status endpoint every five seconds until the
/// deployment reports completion, returning the final verbose payload.
///
/// The endpoint is always called at least once. A status-check failure
/// is fatal with no retry; once `timeout` has elapsed without the
/// deployment finishing, the poll fails with
/// [`ErrorKind::DeploymentTimeout`].
pub async fn check_deployment_status<C: OrgConnection>(
    conn: &C,
    deployment_id: &str,
    timeout: Duration,
) -> Result<DeploymentStatus> {
    let started = tokio::time::Instant::now();

    loop {
        let status = conn
            .check_deploy_status(deployment_id, true)
            .await
            .map_err(|err| Error::with_source(ErrorKind::DeploymentCheck(err.to_string()), err))?;

        if status.done {
            return Ok(status);
        }

        if started.elapsed() >= timeout {
            return Err(Error::new(ErrorKind::DeploymentTimeout(timeout)));
        }

        tracing::info!(deployment_id, "polling for deployment status");
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{transient, MockConnection};
    use std::sync::atomic::Ordering;

    fn status(done: bool) -> DeploymentStatus {
        DeploymentStatus {
            done,
            payload: serde_json::Map::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_done_with_fixed_interval() {
        let conn = MockConnection::new();
        conn.push_deploy(Ok(status(false)));
        conn.push_deploy(Ok(status(false)));
        conn.push_deploy(Ok(status(true)));

        let started = tokio::time::Instant::now();
        let result = check_deployment_status(&conn, "0Af000000000001", Duration::from_secs(600))
            .await
            .unwrap();

        assert!(result.done);
        assert_eq!(conn.deploy_calls.load(Ordering::SeqCst), 3);
        // Two 5-second waits between the three checks.
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn returns_immediately_when_already_done() {
        let conn = MockConnection::new();
        let mut payload = serde_json::Map::new();
        payload.insert("status".to_string(), serde_json::json!("Succeeded"));
        conn.push_deploy(Ok(DeploymentStatus { done: true, payload }));

        let result = check_deployment_status(&conn, "0Af000000000001", Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(conn.deploy_calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.payload["status"], "Succeeded");
    }

    #[tokio::test]
    async fn status_check_failure_is_fatal_without_retry() {
        let conn = MockConnection::new();
        conn.push_deploy(Err(transient("socket closed")));

        let err = check_deployment_status(&conn, "0Af000000000001", Duration::from_secs(600))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::DeploymentCheck(_)));
        assert_eq!(conn.deploy_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_deployment_never_finishes() {
        let conn = MockConnection::new();
        conn.push_deploy(Ok(status(false)));
        conn.push_deploy(Ok(status(false)));

        let err = check_deployment_status(&conn, "0Af000000000001", Duration::from_secs(4))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::DeploymentTimeout(_)));
        assert_eq!(conn.deploy_calls.load(Ordering::SeqCst), 2);
    }
}
