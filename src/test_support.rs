//! Scriptable [`OrgConnection`] used by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::connection::{DeploymentStatus, MetadataCatalog, OrgConnection, QueryPage};
use crate::error::{Error, ErrorKind, Result};

/// Mock connection that replays queued responses and records calls.
/// A call with no queued response panics, so tests fail loudly when a
/// helper makes more calls than scripted.
#[derive(Default)]
pub(crate) struct MockConnection {
    pub catalog: Option<MetadataCatalog>,
    pub list_responses: Mutex<VecDeque<Result<Value>>>,
    pub list_calls: Mutex<Vec<Vec<String>>>,
    pub deploy_responses: Mutex<VecDeque<Result<DeploymentStatus>>>,
    pub deploy_calls: AtomicUsize,
    pub query_responses: Mutex<VecDeque<Result<QueryPage>>>,
    pub query_calls: Mutex<Vec<(String, bool)>>,
    pub query_more_responses: Mutex<VecDeque<Result<QueryPage>>>,
    pub query_more_calls: Mutex<Vec<(String, bool)>>,
    pub bulk_responses: Mutex<VecDeque<Result<Vec<Value>>>>,
    pub bulk_calls: AtomicUsize,
    pub describe_responses: Mutex<VecDeque<Result<Value>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, response: Result<Value>) {
        self.list_responses.lock().unwrap().push_back(response);
    }

    pub fn push_deploy(&self, response: Result<DeploymentStatus>) {
        self.deploy_responses.lock().unwrap().push_back(response);
    }

    pub fn push_query(&self, response: Result<QueryPage>) {
        self.query_responses.lock().unwrap().push_back(response);
    }

    pub fn push_query_more(&self, response: Result<QueryPage>) {
        self.query_more_responses.lock().unwrap().push_back(response);
    }

    pub fn push_bulk(&self, response: Result<Vec<Value>>) {
        self.bulk_responses.lock().unwrap().push_back(response);
    }

    pub fn push_describe(&self, response: Result<Value>) {
        self.describe_responses.lock().unwrap().push_back(response);
    }
}

/// Shorthand for a retryable connection error.
pub(crate) fn transient(message: &str) -> Error {
    Error::new(ErrorKind::Connection(message.to_string()))
}

impl OrgConnection for MockConnection {
    async fn describe_metadata(&self) -> Result<MetadataCatalog> {
        Ok(self
            .catalog
            .clone()
            .expect("unexpected describe_metadata call"))
    }

    async fn list_metadata(&self, types: &[String]) -> Result<Value> {
        self.list_calls.lock().unwrap().push(types.to_vec());
        self.list_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected list_metadata call")
    }

    async fn check_deploy_status(
        &self,
        _deployment_id: &str,
        _include_details: bool,
    ) -> Result<DeploymentStatus> {
        self.deploy_calls.fetch_add(1, Ordering::SeqCst);
        self.deploy_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected check_deploy_status call")
    }

    async fn query(&self, soql: &str, tooling: bool) -> Result<QueryPage> {
        self.query_calls
            .lock()
            .unwrap()
            .push((soql.to_string(), tooling));
        self.query_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected query call")
    }

    async fn query_more(&self, next_records_url: &str, tooling: bool) -> Result<QueryPage> {
        self.query_more_calls
            .lock()
            .unwrap()
            .push((next_records_url.to_string(), tooling));
        self.query_more_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected query_more call")
    }

    async fn bulk_query(&self, _soql: &str) -> Result<Vec<Value>> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        self.bulk_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected bulk_query call")
    }

    async fn describe_sobject(&self, _object_type: &str) -> Result<Value> {
        self.describe_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected describe_sobject call")
    }
}
