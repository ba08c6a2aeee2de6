use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::models::ApiCall;
use crate::params::JsonItems;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A scripted executor for tests. Returns pre-defined responses in order and
/// records every call it receives.
pub struct MockExecutor {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockExecutor {
    pub fn new(responses: Vec<Value>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<Value>>) -> Self {
        do_logging();
        Self {
            responses: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The only call made, panicking if there was not exactly one.
    pub fn single_call(&self) -> ApiCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls[0].clone()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, call: &ApiCall) -> Result<Value> {
        self.calls.lock().unwrap().push(call.clone());
        let n = self.call_count();
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport(format!("MockExecutor: no more responses (called {n} times)"))))
    }
}

/// A listing page of `count` link things numbered from `start`.
pub fn listing_page(start: usize, count: usize, after: Option<&str>) -> Value {
    let children: Vec<Value> = (start..start + count)
        .map(|i| json!({"kind": "t3", "data": {"id": i.to_string(), "name": format!("t3_{i}")}}))
        .collect();
    json!({
        "kind": "Listing",
        "data": {"after": after, "before": null, "children": children}
    })
}

/// Parameters for a single item.
pub fn single_item(item: Value) -> JsonItems {
    JsonItems::from_value(json!([item])).unwrap()
}
