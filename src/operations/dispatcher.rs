//! Per-item execution of (resource, operation) pairs.

use crate::client::RequestExecutor;
use crate::error::{BatchError, Result};
use crate::models::ExecutionItem;
use crate::operations::Operation;
use crate::params::{ItemParameters, Parameters};
use log::{info, warn};
use serde_json::json;

/// Runs operations against an executor, one input item at a time.
pub struct Dispatcher<'a> {
    executor: &'a dyn RequestExecutor,
    continue_on_fail: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(executor: &'a dyn RequestExecutor) -> Self {
        Self {
            executor,
            continue_on_fail: false,
        }
    }

    /// Turn per-item failures into `{error}` records instead of stopping.
    pub fn continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Executes one (resource, operation) pair for item `item`.
    ///
    /// Every returned record is paired with `item`. In continue-on-fail mode
    /// an error becomes a single `{"error": message}` record.
    pub async fn dispatch(
        &self,
        resource: &str,
        operation: &str,
        params: &dyn Parameters,
        item: usize,
    ) -> Result<Vec<ExecutionItem>> {
        match self.try_dispatch(resource, operation, params, item).await {
            Ok(records) => Ok(records),
            Err(err) if self.continue_on_fail => {
                warn!("{resource}.{operation} failed for item {item}, continuing: {err}");
                Ok(vec![ExecutionItem::new(json!({ "error": err.to_string() }), item)])
            }
            Err(err) => Err(err),
        }
    }

    async fn try_dispatch(
        &self,
        resource: &str,
        operation: &str,
        params: &dyn Parameters,
        item: usize,
    ) -> Result<Vec<ExecutionItem>> {
        let reader = ItemParameters::new(params, item);
        let op = Operation::resolve(resource, operation, &reader)?;
        info!("Running {resource}.{operation} for item {item}");

        let result = op.execute(self.executor).await?;
        let records = ExecutionItem::from_result(result, item);
        info!("{resource}.{operation} returned {} record(s) for item {item}", records.len());
        Ok(records)
    }

    /// Runs every item, reading `resource` and `operation` from each item's parameters.
    ///
    /// Without continue-on-fail the batch stops at the first failing item;
    /// the records of earlier items are kept on the [`BatchError`].
    pub async fn run(&self, params: &dyn Parameters) -> std::result::Result<Vec<ExecutionItem>, BatchError> {
        let mut completed = Vec::new();
        for item in 0..params.item_count() {
            let reader = ItemParameters::new(params, item);
            let pair = reader
                .string("resource")
                .and_then(|resource| Ok((resource, reader.string("operation")?)));

            let outcome = match pair {
                Ok((resource, operation)) => self.dispatch(&resource, &operation, params, item).await,
                Err(err) if self.continue_on_fail => {
                    warn!("Item {item} has no operation, continuing: {err}");
                    Ok(vec![ExecutionItem::new(json!({ "error": err.to_string() }), item)])
                }
                Err(err) => Err(err),
            };

            match outcome {
                Ok(records) => completed.extend(records),
                Err(source) => {
                    return Err(BatchError {
                        item,
                        source,
                        completed,
                    })
                }
            }
        }
        Ok(completed)
    }
}
