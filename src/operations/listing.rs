//! Cursor-based pagination over Reddit listings.

use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::models::{ApiCall, Listing, Record};
use log::debug;
use serde_json::Value;

/// Server-side page size requested on every listing call.
pub const PAGE_SIZE: u64 = 100;

/// How many records a listing operation should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub return_all: bool,
    pub limit: usize,
}

impl ListingOptions {
    pub fn all() -> Self {
        Self {
            return_all: true,
            limit: crate::params::DEFAULT_LIMIT,
        }
    }

    pub fn limited(limit: usize) -> Self {
        Self {
            return_all: false,
            limit,
        }
    }

    /// Cuts `records` down to the limit unless everything was requested.
    pub fn truncate<T>(&self, records: &mut Vec<T>) {
        if !self.return_all {
            records.truncate(self.limit);
        }
    }

    fn satisfied_by(&self, count: usize) -> bool {
        !self.return_all && count >= self.limit
    }
}

/// Where the children of a page live in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingShape {
    /// `data.children[*].data`
    Children,
    /// `subreddits[*]`, as returned by `api/search_subreddits.json`
    SearchSubreddits,
    /// `[1].data.children[*].data`, the comment half of a `[post, comments]` pair
    CommentThread,
}

impl ListingShape {
    fn records(&self, page: Value, path: &str) -> Result<Vec<Record>> {
        match self {
            ListingShape::Children => Listing::parse(page)
                .map(Listing::into_records)
                .ok_or_else(|| Error::shape(path, "a listing with data.children")),
            ListingShape::SearchSubreddits => match page {
                Value::Object(mut body) => match body.remove("subreddits") {
                    Some(Value::Array(subreddits)) => Ok(subreddits),
                    _ => Err(Error::shape(path, "a subreddits array")),
                },
                _ => Err(Error::shape(path, "a subreddits array")),
            },
            ListingShape::CommentThread => match page {
                Value::Array(mut halves) if halves.len() > 1 => Listing::parse(halves.swap_remove(1))
                    .map(Listing::into_records)
                    .ok_or_else(|| Error::shape(path, "a comment listing at index 1")),
                _ => Err(Error::shape(path, "a [post, comments] listing pair")),
            },
        }
    }
}

/// Cursor of the next page. Array responses carry none.
fn next_cursor(page: &Value) -> Option<String> {
    if page.is_array() {
        return None;
    }
    page.pointer("/data/after")
        .and_then(Value::as_str)
        .filter(|after| !after.is_empty())
        .map(str::to_string)
}

/// Requests pages of `call` until the listing is exhausted or the limit is reached.
///
/// `limit` is always sent as [`PAGE_SIZE`]; the cursor of each page is passed
/// back as `after`. Without `return_all`, paging stops as soon as enough
/// records are collected and the result is cut to exactly `limit`.
pub async fn paginate(
    executor: &dyn RequestExecutor,
    mut call: ApiCall,
    shape: ListingShape,
    options: ListingOptions,
) -> Result<Vec<Record>> {
    call.query.insert("limit".to_string(), PAGE_SIZE.into());

    let mut records = Vec::new();
    let mut pages = 0;
    loop {
        let page = executor.execute(&call).await?;
        pages += 1;

        let cursor = next_cursor(&page);
        let children = shape.records(page, &call.path)?;
        debug!(
            "Page {} of {}: {} records, cursor {:?}",
            pages,
            call.path,
            children.len(),
            cursor
        );
        records.extend(children);

        if options.satisfied_by(records.len()) {
            break;
        }
        match cursor {
            Some(after) => {
                call.query.insert("after".to_string(), after.into());
            }
            None => break,
        }
    }

    options.truncate(&mut records);
    debug!("Collected {} records from {} in {} page(s)", records.len(), call.path, pages);
    Ok(records)
}
