use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod listing;

pub use listing::{Listing, ListingData, Thing};

/// A flat record: one Reddit thing with its `kind`/`data` envelope removed.
pub type Record = Value;

/// Query string or form body of an API call.
pub type Query = Map<String, Value>;

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Which Reddit host serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `oauth.reddit.com`, requires a bearer token
    Authenticated,
    /// `www.reddit.com`, anonymous reads
    Public,
}

/// A single request to the Reddit API, built per operation and dropped after use.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub host: Host,
    /// Path relative to the host root, without a leading slash
    pub path: String,
    pub query: Query,
}

impl ApiCall {
    pub fn get(host: Host, path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            host,
            path: path.into(),
            query: Query::new(),
        }
    }

    pub fn post(host: Host, path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            host,
            path: path.into(),
            query: Query::new(),
        }
    }

    /// Adds a query/body parameter.
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.query.insert(name.to_string(), value.into());
        self
    }

    /// Query parameters rendered as strings, the way Reddit expects them on the wire.
    pub fn wire_params(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), rendered)
            })
            .collect()
    }
}

/// Correlates an output record with the input item that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output record as handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionItem {
    pub json: Record,
    #[serde(rename = "pairedItem")]
    pub paired_item: PairedItem,
}

impl ExecutionItem {
    pub fn new(json: Record, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
        }
    }

    /// Splits an operation result into records: arrays yield one record per
    /// element, anything else is a single record.
    pub fn from_result(result: Value, item: usize) -> Vec<Self> {
        match result {
            Value::Array(records) => records
                .into_iter()
                .map(|record| Self::new(record, item))
                .collect(),
            record => vec![Self::new(record, item)],
        }
    }
}
