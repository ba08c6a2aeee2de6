pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod params;

#[cfg(test)]
mod test_utils;

pub use client::{RedditClient, RequestExecutor};
pub use error::{BatchError, Error, Result};
pub use models::ExecutionItem;
pub use operations::{Dispatcher, Operation};
pub use params::{JsonItems, Parameters};
