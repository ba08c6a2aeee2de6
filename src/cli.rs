use crate::error::Result;
use crate::params::JsonItems;
use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "redflow",
    version,
    about = "Runs Reddit API operations over a batch of parameter items."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run one (resource, operation) pair for every input item.
    Run(RunArgs),

    /// List the supported (resource, operation) pairs.
    Operations,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Resource to act on (post, postComment, profile, subreddit, user).
    #[arg(long, short)]
    pub resource: String,

    /// Operation to run on the resource.
    #[arg(long, short)]
    pub operation: String,

    /// A parameter as name=value. Values are parsed as JSON when possible.
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// JSON file holding an array of parameter objects, one per item.
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// Emit an error record for a failing item and keep going.
    #[arg(long)]
    pub continue_on_fail: bool,
}

impl RunArgs {
    /// Builds the input items: the `--items` file (or one empty item), with
    /// `-p` values, `resource` and `operation` filling in what an item leaves out.
    pub fn input_items(&self) -> Result<JsonItems> {
        let items = match &self.items {
            Some(path) => JsonItems::from_value(serde_json::from_str(&fs::read_to_string(path)?)?)?,
            None => JsonItems::new(vec![Map::new()]),
        };

        let items = self
            .params
            .iter()
            .fold(items, |items, (name, value)| items.with_default(name, value.clone()));
        Ok(items
            .with_default("resource", Value::String(self.resource.clone()))
            .with_default("operation", Value::String(self.operation.clone())))
    }
}

/// Parses `name=value`; the value is JSON if it parses as JSON, a string otherwise.
fn parse_param(raw: &str) -> std::result::Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got \"{raw}\""))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in \"{raw}\""));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
